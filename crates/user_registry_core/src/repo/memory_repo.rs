//! In-process user store.
//!
//! # Responsibility
//! - Provide a `UserStore` without SQLite for tests and throwaway sessions.
//!
//! # Invariants
//! - Ids come from a monotonic counter and are never reused.
//! - Email uniqueness matches the SQLite unique index.

use crate::model::user::{UserId, UserRecord};
use crate::repo::user_repo::{StoreError, StoreResult, UserStore};
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct MemoryState {
    last_id: UserId,
    rows: BTreeMap<UserId, UserRecord>,
}

impl MemoryState {
    fn email_taken_by_other(&self, email: &str, id: Option<UserId>) -> bool {
        self.rows
            .values()
            .any(|row| row.email == email && row.id != id)
    }
}

/// `UserStore` backed by an ordered map behind a read-write lock.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    state: RwLock<MemoryState>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.state.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserStore for InMemoryUserStore {
    fn save(&self, record: &UserRecord) -> StoreResult<UserRecord> {
        let mut state = self.state.write();
        if state.email_taken_by_other(&record.email, record.id) {
            return Err(StoreError::DuplicateEmail(record.email.clone()));
        }

        let mut stored = record.clone();
        match record.id {
            Some(id) => {
                let slot = state.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
                *slot = stored.clone();
            }
            None => {
                state.last_id += 1;
                let id = state.last_id;
                stored.id = Some(id);
                state.rows.insert(id, stored.clone());
            }
        }

        Ok(stored)
    }

    fn find_by_id(&self, id: UserId) -> StoreResult<Option<UserRecord>> {
        Ok(self.state.read().rows.get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self
            .state
            .read()
            .rows
            .values()
            .find(|row| row.email == email)
            .cloned())
    }

    fn exists_by_email(&self, email: &str) -> StoreResult<bool> {
        Ok(self.state.read().rows.values().any(|row| row.email == email))
    }

    fn exists_by_id(&self, id: UserId) -> StoreResult<bool> {
        Ok(self.state.read().rows.contains_key(&id))
    }

    fn delete_by_id(&self, id: UserId) -> StoreResult<()> {
        self.state
            .write()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn list_all(&self) -> StoreResult<Vec<UserRecord>> {
        Ok(self.state.read().rows.values().cloned().collect())
    }
}
