//! User use-case service.
//!
//! # Responsibility
//! - Validate candidates, normalize fields and enforce email uniqueness
//!   before delegating to a `UserStore`.
//! - Report every outcome as a typed `UserServiceError` kind.
//!
//! # Invariants
//! - Write paths validate before touching the store.
//! - Uniqueness is checked after validation and before persistence.
//! - `update` re-checks uniqueness only when the normalized email changed.
//! - Each operation issues at most one store write.
//!
//! The check-then-write sequence is not locked; a concurrent writer can
//! claim the same email in between. Stores with a unique index report that
//! as `DuplicateEmail`, surfaced here as `Conflict`.

use crate::model::user::{is_valid_id, normalize_email, UserCandidate, UserId, UserRecord};
use crate::repo::user_repo::{StoreError, UserStore};
use log::{debug, info, warn};
use thiserror::Error;

pub type ServiceResult<T> = Result<T, UserServiceError>;

/// Typed failure kinds returned by `UserService`.
#[derive(Debug, Error)]
pub enum UserServiceError {
    /// Caller-correctable input problem.
    #[error("{0}")]
    InvalidArgument(String),
    /// Referenced user does not exist.
    #[error("user not found with id: {0}")]
    NotFound(UserId),
    /// Email already belongs to another user.
    #[error("a user with this email already exists: {email}")]
    Conflict { email: String },
    /// Unexpected store failure.
    #[error("user store failure: {0}")]
    Internal(#[source] StoreError),
}

impl UserServiceError {
    /// Stable machine-readable kind, used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::NotFound(_) => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for UserServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::DuplicateEmail(email) => Self::Conflict { email },
            other => Self::Internal(other),
        }
    }
}

const INVALID_ID_MESSAGE: &str = "user id must be a positive number";
const BLANK_EMAIL_MESSAGE: &str = "email must not be blank";

/// User service facade over store implementations.
pub struct UserService<S: UserStore> {
    store: S,
}

impl<S: UserStore> UserService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lists every stored user in store order.
    pub fn list_users(&self) -> ServiceResult<Vec<UserRecord>> {
        let users = self.store.list_all()?;
        debug!("event=user_list module=service status=ok count={}", users.len());
        Ok(users)
    }

    /// Gets one user by id.
    ///
    /// Returns `Ok(None)` when no user has this id.
    ///
    /// # Errors
    /// - `InvalidArgument` when `id <= 0`.
    pub fn get_user(&self, id: UserId) -> ServiceResult<Option<UserRecord>> {
        ensure_valid_id(id)?;
        Ok(self.store.find_by_id(id)?)
    }

    /// Gets one user by email, matched case-insensitively after trimming.
    ///
    /// # Errors
    /// - `InvalidArgument` when `email` is blank.
    pub fn find_user_by_email(&self, email: &str) -> ServiceResult<Option<UserRecord>> {
        if email.trim().is_empty() {
            return Err(UserServiceError::InvalidArgument(
                BLANK_EMAIL_MESSAGE.to_string(),
            ));
        }
        Ok(self.store.find_by_email(&normalize_email(email))?)
    }

    /// Creates one user and returns it with its store-assigned id.
    ///
    /// # Errors
    /// - `InvalidArgument` carrying the validator reason.
    /// - `Conflict` when the normalized email is already stored.
    pub fn create_user(&self, candidate: &UserCandidate) -> ServiceResult<UserRecord> {
        let record = validated_record(candidate).inspect_err(|err| log_rejected("create", err))?;

        if self.store.exists_by_email(&record.email)? {
            let err = UserServiceError::Conflict {
                email: record.email,
            };
            log_rejected("create", &err);
            return Err(err);
        }

        let created = self.store.save(&record)?;
        info!(
            "event=user_create module=service status=ok user_id={}",
            created.id.unwrap_or_default()
        );
        Ok(created)
    }

    /// Replaces name, email and phone of an existing user.
    ///
    /// The id is never changed. Phone is copied verbatim, including `None`.
    ///
    /// # Errors
    /// - `InvalidArgument` for a non-positive id or an invalid candidate.
    /// - `NotFound` when no user has this id.
    /// - `Conflict` when the new email belongs to another user.
    pub fn update_user(
        &self,
        id: UserId,
        candidate: &UserCandidate,
    ) -> ServiceResult<UserRecord> {
        ensure_valid_id(id)?;

        let mut existing = self
            .store
            .find_by_id(id)?
            .ok_or(UserServiceError::NotFound(id))
            .inspect_err(|err| log_rejected("update", err))?;

        let replacement =
            validated_record(candidate).inspect_err(|err| log_rejected("update", err))?;

        if existing.email != replacement.email
            && self.store.exists_by_email(&replacement.email)?
        {
            let err = UserServiceError::Conflict {
                email: replacement.email,
            };
            log_rejected("update", &err);
            return Err(err);
        }

        existing.name = replacement.name;
        existing.email = replacement.email;
        existing.phone = replacement.phone;

        let updated = self.store.save(&existing)?;
        info!("event=user_update module=service status=ok user_id={id}");
        Ok(updated)
    }

    /// Hard-deletes one user.
    ///
    /// # Errors
    /// - `InvalidArgument` when `id <= 0`.
    /// - `NotFound` when no user has this id.
    pub fn delete_user(&self, id: UserId) -> ServiceResult<()> {
        ensure_valid_id(id)?;

        if !self.store.exists_by_id(id)? {
            let err = UserServiceError::NotFound(id);
            log_rejected("delete", &err);
            return Err(err);
        }

        self.store.delete_by_id(id)?;
        info!("event=user_delete module=service status=ok user_id={id}");
        Ok(())
    }

    /// Returns whether some user has this email.
    ///
    /// Blank input yields `false` rather than an error.
    pub fn email_exists(&self, email: &str) -> ServiceResult<bool> {
        if email.trim().is_empty() {
            return Ok(false);
        }
        Ok(self.store.exists_by_email(&normalize_email(email))?)
    }
}

fn ensure_valid_id(id: UserId) -> ServiceResult<()> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(UserServiceError::InvalidArgument(INVALID_ID_MESSAGE.to_string()))
    }
}

fn validated_record(candidate: &UserCandidate) -> ServiceResult<UserRecord> {
    candidate
        .validate()
        .map_err(|err| UserServiceError::InvalidArgument(err.to_string()))?;

    UserRecord::from_candidate(candidate).ok_or_else(|| {
        UserServiceError::InvalidArgument("user name and email are required".to_string())
    })
}

fn log_rejected(operation: &str, err: &UserServiceError) {
    warn!(
        "event=user_{} module=service status=rejected error_kind={}",
        operation,
        err.kind()
    );
}
