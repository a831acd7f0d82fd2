//! User domain model and candidate validation.
//!
//! # Responsibility
//! - Define the persisted user record and the caller-supplied candidate.
//! - Provide the structural validator run before any store access.
//! - Provide name/email normalization helpers.
//!
//! # Invariants
//! - `id` is assigned once by the store and never reassigned.
//! - Persisted `name` and `email` carry no leading/trailing whitespace.
//! - Persisted `email` is lowercase and unique across all records.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-assigned identifier. Valid ids are strictly positive.
pub type UserId = i64;

/// Minimum trimmed name length, in characters.
pub const NAME_MIN_CHARS: usize = 2;
/// Maximum trimmed name length, in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// Structural validation failures, reported in check order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    #[error("user candidate must not be empty")]
    EmptyCandidate,
    #[error("user name is required")]
    MissingName,
    #[error("user email is required")]
    MissingEmail,
    #[error("user email format is invalid")]
    InvalidEmailFormat,
    #[error("user name must have at least 2 characters (got {len})")]
    NameTooShort { len: usize },
    #[error("user name must have at most 100 characters (got {len})")]
    NameTooLong { len: usize },
}

/// Caller input for create/update use-cases.
///
/// Fields are optional because transports may omit them; the validator
/// decides which absences are acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCandidate {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Free-form, stored verbatim.
    pub phone: Option<String>,
}

impl UserCandidate {
    /// Creates a candidate with all three fields supplied.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: Option<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            phone,
        }
    }

    /// Returns whether no field was supplied at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }

    /// Runs structural checks; the first failing check wins.
    ///
    /// Checks run on trimmed views of `name` and `email` but never modify
    /// the candidate.
    ///
    /// # Errors
    /// - Returns the first `UserValidationError` encountered, in the order
    ///   empty candidate, name presence, email presence, email format,
    ///   name length.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.is_empty() {
            return Err(UserValidationError::EmptyCandidate);
        }

        let name = match self.name.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value,
            _ => return Err(UserValidationError::MissingName),
        };

        let email = match self.email.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value,
            _ => return Err(UserValidationError::MissingEmail),
        };

        if !email.contains('@') || !email.contains('.') {
            return Err(UserValidationError::InvalidEmailFormat);
        }

        let len = name.chars().count();
        if len < NAME_MIN_CHARS {
            return Err(UserValidationError::NameTooShort { len });
        }
        if len > NAME_MAX_CHARS {
            return Err(UserValidationError::NameTooLong { len });
        }

        Ok(())
    }
}

/// Persisted user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// `None` until the store assigns an id on first save.
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl UserRecord {
    /// Builds an unsaved record from a candidate that already passed
    /// `UserCandidate::validate`, normalizing name and email.
    ///
    /// Returns `None` when the candidate is missing name or email.
    pub fn from_candidate(candidate: &UserCandidate) -> Option<Self> {
        let name = candidate.name.as_deref()?;
        let email = candidate.email.as_deref()?;
        Some(Self {
            id: None,
            name: normalize_name(name),
            email: normalize_email(email),
            phone: candidate.phone.clone(),
        })
    }

    /// Returns whether this record has been persisted.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Trims and lowercases an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trims a display name for storage.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

/// Returns whether an id is in the valid (strictly positive) range.
pub fn is_valid_id(id: UserId) -> bool {
    id > 0
}
