//! Core domain logic for the user registry.
//! This crate is the single source of truth for user record invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod transport;

pub use config::RegistryConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::user::{
    normalize_email, normalize_name, UserCandidate, UserId, UserRecord, UserValidationError,
    NAME_MAX_CHARS, NAME_MIN_CHARS,
};
pub use repo::memory_repo::InMemoryUserStore;
pub use repo::user_repo::{SqliteUserStore, StoreError, StoreResult, UserStore};
pub use service::user_service::{ServiceResult, UserService, UserServiceError};
pub use transport::{ErrorResponse, Operation, ResponseStatus};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
