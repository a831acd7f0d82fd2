//! Outcome-to-status mapping for transport layers.
//!
//! # Responsibility
//! - Map service outcomes onto response status categories.
//! - Build the error body a transport renders for failed operations.
//!
//! # Invariants
//! - Internal failures never expose their cause in `ErrorResponse`; the
//!   cause is logged instead.

use crate::service::user_service::UserServiceError;
use log::error;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

const INTERNAL_ERROR_MESSAGE: &str =
    "An internal error occurred. Please contact the administrator.";

/// Response status category, with its HTTP code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    Created,
    NoContent,
    NotFound,
    Conflict,
    InvalidRequest,
    InternalError,
}

impl ResponseStatus {
    /// HTTP status code for this category.
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::Created => 201,
            Self::NoContent => 204,
            Self::InvalidRequest => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::InternalError => 500,
        }
    }

    /// Short human label used as `ErrorResponse::error`.
    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Created => "Created",
            Self::NoContent => "No Content",
            Self::InvalidRequest => "Invalid Request",
            Self::NotFound => "Resource Not Found",
            Self::Conflict => "Data Conflict",
            Self::InternalError => "Internal Server Error",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::Created | Self::NoContent)
    }
}

impl UserServiceError {
    /// Status category a transport should answer with.
    pub fn status(&self) -> ResponseStatus {
        match self {
            Self::InvalidArgument(_) => ResponseStatus::InvalidRequest,
            Self::NotFound(_) => ResponseStatus::NotFound,
            Self::Conflict { .. } => ResponseStatus::Conflict,
            Self::Internal(_) => ResponseStatus::InternalError,
        }
    }
}

/// Error body rendered by transports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
    pub message: String,
    /// Request path or command that failed.
    pub path: String,
    /// Unix epoch milliseconds at construction.
    pub timestamp_ms: i64,
}

impl ErrorResponse {
    pub fn new(
        status: ResponseStatus,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            status: status.code(),
            error: status.reason().to_string(),
            message: message.into(),
            path: path.into(),
            timestamp_ms: now_epoch_ms(),
        }
    }

    /// Builds the error body for a failed service call.
    ///
    /// # Side effects
    /// - Logs the full error chain of `Internal` failures at `error` level.
    pub fn from_service_error(err: &UserServiceError, path: impl Into<String>) -> Self {
        let path = path.into();
        let status = err.status();
        let message = match err {
            UserServiceError::Internal(cause) => {
                error!(
                    "event=request_failed module=transport status=error path={} error={}",
                    path,
                    error_chain(cause)
                );
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        };
        Self::new(status, message, path)
    }
}

/// Success status for each service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    FindByEmail,
    Exists,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Status for a successful call; `found` matters only for lookups.
    pub fn success_status(self, found: bool) -> ResponseStatus {
        match self {
            Self::Get | Self::FindByEmail if !found => ResponseStatus::NotFound,
            Self::Create => ResponseStatus::Created,
            Self::Delete => ResponseStatus::NoContent,
            _ => ResponseStatus::Ok,
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{ErrorResponse, Operation, ResponseStatus};
    use crate::db::DbError;
    use crate::repo::user_repo::StoreError;
    use crate::service::user_service::UserServiceError;

    #[test]
    fn service_errors_map_to_expected_statuses() {
        let cases = [
            (UserServiceError::InvalidArgument("bad".to_string()), 400),
            (UserServiceError::NotFound(7), 404),
            (
                UserServiceError::Conflict {
                    email: "dup@example.com".to_string(),
                },
                409,
            ),
            (
                UserServiceError::Internal(StoreError::InvalidData("x".to_string())),
                500,
            ),
        ];
        for (err, code) in cases {
            assert_eq!(err.status().code(), code, "{err}");
        }
    }

    #[test]
    fn internal_error_message_hides_cause() {
        let err = UserServiceError::Internal(StoreError::Db(DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 1,
        }));
        let body = ErrorResponse::from_service_error(&err, "/users/1");
        assert_eq!(body.status, 500);
        assert_eq!(body.error, "Internal Server Error");
        assert!(!body.message.contains("schema"));
        assert_eq!(body.path, "/users/1");
        assert!(body.timestamp_ms > 0);
    }

    #[test]
    fn conflict_body_keeps_email_in_message() {
        let err = UserServiceError::Conflict {
            email: "dup@example.com".to_string(),
        };
        let body = ErrorResponse::from_service_error(&err, "create");
        assert_eq!(body.error, "Data Conflict");
        assert!(body.message.contains("dup@example.com"));
    }

    #[test]
    fn lookup_misses_are_not_found_and_writes_have_specific_codes() {
        assert_eq!(
            Operation::Get.success_status(false),
            ResponseStatus::NotFound
        );
        assert_eq!(Operation::Get.success_status(true), ResponseStatus::Ok);
        assert_eq!(
            Operation::Create.success_status(true),
            ResponseStatus::Created
        );
        assert_eq!(
            Operation::Delete.success_status(true),
            ResponseStatus::NoContent
        );
        assert!(Operation::List.success_status(true).is_success());
    }
}
