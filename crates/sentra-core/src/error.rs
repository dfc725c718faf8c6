//! Error types for sentra.

use thiserror::Error;

use crate::models::JobStatus;

/// Result type alias using sentra's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sentra operations.
///
/// Every failure in this service is scoped to a single request;
/// nothing here is fatal to the process. The API layer maps each
/// variant to an HTTP status code.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing input; the client must fix and resubmit
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid credential
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Authenticated but not the owner of the target entity
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// No such entity
    #[error("Not found: {0}")]
    NotFound(String),

    /// Lifecycle contract violation; an engine-caller bug, logged as
    /// an engine defect rather than surfaced as a user error
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },

    /// Requested operation is not supported (e.g. export format)
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Store operation failed (wraps sqlx::Error); transient, safe to
    /// retry with backoff
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (catch-all, logged with full context)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_validation() {
        let err = Error::Validation("missing fileName".to_string());
        assert_eq!(err.to_string(), "Validation error: missing fileName");
    }

    #[test]
    fn test_error_display_unauthenticated() {
        let err = Error::Unauthenticated("invalid token".to_string());
        assert_eq!(err.to_string(), "Unauthenticated: invalid token");
    }

    #[test]
    fn test_error_display_forbidden() {
        let err = Error::Forbidden("not the job owner".to_string());
        assert_eq!(err.to_string(), "Forbidden: not the job owner");
    }

    #[test]
    fn test_error_display_not_found() {
        let err = Error::NotFound("job".to_string());
        assert_eq!(err.to_string(), "Not found: job");
    }

    #[test]
    fn test_error_display_invalid_transition() {
        let err = Error::InvalidTransition {
            from: JobStatus::Completed,
            to: JobStatus::Processing,
        };
        assert_eq!(err.to_string(), "Invalid transition: completed -> processing");
    }

    #[test]
    fn test_error_display_unsupported() {
        let err = Error::Unsupported("pdf export".to_string());
        assert_eq!(err.to_string(), "Unsupported: pdf export");
    }

    #[test]
    fn test_error_display_config() {
        let err = Error::Config("ENGINE_TOKEN not set".to_string());
        assert_eq!(err.to_string(), "Configuration error: ENGINE_TOKEN not set");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_result_type_ok() {
        fn get_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(get_result().unwrap(), 42);
    }
}
