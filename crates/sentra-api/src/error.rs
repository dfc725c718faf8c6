//! API error type and HTTP status mapping.
//!
//! All domain errors are caught at this boundary and translated to the
//! response envelope with an appropriate status code and human-readable
//! message. Internal and store errors are logged server-side with full
//! detail but never leak stack traces or store-internal identifiers to
//! the client.

use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::{error, warn};

/// Boundary error carrying the HTTP failure taxonomy.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    NotImplemented(String),
    Unavailable(String),
    Internal(String),
}

impl From<sentra_core::Error> for ApiError {
    fn from(err: sentra_core::Error) -> Self {
        use sentra_core::Error;
        match err {
            Error::Validation(msg) => ApiError::BadRequest(msg),
            Error::Unauthenticated(msg) => ApiError::Unauthorized(msg),
            Error::Forbidden(msg) => ApiError::Forbidden(msg),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidTransition { from, to } => {
                // An engine-caller bug, not a user error: record it as
                // an engine defect.
                warn!(from = %from, to = %to, "Engine requested an invalid lifecycle transition");
                ApiError::Conflict(format!("Invalid transition: {from} -> {to}"))
            }
            Error::Unsupported(msg) => ApiError::NotImplemented(msg),
            Error::Database(e) => {
                error!(error = %e, "Store operation failed");
                ApiError::Unavailable("Store temporarily unavailable".to_string())
            }
            other => {
                error!(error = %other, "Unexpected internal error");
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::NotImplemented(msg) => (StatusCode::NOT_IMPLEMENTED, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "success": false,
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentra_core::{Error, JobStatus};

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err: ApiError = Error::Validation("bad".to_string()).into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_forbidden_maps_to_forbidden() {
        let err: ApiError = Error::Forbidden("no".to_string()).into();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[test]
    fn test_invalid_transition_maps_to_conflict() {
        let err: ApiError = Error::InvalidTransition {
            from: JobStatus::Completed,
            to: JobStatus::Processing,
        }
        .into();
        match err {
            ApiError::Conflict(msg) => assert!(msg.contains("completed -> processing")),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_maps_to_not_implemented() {
        let err: ApiError = Error::Unsupported("pdf".to_string()).into();
        assert!(matches!(err, ApiError::NotImplemented(_)));
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let err: ApiError = Error::Internal("secret pool address 10.0.0.7".to_string()).into();
        match err {
            ApiError::Internal(msg) => assert_eq!(msg, "Internal server error"),
            other => panic!("expected Internal, got {other:?}"),
        }
    }
}
