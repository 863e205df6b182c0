use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{dao::storage::StorageError, dto::validation::constraint_messages};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend failed or is unreachable.
    #[error("storage unavailable")]
    Storage(#[source] StorageError),
    /// Caller holds no valid game session (or a bad API key).
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Storage(err)
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::InvalidInput(constraint_messages(&err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Unauthorized access attempt.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(source) => AppError::Internal(source.to_string()),
            ServiceError::Unauthenticated(message) => AppError::Unauthorized(message),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// The response body carries the bare message under an `error` key; the
/// `Display` prefixes stay in logs only.
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        let payload = Json(ErrorBody { error: message });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::score::SubmitScoreRequest;
    use validator::Validate;

    #[test]
    fn maps_service_errors_to_http_statuses() {
        let unauthorized: AppError = ServiceError::Unauthenticated("no session".into()).into();
        assert_eq!(
            unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );

        let bad_request: AppError = ServiceError::InvalidInput("bad score".into()).into();
        assert_eq!(
            bad_request.into_response().status(),
            StatusCode::BAD_REQUEST
        );

        let not_found: AppError = ServiceError::NotFound("row".into()).into();
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_errors_become_invalid_input_with_field_messages() {
        let request = SubmitScoreRequest {
            username: "way too long for a username".to_owned(),
            score: 100,
        };

        let service_err: ServiceError = request.validate().unwrap_err().into();
        match service_err {
            ServiceError::InvalidInput(message) => {
                assert_eq!(message, "Username must be 1-10 characters (got 27)");
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}
