//! Server error types.

use api_protocol::{error_codes, ErrorBody, FieldErrors};
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recipe_store::StoreError;

/// Key under which errors not tied to one field are reported.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// One or more fields failed validation.
    #[error("Invalid input")]
    Validation(FieldErrors),

    /// The request body could not be read.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found, or not owned by the caller.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication required.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication error.
    #[error("Auth error: {0}")]
    Auth(#[from] auth::AuthError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Creates a validation error for a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.into()]);
        ServerError::Validation(fields)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ServerError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Unmatched path parameter");
        ServerError::NotFound("Not found.".to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::with_fields("Invalid input.", fields),
            ),
            ServerError::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new(error_codes::VALIDATION_FAILED, msg),
            ),
            ServerError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody::new(error_codes::NOT_FOUND, msg),
            ),
            ServerError::AuthenticationRequired => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new(
                    error_codes::AUTHENTICATION_REQUIRED,
                    "Authentication credentials were not provided.",
                ),
            ),
            ServerError::Store(e) if e.is_not_found() => (
                StatusCode::NOT_FOUND,
                ErrorBody::new(error_codes::NOT_FOUND, "Not found."),
            ),
            ServerError::Store(e) => {
                tracing::error!(error = %e, "Store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(error_codes::INTERNAL_ERROR, "Internal server error."),
                )
            }
            ServerError::Auth(e @ auth::AuthError::InvalidCredentials) => {
                let mut fields = FieldErrors::new();
                fields.insert(NON_FIELD_ERRORS.to_string(), vec![e.to_string()]);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::with_fields(e.to_string(), fields),
                )
            }
            ServerError::Auth(e @ auth::AuthError::PasswordHash(_)) => {
                tracing::error!(error = %e, "Password hashing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(error_codes::INTERNAL_ERROR, "Internal server error."),
                )
            }
            ServerError::Auth(e) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new(error_codes::AUTHENTICATION_REQUIRED, e.to_string()),
            ),
            ServerError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(error_codes::INTERNAL_ERROR, "Internal server error."),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ServerError::field("email", "Enter a valid email address."), StatusCode::BAD_REQUEST),
            (ServerError::NotFound("Recipe".to_string()), StatusCode::NOT_FOUND),
            (ServerError::AuthenticationRequired, StatusCode::UNAUTHORIZED),
            (ServerError::Auth(auth::AuthError::InvalidCredentials), StatusCode::BAD_REQUEST),
            (ServerError::Auth(auth::AuthError::InvalidToken), StatusCode::UNAUTHORIZED),
            (StoreError::not_found("Recipe", 1).into(), StatusCode::NOT_FOUND),
            (
                StoreError::InvalidData("bad".to_string()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }
}
