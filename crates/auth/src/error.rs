//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Hashing a password failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Email/password pair did not match an active account.
    #[error("Unable to authenticate with provided credentials.")]
    InvalidCredentials,

    /// Token missing, malformed or unknown.
    #[error("Invalid token.")]
    InvalidToken,

    /// Token belongs to a deactivated account.
    #[error("User inactive or deleted.")]
    InactiveUser,
}

impl From<password_hash::Error> for AuthError {
    fn from(e: password_hash::Error) -> Self {
        AuthError::PasswordHash(e.to_string())
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
