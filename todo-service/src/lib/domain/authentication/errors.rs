use auth::JwtError;
use auth::TokenKind;
use thiserror::Error;

use crate::user::errors::UserError;

/// Failure kinds of authentication and token handling.
///
/// `UserNotFound` and `InvalidCredentials` stay distinct here; the HTTP layer
/// collapses them into one response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Failed to create token: {0}")]
    TokenCreationFailed(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token type: expected {expected}, got {actual}")]
    InvalidTokenType {
        expected: TokenKind,
        actual: TokenKind,
    },

    #[error("Missing authorization header")]
    MissingAuthHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthHeaderFormat,

    // Infrastructure errors
    #[error("User store error: {0}")]
    Repository(String),

    #[error("Password verification task failed: {0}")]
    PasswordTask(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::EncodingFailed(msg) => AuthError::TokenCreationFailed(msg),
            JwtError::TokenExpired => AuthError::ExpiredToken,
            JwtError::InvalidToken(msg) => AuthError::InvalidToken(msg),
        }
    }
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        AuthError::Repository(err.to_string())
    }
}
