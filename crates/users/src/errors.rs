//! Error types for account management.

use courier_database::StoreError;
use thiserror::Error;

/// Result type alias for account operations
pub type UserResult<T> = Result<T, UserError>;

/// Main error type for account management
#[derive(Debug, Error)]
pub enum UserError {
    /// Unknown email or wrong password. Deliberately indistinguishable to
    /// the caller.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailTaken,

    #[error("user not found")]
    UserNotFound,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("password hashing failed")]
    PasswordHash,

    #[error("token creation failed: {0}")]
    TokenCreation(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error(transparent)]
    Store(StoreError),
}

impl UserError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<StoreError> for UserError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken { .. } => Self::EmailTaken,
            StoreError::UserNotFound { .. } => Self::UserNotFound,
            other => Self::Store(other),
        }
    }
}
