//! Error types for the relay core.

use thiserror::Error;

use crate::store::PersistenceError;

/// Result type alias for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Main error type for the relay core
#[derive(Debug, Error)]
pub enum RelayError {
    /// Rejected locally before any state change; no event is emitted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The store gateway failed; the operation aborted with no delivery.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl RelayError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
