//! Store gateway interface: the relay's seam to durable storage and the
//! user directory. Implemented by the gateway layer over the database
//! repositories; tests use in-memory doubles.

use std::future::Future;
use thiserror::Error;

use crate::events::{StoredMessage, UserId, UserSummary};

/// Failure reported by the store gateway.
#[derive(Debug, Error)]
#[error("persistence failed: {0}")]
pub struct PersistenceError(pub String);

impl PersistenceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Durable storage for messages, as seen by the router.
pub trait MessageStore: Send + Sync {
    /// Persist a message. The message must be durably stored before this
    /// returns successfully.
    fn create_message(
        &self,
        chat_id: &str,
        sender_id: &str,
        text: &str,
    ) -> impl Future<Output = Result<StoredMessage, PersistenceError>> + Send;

    /// Public ids of a chat's participants.
    fn chat_participants(
        &self,
        chat_id: &str,
    ) -> impl Future<Output = Result<Vec<UserId>, PersistenceError>> + Send;
}

/// Lookup of user display data for message enrichment.
pub trait UserDirectory: Send + Sync {
    fn user_summary(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<UserSummary>, PersistenceError>> + Send;
}
