//! Boundary events exchanged between a client connection and the router.

use serde::{Deserialize, Serialize};

/// Opaque stable user identifier. Supplied by the client at join time and
/// assumed pre-authenticated by the gateway layer.
pub type UserId = String;

/// Display data for a user, attached to delivered messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl UserSummary {
    /// Placeholder summary when the directory has no record for a user.
    pub fn bare(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            email: String::new(),
        }
    }
}

/// A message as returned by the store gateway after a successful persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: String,
    pub chat_id: String,
    pub sender_id: UserId,
    pub text: String,
    pub created_at: String,
}

/// A persisted message enriched with sender display data, as delivered to
/// connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageView {
    pub id: String,
    pub chat_id: String,
    pub sender: UserSummary,
    pub text: String,
    pub created_at: String,
}

impl MessageView {
    pub fn new(message: StoredMessage, sender: UserSummary) -> Self {
        Self {
            id: message.id,
            chat_id: message.chat_id,
            sender,
            text: message.text,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingKind {
    Start,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceKind {
    Online,
    Offline,
}

/// Client events received from a connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Bind this connection to a user identity
    Join { user_id: UserId },
    /// Send a text message to another user
    SendMessage {
        sender_id: UserId,
        receiver_id: UserId,
        chat_id: String,
        text: String,
    },
    /// Sender started typing in a chat
    TypingStart { chat_id: String, user_id: UserId },
    /// Sender stopped typing in a chat
    TypingStop { chat_id: String, user_id: UserId },
}

/// Server events delivered to connections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A message addressed to this connection's user
    ReceiveMessage { message: MessageView },
    /// Confirmation that a message sent from this connection was persisted
    MessageSent { message: MessageView },
    /// Another chat participant started typing
    TypingStart { user_id: UserId },
    /// Another chat participant stopped typing
    TypingStop { user_id: UserId },
    /// A user came online
    UserOnline { user_id: UserId },
    /// A user went offline
    UserOffline { user_id: UserId },
    /// Error response
    Error { error: String, message: String },
}
