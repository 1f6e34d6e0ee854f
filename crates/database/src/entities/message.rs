//! Message entity definitions

use serde::{Deserialize, Serialize};

/// A persisted chat message. Immutable once created; removed only when its
/// chat is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub public_id: String,
    pub chat_id: i64,
    pub chat_public_id: String,
    pub sender_id: i64,
    pub sender_public_id: String,
    pub text: String,
    pub created_at: String,
}
