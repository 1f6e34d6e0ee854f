//! Chat entity definitions

use serde::{Deserialize, Serialize};

/// A direct conversation between exactly two users. The participant pair is
/// immutable after creation; `participant_a` always holds the smaller user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub public_id: String,
    pub participant_a: i64,
    pub participant_b: i64,
    pub participant_a_public_id: String,
    pub participant_b_public_id: String,
    pub last_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Chat {
    /// Public ids of both participants.
    pub fn participant_public_ids(&self) -> [&str; 2] {
        [
            self.participant_a_public_id.as_str(),
            self.participant_b_public_id.as_str(),
        ]
    }

    /// Whether the given user takes part in this chat.
    pub fn is_participant(&self, user_public_id: &str) -> bool {
        self.participant_a_public_id == user_public_id
            || self.participant_b_public_id == user_public_id
    }

    /// The other participant's public id, if the given user is a participant.
    pub fn peer_of(&self, user_public_id: &str) -> Option<&str> {
        if self.participant_a_public_id == user_public_id {
            Some(self.participant_b_public_id.as_str())
        } else if self.participant_b_public_id == user_public_id {
            Some(self.participant_a_public_id.as_str())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat() -> Chat {
        Chat {
            id: 1,
            public_id: "chat-1".to_string(),
            participant_a: 1,
            participant_b: 2,
            participant_a_public_id: "alice".to_string(),
            participant_b_public_id: "bob".to_string(),
            last_message: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn participant_checks() {
        let chat = chat();
        assert!(chat.is_participant("alice"));
        assert!(chat.is_participant("bob"));
        assert!(!chat.is_participant("mallory"));
    }

    #[test]
    fn peer_resolution() {
        let chat = chat();
        assert_eq!(chat.peer_of("alice"), Some("bob"));
        assert_eq!(chat.peer_of("bob"), Some("alice"));
        assert_eq!(chat.peer_of("mallory"), None);
    }
}
