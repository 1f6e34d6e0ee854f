//! Store gateway: adapts the database repositories to the relay core's
//! storage and directory traits. Everything the router persists or looks
//! up goes through here, keyed by public ids.

use courier_database::{ChatRepository, MessageRepository, UserRepository};
use courier_relay::{MessageStore, PersistenceError, StoredMessage, UserDirectory, UserId, UserSummary};
use sqlx::SqlitePool;

pub struct SqlStoreGateway {
    chats: ChatRepository,
    messages: MessageRepository,
    users: UserRepository,
}

impl SqlStoreGateway {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            chats: ChatRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            users: UserRepository::new(pool),
        }
    }
}

impl MessageStore for SqlStoreGateway {
    /// Persist a message addressed by public ids, then refresh the chat's
    /// denormalized last-message summary.
    async fn create_message(
        &self,
        chat_id: &str,
        sender_id: &str,
        text: &str,
    ) -> Result<StoredMessage, PersistenceError> {
        let chat = self
            .chats
            .find_by_public_id(chat_id)
            .await
            .map_err(|err| PersistenceError::new(err.to_string()))?
            .ok_or_else(|| PersistenceError::new(format!("unknown chat {chat_id}")))?;

        let sender = self
            .users
            .find_by_public_id(sender_id)
            .await
            .map_err(|err| PersistenceError::new(err.to_string()))?
            .ok_or_else(|| PersistenceError::new(format!("unknown sender {sender_id}")))?;

        let message = self
            .messages
            .create(chat.id, sender.id, text)
            .await
            .map_err(|err| PersistenceError::new(err.to_string()))?;

        self.chats
            .touch_last_message(chat.id, text)
            .await
            .map_err(|err| PersistenceError::new(err.to_string()))?;

        Ok(StoredMessage {
            id: message.public_id,
            chat_id: message.chat_public_id,
            sender_id: message.sender_public_id,
            text: message.text,
            created_at: message.created_at,
        })
    }

    async fn chat_participants(&self, chat_id: &str) -> Result<Vec<UserId>, PersistenceError> {
        let chat = self
            .chats
            .find_by_public_id(chat_id)
            .await
            .map_err(|err| PersistenceError::new(err.to_string()))?;

        Ok(chat
            .map(|chat| {
                chat.participant_public_ids()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl UserDirectory for SqlStoreGateway {
    async fn user_summary(&self, user_id: &str) -> Result<Option<UserSummary>, PersistenceError> {
        let user = self
            .users
            .find_by_public_id(user_id)
            .await
            .map_err(|err| PersistenceError::new(err.to_string()))?;

        Ok(user.map(|user| UserSummary {
            id: user.public_id,
            name: user.name,
            email: user.email,
        }))
    }
}
