//! Repository for message data access operations.

use crate::entities::ChatMessage;
use crate::types::{StoreError, StoreResult};
use sqlx::{Row, SqlitePool};
use tracing::info;

const MESSAGE_SELECT: &str = "SELECT m.id, m.public_id, m.chat_id,
            c.public_id AS chat_public_id,
            m.sender_id,
            u.public_id AS sender_public_id,
            m.text, m.created_at
     FROM messages m
     JOIN chats c ON c.id = m.chat_id
     JOIN users u ON u.id = m.sender_id";

/// Repository for message database operations
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Create a new message repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new message
    pub async fn create(
        &self,
        chat_id: i64,
        sender_id: i64,
        text: &str,
    ) -> StoreResult<ChatMessage> {
        let public_id = cuid2::cuid();
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO messages (public_id, chat_id, sender_id, text, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(chat_id)
        .bind(sender_id)
        .bind(text)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let message_id = result.last_insert_rowid();

        info!(
            message_id,
            public_id = %public_id,
            chat_id,
            sender_id,
            "created new message"
        );

        let row = sqlx::query(&format!("{MESSAGE_SELECT} WHERE m.id = ?"))
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(map_message)
            .transpose()?
            .ok_or_else(|| StoreError::Database("inserted message row missing".to_string()))
    }

    /// Find a message by its public ID
    pub async fn find_by_public_id(&self, public_id: &str) -> StoreResult<Option<ChatMessage>> {
        let row = sqlx::query(&format!("{MESSAGE_SELECT} WHERE m.public_id = ?"))
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(map_message).transpose()
    }

    /// List all messages in a chat, oldest first
    pub async fn list_by_chat(&self, chat_id: i64) -> StoreResult<Vec<ChatMessage>> {
        let rows = sqlx::query(&format!(
            "{MESSAGE_SELECT} WHERE m.chat_id = ? ORDER BY m.created_at ASC, m.id ASC"
        ))
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(map_message).collect()
    }

    /// Count messages in a chat
    pub async fn count_for_chat(&self, chat_id: i64) -> StoreResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM messages WHERE chat_id = ?")
            .bind(chat_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("count")?)
    }
}

fn map_message(row: sqlx::sqlite::SqliteRow) -> StoreResult<ChatMessage> {
    Ok(ChatMessage {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        chat_id: row.try_get("chat_id")?,
        chat_public_id: row.try_get("chat_public_id")?,
        sender_id: row.try_get("sender_id")?,
        sender_public_id: row.try_get("sender_public_id")?,
        text: row.try_get("text")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::prepare_database;
    use crate::entities::CreateUserRequest;
    use crate::migrations::run_migrations;
    use crate::repos::{ChatRepository, UserRepository};
    use courier_config::DatabaseConfig;
    use tempfile::TempDir;

    struct Fixture {
        pool: SqlitePool,
        chat_id: i64,
        alice_id: i64,
        bob_id: i64,
        _temp_dir: TempDir,
    }

    async fn create_fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_messages.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 1,
        };

        let pool = prepare_database(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let users = UserRepository::new(pool.clone());
        let alice = users
            .create(&CreateUserRequest {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let bob = users
            .create(&CreateUserRequest {
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();

        let chats = ChatRepository::new(pool.clone());
        let chat = chats.create(alice.id, bob.id).await.unwrap();

        Fixture {
            pool,
            chat_id: chat.id,
            alice_id: alice.id,
            bob_id: bob.id,
            _temp_dir: temp_dir,
        }
    }

    #[tokio::test]
    async fn test_create_message_resolves_public_ids() {
        let fixture = create_fixture().await;
        let repo = MessageRepository::new(fixture.pool.clone());

        let message = repo
            .create(fixture.chat_id, fixture.alice_id, "hello")
            .await
            .unwrap();

        assert!(message.id > 0);
        assert!(!message.public_id.is_empty());
        assert!(!message.chat_public_id.is_empty());
        assert!(!message.sender_public_id.is_empty());
        assert_eq!(message.text, "hello");
    }

    #[tokio::test]
    async fn test_list_by_chat_is_ascending() {
        let fixture = create_fixture().await;
        let repo = MessageRepository::new(fixture.pool.clone());

        repo.create(fixture.chat_id, fixture.alice_id, "first").await.unwrap();
        repo.create(fixture.chat_id, fixture.bob_id, "second").await.unwrap();
        repo.create(fixture.chat_id, fixture.alice_id, "third").await.unwrap();

        let messages = repo.list_by_chat(fixture.chat_id).await.unwrap();
        let texts: Vec<&str> = messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_cascade_delete_empties_history() {
        let fixture = create_fixture().await;
        let messages = MessageRepository::new(fixture.pool.clone());
        let chats = ChatRepository::new(fixture.pool.clone());

        messages.create(fixture.chat_id, fixture.alice_id, "one").await.unwrap();
        messages.create(fixture.chat_id, fixture.bob_id, "two").await.unwrap();
        assert_eq!(messages.count_for_chat(fixture.chat_id).await.unwrap(), 2);

        chats.delete_cascade(fixture.chat_id).await.unwrap();

        assert_eq!(messages.count_for_chat(fixture.chat_id).await.unwrap(), 0);
        assert!(messages.list_by_chat(fixture.chat_id).await.unwrap().is_empty());
    }
}
