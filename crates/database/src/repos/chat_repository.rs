//! Repository for chat data access operations.

use crate::entities::Chat;
use crate::types::{StoreError, StoreResult};
use sqlx::{Row, SqlitePool};
use tracing::info;

const CHAT_SELECT: &str = "SELECT c.id, c.public_id, c.participant_a, c.participant_b,
            ua.public_id AS participant_a_public_id,
            ub.public_id AS participant_b_public_id,
            c.last_message, c.created_at, c.updated_at
     FROM chats c
     JOIN users ua ON ua.id = c.participant_a
     JOIN users ub ON ub.id = c.participant_b";

/// Repository for chat database operations
pub struct ChatRepository {
    pool: SqlitePool,
}

impl ChatRepository {
    /// Create a new chat repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a chat by its public ID
    pub async fn find_by_public_id(&self, public_id: &str) -> StoreResult<Option<Chat>> {
        let row = sqlx::query(&format!("{CHAT_SELECT} WHERE c.public_id = ?"))
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(map_chat).transpose()
    }

    /// Find the chat between two users, regardless of argument order
    pub async fn find_between(&self, user_a: i64, user_b: i64) -> StoreResult<Option<Chat>> {
        let (low, high) = ordered_pair(user_a, user_b);

        let row = sqlx::query(&format!(
            "{CHAT_SELECT} WHERE c.participant_a = ? AND c.participant_b = ?"
        ))
        .bind(low)
        .bind(high)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_chat).transpose()
    }

    /// Create the chat between two users. The pair is stored in normalized
    /// order so the unique index covers both argument orderings.
    pub async fn create(&self, user_a: i64, user_b: i64) -> StoreResult<Chat> {
        let (low, high) = ordered_pair(user_a, user_b);
        let public_id = cuid2::cuid();
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO chats (public_id, participant_a, participant_b, last_message, created_at, updated_at)
             VALUES (?, ?, ?, NULL, ?, ?)",
        )
        .bind(&public_id)
        .bind(low)
        .bind(high)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        info!(public_id = %public_id, participant_a = low, participant_b = high, "created new chat");

        self.find_by_public_id(&public_id)
            .await?
            .ok_or_else(|| StoreError::chat_not_found(public_id))
    }

    /// Find the chat between two users, creating it on first contact.
    pub async fn find_or_create(&self, user_a: i64, user_b: i64) -> StoreResult<Chat> {
        if let Some(chat) = self.find_between(user_a, user_b).await? {
            return Ok(chat);
        }

        match self.create(user_a, user_b).await {
            Ok(chat) => Ok(chat),
            // Lost a creation race; the other insert won, fetch it.
            Err(StoreError::Database(_)) => self
                .find_between(user_a, user_b)
                .await?
                .ok_or_else(|| StoreError::chat_not_found(format!("{user_a}/{user_b}"))),
            Err(err) => Err(err),
        }
    }

    /// List all chats a user takes part in, most recently updated first
    pub async fn find_by_user(&self, user_id: i64) -> StoreResult<Vec<Chat>> {
        let rows = sqlx::query(&format!(
            "{CHAT_SELECT} WHERE c.participant_a = ? OR c.participant_b = ?
             ORDER BY c.updated_at DESC"
        ))
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(map_chat).collect()
    }

    /// Update the denormalized last-message summary
    pub async fn touch_last_message(&self, chat_id: i64, text: &str) -> StoreResult<()> {
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query("UPDATE chats SET last_message = ?, updated_at = ? WHERE id = ?")
            .bind(text)
            .bind(&now)
            .bind(chat_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a chat and all of its messages. Messages are removed first so a
    /// partial failure never leaves orphaned rows.
    pub async fn delete_cascade(&self, chat_id: i64) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM messages WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM chats WHERE id = ?")
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::chat_not_found(chat_id.to_string()));
        }

        tx.commit().await?;

        info!(chat_id, "deleted chat and its messages");
        Ok(())
    }
}

fn ordered_pair(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn map_chat(row: sqlx::sqlite::SqliteRow) -> StoreResult<Chat> {
    Ok(Chat {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        participant_a: row.try_get("participant_a")?,
        participant_b: row.try_get("participant_b")?,
        participant_a_public_id: row.try_get("participant_a_public_id")?,
        participant_b_public_id: row.try_get("participant_b_public_id")?,
        last_message: row.try_get("last_message")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
