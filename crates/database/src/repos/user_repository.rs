//! Repository for user data access operations.

use crate::entities::{CreateUserRequest, User};
use crate::types::{StoreError, StoreResult};
use sqlx::{Row, SqlitePool};
use tracing::info;

const USER_COLUMNS: &str =
    "id, public_id, name, email, password_hash, created_at, updated_at";

/// Repository for user database operations
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user. Fails if the email is already registered.
    pub async fn create(&self, request: &CreateUserRequest) -> StoreResult<User> {
        if self.find_by_email(&request.email).await?.is_some() {
            return Err(StoreError::EmailTaken {
                email: request.email.clone(),
            });
        }

        let public_id = cuid2::cuid();
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO users (public_id, name, email, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&public_id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let user_id = result.last_insert_rowid();

        info!(user_id, public_id = %public_id, "created new user");

        Ok(User {
            id: user_id,
            public_id,
            name: request.name.clone(),
            email: request.email.clone(),
            password_hash: request.password_hash.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Find a user by email address
    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_user).transpose()
    }

    /// Find a user by its public ID
    pub async fn find_by_public_id(&self, public_id: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE public_id = ?"
        ))
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_user).transpose()
    }

    /// Find a user by its internal ID
    pub async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(map_user).transpose()
    }

    /// List all users except the given one, newest first
    pub async fn list_except(&self, public_id: &str) -> StoreResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE public_id != ? ORDER BY created_at DESC"
        ))
        .bind(public_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(map_user).collect()
    }
}

fn map_user(row: sqlx::sqlite::SqliteRow) -> StoreResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        public_id: row.try_get("public_id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::prepare_database;
    use crate::migrations::run_migrations;
    use courier_config::DatabaseConfig;
    use tempfile::TempDir;

    async fn create_test_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_users.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 1,
        };

        let pool = prepare_database(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        (pool, temp_dir)
    }

    fn request(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        let created = repo.create(&request("Alice", "alice@example.com")).await.unwrap();
        assert!(created.id > 0);
        assert!(!created.public_id.is_empty());

        let by_email = repo.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let by_public_id = repo
            .find_by_public_id(&created.public_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_public_id.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        repo.create(&request("Alice", "alice@example.com")).await.unwrap();
        let err = repo
            .create(&request("Alice Again", "alice@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::EmailTaken { .. }));
    }

    #[tokio::test]
    async fn test_list_except_excludes_caller() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        let alice = repo.create(&request("Alice", "alice@example.com")).await.unwrap();
        repo.create(&request("Bob", "bob@example.com")).await.unwrap();

        let others = repo.list_except(&alice.public_id).await.unwrap();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].email, "bob@example.com");
    }
}
