//! Shared application state for the gateway.

use std::sync::Arc;

use courier_config::AuthConfig;
use courier_database::{ChatRepository, MessageRepository, User, UserRepository};
use courier_relay::{ConnectionRegistry, MessageRouter};
use courier_users::AccountService;
use sqlx::SqlitePool;

use crate::error::ApiError;
use crate::store::SqlStoreGateway;

/// Everything a request handler needs: the database repositories, the
/// account service, and the shared relay router.
#[derive(Clone)]
pub struct AppState {
    pool: SqlitePool,
    accounts: Arc<AccountService>,
    router: Arc<MessageRouter<SqlStoreGateway>>,
}

impl AppState {
    pub fn new(pool: SqlitePool, auth: &AuthConfig) -> Self {
        let accounts = Arc::new(AccountService::new(pool.clone(), auth));
        let store = Arc::new(SqlStoreGateway::new(pool.clone()));
        let router = Arc::new(MessageRouter::new(ConnectionRegistry::new(), store));

        Self {
            pool,
            accounts,
            router,
        }
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn router(&self) -> Arc<MessageRouter<SqlStoreGateway>> {
        self.router.clone()
    }

    pub fn chats(&self) -> ChatRepository {
        ChatRepository::new(self.pool.clone())
    }

    pub fn messages(&self) -> MessageRepository {
        MessageRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Resolve a bearer token to the account it belongs to.
    pub async fn authenticate(&self, token: &str) -> Result<User, ApiError> {
        self.accounts
            .authenticate(token)
            .await
            .map_err(ApiError::from)
    }
}
