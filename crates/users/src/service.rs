//! Account service: registration, login, and token-based authentication
//! over the user repository.

use chrono::{DateTime, Utc};
use courier_config::AuthConfig;
use courier_database::{CreateUserRequest, User, UserRepository};
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::{UserError, UserResult};
use crate::password::{hash_password, verify_password};
use crate::token::TokenIssuer;
use crate::validation::{validate_email, validate_name, validate_password};

/// Registration payload.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login payload.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// An access token together with its expiry, as handed to the client.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Registration, login, and token validation. The only component that
/// touches password hashes.
pub struct AccountService {
    users: UserRepository,
    tokens: TokenIssuer,
}

impl AccountService {
    pub fn new(pool: SqlitePool, auth: &AuthConfig) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens: TokenIssuer::new(auth),
        }
    }

    /// Register a new account and issue a token for it.
    pub async fn register(&self, account: NewAccount) -> UserResult<(User, IssuedToken)> {
        validate_name(&account.name)?;
        validate_email(&account.email)?;
        validate_password(&account.password)?;

        let password_hash = hash_password(&account.password)?;
        let user = self
            .users
            .create(&CreateUserRequest {
                name: account.name.trim().to_string(),
                email: account.email,
                password_hash,
            })
            .await?;

        info!(user = %user.public_id, "registered new account");

        let token = self.issue_for(&user)?;
        Ok((user, token))
    }

    /// Verify credentials and issue a token. Unknown email and wrong
    /// password are reported identically.
    pub async fn login(&self, credentials: Credentials) -> UserResult<(User, IssuedToken)> {
        let user = self
            .users
            .find_by_email(&credentials.email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&credentials.password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        info!(user = %user.public_id, "user logged in");

        let token = self.issue_for(&user)?;
        Ok((user, token))
    }

    /// Resolve a bearer token to the account it was issued for.
    pub async fn authenticate(&self, token: &str) -> UserResult<User> {
        let claims = self.tokens.validate(token)?;

        self.users
            .find_by_public_id(&claims.sub)
            .await?
            .ok_or(UserError::UserNotFound)
    }

    /// List every other account, for the contact picker.
    pub async fn list_peers(&self, user_public_id: &str) -> UserResult<Vec<User>> {
        Ok(self.users.list_except(user_public_id).await?)
    }

    fn issue_for(&self, user: &User) -> UserResult<IssuedToken> {
        let (token, expires_at) = self.tokens.issue(&user.public_id)?;
        Ok(IssuedToken { token, expires_at })
    }
}
