//! JWT issuance and validation.

use chrono::{DateTime, Duration, Utc};
use courier_config::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::{UserError, UserResult};

const ISSUER: &str = "courier";

/// Claims carried by an access token. `sub` holds the user's public id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,
}

/// Issues and validates HS256 access tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: Duration::seconds(config.token_ttl_seconds.min(i64::MAX as u64) as i64),
        }
    }

    /// Issue a token for a user, returning the token and its expiry.
    pub fn issue(&self, user_public_id: &str) -> UserResult<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + self.ttl;

        let claims = Claims {
            sub: user_public_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            iss: ISSUER.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| UserError::TokenCreation(err.to_string()))?;

        Ok((token, expires_at))
    }

    /// Validate a token and return its claims. Expired or tampered tokens
    /// are rejected.
    pub fn validate(&self, token: &str) -> UserResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|err| UserError::InvalidToken(err.to_string()))?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            jwt_secret: "test-secret-long-enough-for-hs256".to_string(),
            token_ttl_seconds: 3_600,
        })
    }

    #[test]
    fn issue_and_validate_roundtrip() {
        let issuer = issuer();
        let (token, expires_at) = issuer.issue("user-1").unwrap();

        let claims = issuer.validate(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.iss, "courier");
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn tokens_carry_unique_ids() {
        let issuer = issuer();
        let (first, _) = issuer.issue("user-1").unwrap();
        let (second, _) = issuer.issue("user-1").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let issuer = issuer();
        let (token, _) = issuer.issue("user-1").unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        assert!(issuer.validate(&tampered).is_err());
        assert!(issuer.validate("not.a.token").is_err());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let other = TokenIssuer::new(&AuthConfig {
            jwt_secret: "a-different-secret-entirely".to_string(),
            token_ttl_seconds: 3_600,
        });
        let (token, _) = other.issue("user-1").unwrap();

        let err = issuer().validate(&token).unwrap_err();
        assert!(matches!(err, UserError::InvalidToken(_)));
    }
}
