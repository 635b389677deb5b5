//! Bearer tokens for wishlist owners.
//!
//! Owners sign in through the account service, which mints HS256 tokens
//! with the shared secret. This service only verifies them; [`issue_token`]
//! is kept for local tooling and the integration tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wishly_core::types::DbId;

/// Payload of an owner token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Owner's user id.
    pub sub: DbId,
    pub role: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    pub iat: i64,
    /// Random token id; lets the account service revoke single tokens.
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret.
    pub secret: String,
    /// Lifetime of tokens minted by [`issue_token`].
    pub access_token_expiry_mins: i64,
}

const DEFAULT_EXPIRY_MINS: i64 = 15;

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`
    /// (default 15).
    ///
    /// # Panics
    ///
    /// On a missing or empty secret, or a non-numeric expiry. Called once at
    /// start-up.
    pub fn from_env() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ => panic!("JWT_SECRET must be set to a non-empty value"),
        };

        let access_token_expiry_mins = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .ok()
            .map(|raw| {
                raw.parse::<i64>()
                    .expect("JWT_ACCESS_EXPIRY_MINS must be a whole number of minutes")
            })
            .unwrap_or(DEFAULT_EXPIRY_MINS);

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(self.secret.as_bytes())
    }
}

/// Mint a token for `user_id` that expires after the configured lifetime.
pub fn issue_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let issued = Utc::now();
    let expires = issued + Duration::minutes(config.access_token_expiry_mins);

    let claims = Claims {
        sub: user_id,
        role: role.to_owned(),
        exp: expires.timestamp(),
        iat: issued.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };
    let key = EncodingKey::from_secret(config.secret.as_bytes());
    jsonwebtoken::encode(&Header::default(), &claims, &key)
}

/// Check signature and expiry, returning the claims of a valid token.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    jsonwebtoken::decode::<Claims>(token, &config.decoding_key(), &Validation::default())
        .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_owned(),
            access_token_expiry_mins: DEFAULT_EXPIRY_MINS,
        }
    }

    #[test]
    fn issued_token_verifies() {
        let config = config("owner-secret");
        let token = issue_token(42, "user", &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "user");
        assert_eq!(claims.exp - claims.iat, DEFAULT_EXPIRY_MINS * 60);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Well beyond the default 60 second leeway.
        let config = JwtConfig {
            access_token_expiry_mins: -10,
            ..config("owner-secret")
        };
        let token = issue_token(42, "user", &config).unwrap();
        assert!(verify_token(&token, &config).is_err());
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let token = issue_token(42, "user", &config("first-secret")).unwrap();
        assert!(verify_token(&token, &config("second-secret")).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_token("not.a.token", &config("owner-secret")).is_err());
    }
}
