//! JWT service for token generation and validation
//!
//! Tokens are signed with HS256 using a shared secret and carry the user's
//! username plus the display fields the presentation layer needs, so a
//! verified token is sufficient to serve most requests without a registry
//! lookup.

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::User;

const DEV_SECRET: &str = "playdeck-dev-secret-change-in-production";

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Token expiration time in seconds (default: 24 hours)
    pub token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Shared signing secret (a development default is used when unset)
    /// - `JWT_TOKEN_EXPIRY`: Token expiry in seconds (default: 86400)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using development secret");
            DEV_SECRET.to_string()
        });

        let token_expiry = std::env::var("JWT_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "86400".to_string()) // 24 hours
            .parse()
            .unwrap_or(86400);

        Ok(JwtConfig {
            secret,
            token_expiry,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the authenticated user
    pub sub: String,
    /// Display name
    pub name: String,
    /// Display image URL
    pub image_url: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;

        JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Issue a token for a user
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: user.username.clone(),
            name: user.name.clone(),
            image_url: user.image_url.clone(),
            iat: now,
            exp: now + self.config.token_expiry,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a token and return the claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Get the token expiry time in seconds
    pub fn token_expiry(&self) -> u64 {
        self.config.token_expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn test_user() -> User {
        User {
            username: "alice".to_string(),
            name: "Alice".to_string(),
            image_url: "https://example.com/a.png".to_string(),
            password_hash: "irrelevant".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        // SAFETY: serialized test, no concurrent env access
        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("JWT_TOKEN_EXPIRY");
        }
        let config = JwtConfig::from_env().expect("Failed to create JWT config");
        assert_eq!(config.secret, DEV_SECRET);
        assert_eq!(config.token_expiry, 86400);
    }

    #[test]
    fn test_issue_then_verify_round_trips_claims() {
        let service = JwtService::new(JwtConfig {
            secret: "test-secret".to_string(),
            token_expiry: 60,
        });

        let token = service.issue(&test_user()).expect("Failed to issue token");
        let claims = service.verify(&token).expect("Failed to verify token");

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.name, "Alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_rejects_token_from_other_secret() {
        let issuer = JwtService::new(JwtConfig {
            secret: "secret-a".to_string(),
            token_expiry: 60,
        });
        let verifier = JwtService::new(JwtConfig {
            secret: "secret-b".to_string(),
            token_expiry: 60,
        });

        let token = issuer.issue(&test_user()).expect("Failed to issue token");
        assert!(verifier.verify(&token).is_err());
    }
}
