// JWT token service
// Decision: HS256 with keys owned by the service, never read from ambient
// state. Rotating the secret invalidates everything outstanding.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;

/// Claims embedded in an issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub id: Uuid,
    /// User name
    pub name: String,
    /// User email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Read projection of a user carried inside a token; derived at login,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Issues and verifies signed bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiration: Duration,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            token_expiration: Duration::hours(config.token_expiration_hours),
        }
    }

    /// Issue a signed token for the given identity.
    pub fn issue(&self, identity: &Identity) -> Result<String> {
        let claims = Claims {
            id: identity.id,
            name: identity.name.clone(),
            email: identity.email.clone(),
            exp: (Utc::now() + self.token_expiration).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).context("Failed to encode token")
    }

    /// Validate a bearer token and return its claims. Rejects invalid
    /// signatures, expired tokens and structurally malformed input.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .context("Invalid token")?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            token_expiration_hours: 1,
        }
    }

    fn ana() -> Identity {
        Identity {
            id: Uuid::now_v7(),
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
        }
    }

    #[test]
    fn claims_round_trip() {
        let service = TokenService::new(&test_config());
        let identity = ana();

        let token = service.issue(&identity).unwrap();
        assert!(!token.is_empty());

        let claims = service.verify(&token).unwrap();
        assert_eq!(claims.id, identity.id);
        assert_eq!(claims.name, "Ana");
        assert_eq!(claims.email, "ana@x.com");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn expired_token_fails_even_with_a_valid_signature() {
        let config = test_config();
        let service = TokenService::new(&config);

        // Sign expired claims with the real key: only the exp check can fail
        let claims = Claims {
            id: Uuid::now_v7(),
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn token_signed_with_another_secret_fails() {
        let service = TokenService::new(&test_config());
        let other = TokenService::new(&JwtConfig {
            secret: "a-different-secret".to_string(),
            token_expiration_hours: 1,
        });

        let token = other.issue(&ana()).unwrap();
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn garbage_token_fails() {
        let service = TokenService::new(&test_config());
        assert!(service.verify("not-a-jwt").is_err());
        assert!(service.verify("").is_err());
    }
}
