//! Bearer token service.
//!
//! JWT signing and verification with a configured secret and expiry.

use anyhow::{Context, Result};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT issuer claim value.
const ISSUER: &str = "campdex";

/// JWT token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer.
    pub iss: String,
    /// Subject (user ID).
    pub sub: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Token signing/verification service.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_secs: i64,
}

impl TokenService {
    /// Create a new token service with HMAC-SHA256 signing.
    ///
    /// The secret should be loaded from environment configuration and
    /// must be at least 32 bytes (enforced at config load).
    pub fn new(secret: &[u8], expiry_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_secs,
        }
    }

    /// Sign a token for a user.
    pub fn sign(&self, user_id: Uuid) -> Result<String> {
        let now = chrono::Utc::now().timestamp();

        let claims = TokenClaims {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now,
            exp: now + self.expiry_secs,
        };

        let header = Header::new(Algorithm::HS256);
        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .context("failed to encode bearer token")
    }

    /// Verify a token and return its claims.
    ///
    /// Rejects expired tokens and tokens from a different issuer.
    pub fn verify(&self, token: &str) -> Result<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .context("invalid bearer token")?;

        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-test-secret-test-secret!";

    #[test]
    fn sign_and_verify_round_trip() {
        let service = TokenService::new(SECRET, 3600);
        let user_id = Uuid::now_v7();

        let token = service.sign(user_id).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.iss, "campdex");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let service = TokenService::new(SECRET, 3600);
        let other = TokenService::new(b"another-secret-another-secret-xx", 3600);

        let token = service.sign(Uuid::now_v7()).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn expired_token_fails_verification() {
        let service = TokenService::new(SECRET, -3600);

        let token = service.sign(Uuid::now_v7()).unwrap();
        assert!(service.verify(&token).is_err());
    }

    #[test]
    fn garbage_token_fails_verification() {
        let service = TokenService::new(SECRET, 3600);
        assert!(service.verify("not-a-token").is_err());
    }
}
