//! JWT token issuance and validation
//!
//! Tokens are stateless HS256 JWTs carrying the user's email and id.
//! Validity is decided purely by signature and expiry, with no leeway.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use power_bills_shared::AuthError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Pre-computed JWT keys
/// These are derived once from the secret and shared through AppState
#[derive(Clone)]
struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
        }
    }
}

/// JWT service for token operations
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
    expiry_secs: i64,
}

impl JwtService {
    /// Create a new JWT service
    ///
    /// Call this once at application startup and store in AppState.
    pub fn new(secret: &str, expiry_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            keys: JwtKeys::new(secret.as_bytes()),
            validation: Arc::new(validation),
            expiry_secs,
        }
    }

    /// Issue an access token for a user, valid from now
    #[inline]
    pub fn issue(&self, email: &str, user_id: Uuid) -> Result<String> {
        self.issue_at(email, user_id, Utc::now())
    }

    /// Issue an access token as if it had been minted at `issued_at`
    pub fn issue_at(&self, email: &str, user_id: Uuid, issued_at: DateTime<Utc>) -> Result<String> {
        let exp = issued_at + Duration::seconds(self.expiry_secs);

        let claims = Claims {
            email: email.to_string(),
            user_id: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate access token: {}", e))
    }

    /// Validate a token's signature and expiry and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}
