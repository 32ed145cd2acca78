//! Signed session tokens.
//!
//! A session is a compact HS256 JWT whose custom claims carry the signed-in
//! identity. The token is the whole session: nothing is stored server-side,
//! so clearing the cookie ends the session.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for session token operations.
#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("Failed to encode session token: {0}")]
    EncodingError(String),

    #[error("Session has expired")]
    Expired,

    #[error("Invalid session token")]
    Invalid,

    #[error("Secret key must not be empty")]
    EmptySecret,
}

/// Registered claims plus the flattened session payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims<T> {
    #[serde(flatten)]
    pub data: T,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique session identifier, useful for log correlation
    pub jti: String,
}

/// Issues and verifies session tokens with a symmetric secret.
#[derive(Clone)]
pub struct SessionSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSigner")
            .field("ttl_secs", &self.ttl_secs)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

impl SessionSigner {
    /// Creates a signer from the application secret key.
    pub fn new(secret_key: &str, ttl_secs: i64) -> Result<Self, SessionTokenError> {
        if secret_key.is_empty() {
            return Err(SessionTokenError::EmptySecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret_key.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret_key.as_bytes()),
            ttl_secs,
        })
    }

    /// Signs `data` into a token valid for the configured lifetime.
    pub fn issue<T: Serialize>(&self, data: &T) -> Result<String, SessionTokenError> {
        let now = Utc::now();
        let claims = SessionClaims {
            data,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionTokenError::EncodingError(e.to_string()))
    }

    /// Verifies signature and expiry, returning the full claims.
    pub fn verify<T: DeserializeOwned>(
        &self,
        token: &str,
    ) -> Result<SessionClaims<T>, SessionTokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<SessionClaims<T>>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionTokenError::Expired,
                _ => SessionTokenError::Invalid,
            })
    }
}
