//! JWT session tokens for operator sessions.
//!
//! Sessions are HS256-signed tokens carrying the operator's account id,
//! email, and a unique session id (`jti`) used to key per-session console
//! state. The token lifetime depends on whether the operator asked to be
//! remembered at login.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for session token operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to encode session token: {0}")]
    Encoding(String),

    #[error("Session has expired")]
    Expired,

    #[error("Invalid session token")]
    Invalid,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Operator account id.
    pub sub: String,
    /// Operator email, for the profile view.
    pub email: String,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Unique session id keying per-session console state.
    pub jti: String,
}

/// A freshly issued session token together with its claims.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub claims: SessionClaims,
}

/// Signing and verification keys for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    leeway_secs: u64,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("leeway_secs", &self.leeway_secs)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

/// Default clock-skew tolerance in seconds.
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

impl SessionKeys {
    /// Creates session keys from a shared secret.
    pub fn new(secret: &str) -> Self {
        Self::with_leeway(secret, DEFAULT_LEEWAY_SECS)
    }

    /// Creates session keys with a custom clock-skew tolerance.
    pub fn with_leeway(secret: &str, leeway_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            leeway_secs,
        }
    }

    /// Issues a session token for an operator with the given lifetime.
    pub fn issue(
        &self,
        account_id: &str,
        email: &str,
        ttl_secs: i64,
    ) -> Result<IssuedSession, SessionError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: account_id.to_string(),
            email: email.to_string(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::Encoding(e.to_string()))?;

        Ok(IssuedSession { token, claims })
    }

    /// Verifies a session token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        validation.validate_exp = true;

        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
                _ => SessionError::Invalid,
            })
    }
}
