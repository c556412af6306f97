use std::sync::Arc;

use capsule_core::Failure;
use chrono::Duration;
use jwt_compact::alg::{Hs256, Hs256Key};
use jwt_compact::{AlgorithmExt, Claims, Header, TimeOptions, Token, UntrustedToken};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Why a presented token was rejected
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature or claims")]
    Invalid,
    #[error("token expired")]
    Expired,
}

#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    sub: Uuid,
}

/// Issues and verifies HS256 access tokens
#[derive(Clone)]
pub struct TokenIssuer {
    key: Arc<Hs256Key>,
    ttl: Duration,
}

impl TokenIssuer {
    #[must_use]
    pub fn new(secret: &SecretString, ttl_seconds: u64) -> Self {
        let ttl_seconds = i64::try_from(ttl_seconds).unwrap_or(i64::MAX);
        Self {
            key: Arc::new(Hs256Key::new(secret.expose_secret().as_bytes())),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// Issue a token for the given user
    ///
    /// # Errors
    ///
    /// Returns an internal failure if signing fails
    pub fn issue(&self, user_id: Uuid) -> Result<String, Failure> {
        let time_options = TimeOptions::default();
        let claims = Claims::new(AccessClaims { sub: user_id }).set_duration_and_issuance(&time_options, self.ttl);

        Hs256
            .token(&Header::empty(), &claims, &self.key)
            .map_err(|e| Failure::internal(format!("token creation failed: {e}")))
    }

    /// Verify a raw token and return the user it was issued for
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] when the token is malformed, has a bad
    /// signature, or has expired
    pub fn verify(&self, raw: &str) -> Result<Uuid, TokenError> {
        let untrusted = UntrustedToken::new(raw).map_err(|_| TokenError::Malformed)?;

        let token: Token<AccessClaims> = Hs256
            .validator(&self.key)
            .validate(&untrusted)
            .map_err(|_| TokenError::Invalid)?;

        token
            .claims()
            .validate_expiration(&TimeOptions::default())
            .map_err(|_| TokenError::Expired)?;

        Ok(token.claims().custom.sub)
    }
}
