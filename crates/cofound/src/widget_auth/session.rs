use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::verifier::VerifiedIdentity;
use crate::config::SessionConfig;

/// Session layer entry point: turns a verified identity into a credential.
pub trait SessionHandoff: Send + Sync {
    fn issue(&self, identity: &VerifiedIdentity) -> Result<SessionToken, SessionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub telegram_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session token could not be signed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("session token rejected: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("session lifetime is out of range")]
    InvalidLifetime,
}

/// HS256 JWT issuer keyed by `APP_SESSION_SECRET`.
pub struct JwtSessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtSessionIssuer {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            ttl: config.ttl,
        }
    }

    pub fn issue_at(
        &self,
        identity: &VerifiedIdentity,
        now: DateTime<Utc>,
    ) -> Result<SessionToken, SessionError> {
        let ttl =
            chrono::Duration::from_std(self.ttl).map_err(|_| SessionError::InvalidLifetime)?;
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or(SessionError::InvalidLifetime)?;

        let claims = SessionClaims {
            sub: format!("telegram:{}", identity.telegram_id),
            telegram_id: identity.telegram_id,
            username: identity.username.clone(),
            name: identity.display_name(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(SessionError::Signing)?;
        Ok(SessionToken { token, expires_at })
    }

    /// Validates signature and expiry of a token this issuer produced.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(SessionError::Invalid)
    }
}

impl SessionHandoff for JwtSessionIssuer {
    fn issue(&self, identity: &VerifiedIdentity) -> Result<SessionToken, SessionError> {
        self.issue_at(identity, Utc::now())
    }
}
