use std::time::Duration;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use super::payload::WidgetAuthPayload;
use crate::config::TelegramConfig;

type HmacSha256 = Hmac<Sha256>;

/// Checks a widget payload against the bot token.
///
/// The signing key is `SHA-256(bot_secret)`; the signature is HMAC-SHA-256 over
/// the payload's data-check string, hex encoded. Comparison is constant time
/// and ignores hex case. No freshness check happens here.
pub fn verify(payload: &WidgetAuthPayload, bot_secret: &str) -> bool {
    check_signature(payload, &derive_secret_key(bot_secret)).is_ok()
}

/// Hex signature Telegram would attach to `payload` (any `hash` field is ignored).
pub fn sign(payload: &WidgetAuthPayload, bot_secret: &str) -> String {
    hex::encode(compute_mac(payload, &derive_secret_key(bot_secret)))
}

fn derive_secret_key(bot_secret: &str) -> [u8; 32] {
    let digest = Sha256::digest(bot_secret.as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    key
}

fn compute_mac(payload: &WidgetAuthPayload, secret_key: &[u8; 32]) -> Vec<u8> {
    // HMAC takes keys of any length, so construction cannot fail here.
    let mut mac = match HmacSha256::new_from_slice(secret_key) {
        Ok(mac) => mac,
        Err(_) => return Vec::new(),
    };
    mac.update(payload.data_check_string().as_bytes());
    mac.finalize().into_bytes().to_vec()
}

fn check_signature(
    payload: &WidgetAuthPayload,
    secret_key: &[u8; 32],
) -> Result<(), AuthVerificationError> {
    let supplied = payload.hash().ok_or(AuthVerificationError::MissingHash)?;
    let supplied = hex::decode(supplied.trim().to_ascii_lowercase())
        .map_err(|_| AuthVerificationError::MalformedHash)?;
    let expected = compute_mac(payload, secret_key);

    if expected.is_empty()
        || supplied.len() != expected.len()
        || supplied.ct_eq(&expected).unwrap_u8() != 1
    {
        return Err(AuthVerificationError::HashMismatch);
    }
    Ok(())
}

/// Telegram account proven by a verified widget payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedIdentity {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub auth_date: DateTime<Utc>,
}

impl VerifiedIdentity {
    pub fn display_name(&self) -> String {
        let full_name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !full_name.is_empty() {
            full_name
        } else if let Some(username) = &self.username {
            format!("@{username}")
        } else {
            format!("telegram:{}", self.telegram_id)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthVerificationError {
    #[error("payload has no hash")]
    MissingHash,
    #[error("payload hash is not hex")]
    MalformedHash,
    #[error("payload hash does not match")]
    HashMismatch,
    #[error("payload is missing {0}")]
    MissingField(&'static str),
    #[error("payload field {0} is invalid")]
    InvalidField(&'static str),
    #[error("login is {age_secs}s old, older than the allowed {max_age_secs}s")]
    Expired { age_secs: i64, max_age_secs: u64 },
    #[error("login is dated {ahead_secs}s in the future")]
    FromFuture { ahead_secs: i64 },
}

/// Clock drift tolerated between Telegram and this host when a maximum age applies.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Verifier bound to one bot's credentials.
pub struct WidgetAuthVerifier {
    secret_key: [u8; 32],
    max_age: Option<Duration>,
}

impl WidgetAuthVerifier {
    pub fn new(config: &TelegramConfig) -> Self {
        Self {
            secret_key: derive_secret_key(&config.bot_token),
            max_age: config.auth_max_age,
        }
    }

    pub fn verify(&self, payload: &WidgetAuthPayload) -> bool {
        check_signature(payload, &self.secret_key).is_ok()
    }

    /// Verifies the signature, then extracts the identity. `auth_date`
    /// freshness is only enforced when a maximum age is configured, and then
    /// dates more than a minute ahead of `now` are refused as well.
    pub fn authenticate(
        &self,
        payload: &WidgetAuthPayload,
        now: DateTime<Utc>,
    ) -> Result<VerifiedIdentity, AuthVerificationError> {
        check_signature(payload, &self.secret_key)?;

        let telegram_id = payload
            .get("id")
            .ok_or(AuthVerificationError::MissingField("id"))?
            .trim()
            .parse::<i64>()
            .map_err(|_| AuthVerificationError::InvalidField("id"))?;
        let auth_timestamp = payload
            .get("auth_date")
            .ok_or(AuthVerificationError::MissingField("auth_date"))?
            .trim()
            .parse::<i64>()
            .map_err(|_| AuthVerificationError::InvalidField("auth_date"))?;
        let auth_date = DateTime::<Utc>::from_timestamp(auth_timestamp, 0)
            .ok_or(AuthVerificationError::InvalidField("auth_date"))?;

        if let Some(max_age) = self.max_age {
            let age_secs = (now - auth_date).num_seconds();
            let max_age_secs = max_age.as_secs();
            if age_secs < -MAX_CLOCK_SKEW_SECS {
                return Err(AuthVerificationError::FromFuture {
                    ahead_secs: -age_secs,
                });
            }
            if age_secs > i64::try_from(max_age_secs).unwrap_or(i64::MAX) {
                return Err(AuthVerificationError::Expired {
                    age_secs,
                    max_age_secs,
                });
            }
        }

        let optional = |key: &str| {
            payload
                .get(key)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        Ok(VerifiedIdentity {
            telegram_id,
            username: optional("username"),
            first_name: optional("first_name"),
            last_name: optional("last_name"),
            photo_url: optional("photo_url"),
            auth_date,
        })
    }
}

impl std::fmt::Debug for WidgetAuthVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetAuthVerifier")
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}
