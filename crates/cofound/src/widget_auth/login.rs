use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::payload::WidgetAuthPayload;
use super::session::{SessionError, SessionHandoff, SessionToken};
use super::verifier::{AuthVerificationError, VerifiedIdentity, WidgetAuthVerifier};

/// Verified identity plus the session credential issued for it.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub identity: VerifiedIdentity,
    pub session: SessionToken,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("telegram login rejected: {0}")]
    Rejected(#[from] AuthVerificationError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Verifies widget payloads and hands accepted identities to the session layer.
pub struct WidgetLoginService<S> {
    verifier: WidgetAuthVerifier,
    sessions: Arc<S>,
}

impl<S> WidgetLoginService<S>
where
    S: SessionHandoff,
{
    pub fn new(verifier: WidgetAuthVerifier, sessions: Arc<S>) -> Self {
        Self { verifier, sessions }
    }

    pub fn login(
        &self,
        payload: &WidgetAuthPayload,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, LoginError> {
        let identity = match self.verifier.authenticate(payload, now) {
            Ok(identity) => identity,
            Err(err) => {
                warn!(
                    target: "security",
                    reason = %err,
                    telegram_id = payload.get("id").unwrap_or("-"),
                    "rejected telegram login"
                );
                return Err(err.into());
            }
        };

        let session = self.sessions.issue(&identity)?;
        info!(telegram_id = identity.telegram_id, "telegram login accepted");
        Ok(LoginOutcome { identity, session })
    }
}
