use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::event::{DispatchRequest, NotificationEvent, NotificationRejection};
use super::gateway::{ChatGateway, DeliveryError, OutboundMessage, ParseMode};
use super::templates::render_message;
use crate::config::ApplicationConfig;
use crate::profiles::{ProfileRepository, RepositoryError};

/// Outcome of a single dispatch. Every path is a value; nothing is raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    Sent,
    /// The recipient has not linked Telegram; there is nothing to deliver.
    SkippedNoHandle,
    ValidationFailed(NotificationRejection),
    DeliveryFailed(DeliveryError),
    /// The profile store could not be consulted.
    LookupFailed(String),
}

impl DispatchResult {
    /// Label used in logs and JSON responses.
    pub fn label(&self) -> &'static str {
        match self {
            DispatchResult::Sent => "sent",
            DispatchResult::SkippedNoHandle => "skipped_no_handle",
            DispatchResult::ValidationFailed(_) => "validation_failed",
            DispatchResult::DeliveryFailed(_) => "delivery_failed",
            DispatchResult::LookupFailed(_) => "lookup_failed",
        }
    }
}

/// Compact summary for callers that only audit outcomes.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl From<&DispatchResult> for DispatchSummary {
    fn from(result: &DispatchResult) -> Self {
        let detail = match result {
            DispatchResult::Sent | DispatchResult::SkippedNoHandle => None,
            DispatchResult::ValidationFailed(reason) => Some(reason.to_string()),
            DispatchResult::DeliveryFailed(reason) => Some(reason.to_string()),
            DispatchResult::LookupFailed(reason) => Some(reason.clone()),
        };
        Self {
            outcome: result.label(),
            detail,
        }
    }
}

/// Resolves recipients, renders templates and hands messages to the gateway.
pub struct NotificationDispatcher<R, G> {
    repository: Arc<R>,
    gateway: Arc<G>,
    app: ApplicationConfig,
}

impl<R, G> NotificationDispatcher<R, G>
where
    R: ProfileRepository + 'static,
    G: ChatGateway + 'static,
{
    pub fn new(repository: Arc<R>, gateway: Arc<G>, app: ApplicationConfig) -> Self {
        Self {
            repository,
            gateway,
            app,
        }
    }

    /// Validates a raw request and dispatches it.
    pub async fn dispatch_request(&self, request: DispatchRequest) -> DispatchResult {
        match request.validate() {
            Ok(event) => self.dispatch(event).await,
            Err(reason) => {
                debug!(%reason, "notification rejected before lookup");
                DispatchResult::ValidationFailed(reason)
            }
        }
    }

    /// Delivers one event. At most one outbound call is made.
    pub async fn dispatch(&self, event: NotificationEvent) -> DispatchResult {
        let kind = event.kind();

        let profile = match self.repository.fetch_profile(event.target()) {
            Ok(Some(profile)) => profile,
            Ok(None) | Err(RepositoryError::NotFound) => {
                debug!(user_id = %event.target(), %kind, "notification target not found");
                return DispatchResult::ValidationFailed(NotificationRejection::ProfileNotFound(
                    event.target().clone(),
                ));
            }
            Err(RepositoryError::Unavailable(reason)) => {
                warn!(user_id = %event.target(), %kind, %reason, "profile lookup failed");
                return DispatchResult::LookupFailed(reason);
            }
        };

        let Some(chat_id) = profile.telegram_chat_id else {
            debug!(user_id = %event.target(), %kind, "no telegram handle linked, skipping");
            return DispatchResult::SkippedNoHandle;
        };

        let message = OutboundMessage {
            chat_id,
            text: render_message(&event, self.app.base_url()),
            parse_mode: ParseMode::Html,
        };

        match self.gateway.send_message(message).await {
            Ok(()) => {
                info!(user_id = %event.target(), %kind, "telegram notification sent");
                DispatchResult::Sent
            }
            Err(err) => {
                warn!(user_id = %event.target(), %kind, error = %err, "telegram delivery failed");
                DispatchResult::DeliveryFailed(err)
            }
        }
    }
}
