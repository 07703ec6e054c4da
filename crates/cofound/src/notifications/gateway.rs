use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TelegramConfig;

/// Formatting mode Telegram applies to the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
}

/// Body of a Bot API `sendMessage` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: ParseMode,
}

/// Outbound chat transport, so the dispatcher can be exercised without Telegram.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn send_message(&self, message: OutboundMessage) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("telegram transport error: {0}")]
    Transport(String),
    #[error("telegram rejected message ({status}): {description}")]
    Rejected { status: u16, description: String },
}

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Bot API client posting to `{api_base_url}/bot{token}/sendMessage`.
pub struct TelegramClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, DeliveryError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent("cofound-notifier/0.1")
            .build()
            .map_err(|err| DeliveryError::Transport(err.to_string()))?;

        let endpoint = format!(
            "{}/bot{}/sendMessage",
            config.api_base_url.trim_end_matches('/'),
            config.bot_token
        );

        Ok(Self {
            http_client,
            endpoint,
        })
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient").finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatGateway for TelegramClient {
    async fn send_message(&self, message: OutboundMessage) -> Result<(), DeliveryError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&message)
            .send()
            .await
            // reqwest errors embed the URL, which carries the bot token
            .map_err(|err| DeliveryError::Transport(err.without_url().to_string()))?;

        let status = response.status();
        let body = response.json::<BotApiResponse>().await.ok();

        match body {
            Some(body) if status.is_success() && body.ok => {
                debug!(chat_id = message.chat_id, "telegram accepted message");
                Ok(())
            }
            body => Err(DeliveryError::Rejected {
                status: status.as_u16(),
                description: body
                    .and_then(|body| body.description)
                    .unwrap_or_else(|| {
                        status
                            .canonical_reason()
                            .unwrap_or("unexpected response")
                            .to_string()
                    }),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_message_serializes_bot_api_shape() {
        let message = OutboundMessage {
            chat_id: 555,
            text: "<b>hi</b>".to_string(),
            parse_mode: ParseMode::Html,
        };

        let value = serde_json::to_value(&message).expect("serializes");
        assert_eq!(
            value,
            serde_json::json!({ "chat_id": 555, "text": "<b>hi</b>", "parse_mode": "HTML" })
        );
    }

    #[test]
    fn debug_does_not_leak_endpoint_token() {
        let client = TelegramClient::new(&TelegramConfig::new("123:secret-token"))
            .expect("client builds");
        assert!(!format!("{client:?}").contains("secret-token"));
    }
}
