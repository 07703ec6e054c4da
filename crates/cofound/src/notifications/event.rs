use std::fmt;

use serde::{Deserialize, Serialize};

use crate::profiles::UserId;

/// The four connection events that reach a user over Telegram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ConnectionRequest,
    ConnectionAccepted,
    NewMessage,
    IdeaInterest,
}

impl NotificationKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "connection_request" => Some(Self::ConnectionRequest),
            "connection_accepted" => Some(Self::ConnectionAccepted),
            "new_message" => Some(Self::NewMessage),
            "idea_interest" => Some(Self::IdeaInterest),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConnectionRequest => "connection_request",
            Self::ConnectionAccepted => "connection_accepted",
            Self::NewMessage => "new_message",
            Self::IdeaInterest => "idea_interest",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Raw dispatch body as posted by the application layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub idea_id: Option<String>,
    #[serde(default)]
    pub idea_title: Option<String>,
}

impl DispatchRequest {
    /// Checks the kind and its required context, producing a typed event.
    pub fn validate(self) -> Result<NotificationEvent, NotificationRejection> {
        let user_id = present(self.user_id).ok_or(NotificationRejection::MissingField("userId"))?;
        let raw_kind = present(self.kind).ok_or(NotificationRejection::MissingField("type"))?;
        let kind = NotificationKind::parse(&raw_kind)
            .ok_or(NotificationRejection::UnknownKind(raw_kind))?;
        let sender_name = self.from_name.unwrap_or_default();
        let target = UserId(user_id);

        match kind {
            NotificationKind::ConnectionRequest => {
                NotificationEvent::connection_request(target, sender_name)
            }
            NotificationKind::ConnectionAccepted => {
                NotificationEvent::connection_accepted(target, sender_name)
            }
            NotificationKind::NewMessage => NotificationEvent::new_message(
                target,
                sender_name,
                self.thread_id.unwrap_or_default(),
            ),
            NotificationKind::IdeaInterest => NotificationEvent::idea_interest(
                target,
                sender_name,
                self.idea_id.unwrap_or_default(),
                self.idea_title.unwrap_or_default(),
            ),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(
    value: impl Into<String>,
    field: &'static str,
) -> Result<String, NotificationRejection> {
    present(Some(value.into())).ok_or(NotificationRejection::MissingField(field))
}

/// Kind-specific context; each variant carries exactly what its template needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationContext {
    ConnectionRequest,
    ConnectionAccepted,
    NewMessage { thread_id: String },
    IdeaInterest { idea_id: String, idea_title: String },
}

/// A validated notification ready for dispatch.
///
/// Only the constructors below build one, and they refuse blank recipients,
/// senders and context fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    target: UserId,
    sender_name: String,
    context: NotificationContext,
}

impl NotificationEvent {
    fn build(
        target: UserId,
        sender_name: impl Into<String>,
        context: NotificationContext,
    ) -> Result<Self, NotificationRejection> {
        let target = UserId(required(target.0, "userId")?);
        let sender_name = required(sender_name, "fromName")?;
        Ok(Self {
            target,
            sender_name,
            context,
        })
    }

    pub fn connection_request(
        target: UserId,
        sender_name: impl Into<String>,
    ) -> Result<Self, NotificationRejection> {
        Self::build(target, sender_name, NotificationContext::ConnectionRequest)
    }

    pub fn connection_accepted(
        target: UserId,
        sender_name: impl Into<String>,
    ) -> Result<Self, NotificationRejection> {
        Self::build(target, sender_name, NotificationContext::ConnectionAccepted)
    }

    pub fn new_message(
        target: UserId,
        sender_name: impl Into<String>,
        thread_id: impl Into<String>,
    ) -> Result<Self, NotificationRejection> {
        let thread_id = required(thread_id, "threadId")?;
        Self::build(
            target,
            sender_name,
            NotificationContext::NewMessage { thread_id },
        )
    }

    pub fn idea_interest(
        target: UserId,
        sender_name: impl Into<String>,
        idea_id: impl Into<String>,
        idea_title: impl Into<String>,
    ) -> Result<Self, NotificationRejection> {
        let idea_id = required(idea_id, "ideaId")?;
        let idea_title = required(idea_title, "ideaTitle")?;
        Self::build(
            target,
            sender_name,
            NotificationContext::IdeaInterest {
                idea_id,
                idea_title,
            },
        )
    }

    pub fn target(&self) -> &UserId {
        &self.target
    }

    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    pub fn context(&self) -> &NotificationContext {
        &self.context
    }

    pub fn kind(&self) -> NotificationKind {
        match self.context {
            NotificationContext::ConnectionRequest => NotificationKind::ConnectionRequest,
            NotificationContext::ConnectionAccepted => NotificationKind::ConnectionAccepted,
            NotificationContext::NewMessage { .. } => NotificationKind::NewMessage,
            NotificationContext::IdeaInterest { .. } => NotificationKind::IdeaInterest,
        }
    }
}

/// Reasons a dispatch is refused before anything is delivered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationRejection {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("unknown notification type: {0}")]
    UnknownKind(String),
    #[error("user {0} not found")]
    ProfileNotFound(UserId),
}
