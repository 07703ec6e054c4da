//! Telegram notifications for connection events.
//!
//! The application layer reports a connection event (request sent, request
//! accepted, new message, interest in an idea); the dispatcher looks up the
//! recipient's linked Telegram chat, renders the matching template and makes a
//! single Bot API call. Delivery is best effort: a failure is reported back as
//! a [`DispatchResult`] and never undoes the action that triggered it.

pub mod dispatcher;
pub mod event;
pub mod gateway;
pub mod router;
pub mod templates;

#[cfg(test)]
mod tests;

pub use dispatcher::{DispatchResult, DispatchSummary, NotificationDispatcher};
pub use event::{
    DispatchRequest, NotificationContext, NotificationEvent, NotificationKind,
    NotificationRejection,
};
pub use gateway::{ChatGateway, DeliveryError, OutboundMessage, ParseMode, TelegramClient};
pub use router::notification_router;
pub use templates::render_message;
