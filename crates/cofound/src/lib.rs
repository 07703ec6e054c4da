//! Core of the CoFound co-founder matching service.
//!
//! The crate holds the pieces of the application that carry real logic: the
//! compatibility scorer, the Telegram notification dispatcher and the Telegram
//! login widget verifier. Storage and the chat transport sit behind traits so
//! the HTTP service (and tests) can plug in their own adapters.

pub mod config;
pub mod error;
pub mod matching;
pub mod notifications;
pub mod profiles;
pub mod telemetry;
pub mod widget_auth;
