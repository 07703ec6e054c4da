//! Telegram login widget verification.
//!
//! The widget redirects back with a flat set of fields plus a `hash`. A login is
//! trusted only when that hash is the HMAC of the remaining fields keyed by the
//! SHA-256 of the bot token. Accepted identities are handed to a
//! [`SessionHandoff`] implementation; rejected ones never produce a session.

mod login;
pub mod payload;
pub mod router;
pub mod session;
pub mod verifier;

pub use login::{LoginError, LoginOutcome, WidgetLoginService};
pub use payload::{PayloadError, WidgetAuthPayload};
pub use router::widget_auth_router;
pub use session::{JwtSessionIssuer, SessionClaims, SessionError, SessionHandoff, SessionToken};
pub use verifier::{sign, verify, AuthVerificationError, VerifiedIdentity, WidgetAuthVerifier};
