//! Transactional email via the SendGrid v3 API.
//!
//! Email is strictly best-effort in the storefront: an order that is already committed must never be failed because
//! the mail provider is down. Callers get a `Result` for logging purposes, but the retry/backoff policy lives here
//! and exhausting it is a log line, not an error the order flow propagates.

mod api;
mod config;
mod error;
mod templates;

pub use api::MailApi;
pub use config::MailerConfig;
pub use error::MailerApiError;
pub use templates::{EmailLineItem, OrderEmail};
