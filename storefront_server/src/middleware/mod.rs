mod hmac;

pub use hmac::{WebhookAuthFactory, WebhookAuthService, SIGNATURE_HEADER, TIMESTAMP_HEADER};
