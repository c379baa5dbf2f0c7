use log::*;
use ts_common::{parse_boolean_flag, Secret};

#[derive(Debug, Clone, Default)]
pub struct MailerConfig {
    pub api_key: Secret<String>,
    /// The verified sender address.
    pub from: String,
    /// Recipient for new-order alerts.
    pub admin: String,
    /// When false, sends are skipped entirely (useful in development and tests).
    pub enabled: bool,
}

impl MailerConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_key = Secret::new(std::env::var("TSS_SENDGRID_API_KEY").unwrap_or_else(|_| {
            warn!("TSS_SENDGRID_API_KEY not set. Emails will fail to send until it is configured.");
            String::default()
        }));
        let from = std::env::var("TSS_EMAIL_FROM").unwrap_or_else(|_| {
            warn!("TSS_EMAIL_FROM not set, using a placeholder sender address");
            "orders@example.com".to_string()
        });
        let admin = std::env::var("TSS_ADMIN_EMAIL").unwrap_or_else(|_| {
            warn!("TSS_ADMIN_EMAIL not set, admin alerts will go to the sender address");
            from.clone()
        });
        let enabled = parse_boolean_flag(std::env::var("TSS_EMAILS_ENABLED").ok(), true);
        Self { api_key, from, admin, enabled }
    }
}
