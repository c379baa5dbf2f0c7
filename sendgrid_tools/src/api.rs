use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde_json::json;
use tokio::time::sleep;

use crate::{config::MailerConfig, error::MailerApiError, templates::OrderEmail};

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";
const MAX_SEND_ATTEMPTS: u32 = 3;

/// A thin client over SendGrid's v3 mail send endpoint.
///
/// All sends are fire-and-forget from the caller's perspective. A failed send is retried with
/// exponential backoff (1s, 2s, 4s) before giving up.
#[derive(Clone)]
pub struct MailApi {
    config: MailerConfig,
    client: Arc<Client>,
}

impl MailApi {
    pub fn new(config: MailerConfig) -> Result<Self, MailerApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let auth = format!("Bearer {}", config.api_key.reveal());
        let val =
            HeaderValue::from_str(&auth).map_err(|e| MailerApiError::Initialization(e.to_string()))?;
        headers.insert(AUTHORIZATION, val);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| MailerApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub async fn send_order_confirmation(
        &self,
        to: &str,
        email: &OrderEmail,
    ) -> Result<(), MailerApiError> {
        self.send_with_retry(to, &email.confirmation_subject(), &email.confirmation_body()).await
    }

    pub async fn send_admin_alert(&self, email: &OrderEmail) -> Result<(), MailerApiError> {
        let admin = self.config.admin.clone();
        self.send_with_retry(&admin, &email.admin_subject(), &email.admin_body()).await
    }

    async fn send_with_retry(
        &self,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<(), MailerApiError> {
        if !self.config.enabled {
            debug!("📧 Email sending is disabled. Skipping \"{subject}\" to {to}");
            return Err(MailerApiError::Disabled);
        }
        let mut last_err = MailerApiError::Disabled;
        for attempt in 1..=MAX_SEND_ATTEMPTS {
            match self.send(to, subject, html).await {
                Ok(()) => {
                    debug!("📧 Email \"{subject}\" sent to {to} on attempt {attempt}");
                    return Ok(());
                },
                Err(e) => {
                    warn!("📧 Email send failed (attempt {attempt}/{MAX_SEND_ATTEMPTS}): {e}");
                    last_err = e;
                },
            }
            if attempt < MAX_SEND_ATTEMPTS {
                let delay = Duration::from_secs(1 << (attempt - 1));
                debug!("📧 Retrying in {}ms", delay.as_millis());
                sleep(delay).await;
            }
        }
        Err(last_err)
    }

    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailerApiError> {
        let body = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": self.config.from },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html }],
        });
        let response = self
            .client
            .post(SENDGRID_SEND_URL)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailerApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message =
                response.text().await.map_err(|e| MailerApiError::RestResponseError(e.to_string()))?;
            Err(MailerApiError::QueryError { status, message })
        }
    }
}
