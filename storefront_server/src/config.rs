use std::env;

use cashfree_tools::CashfreeConfig;
use log::*;
use sendgrid_tools::MailerConfig;
use ts_common::Secret;

const DEFAULT_TSS_HOST: &str = "127.0.0.1";
const DEFAULT_TSS_PORT: u16 = 8360;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// The public URL of the storefront. Used in payment gateway return URLs.
    pub client_url: String,
    /// The public URL of this server. Used in payment gateway webhook registration.
    pub backend_url: String,
    /// Payment gateway credentials and environment.
    pub cashfree: CashfreeConfig,
    /// Transactional email configuration.
    pub mailer: MailerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_TSS_HOST.to_string(),
            port: DEFAULT_TSS_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            client_url: "http://localhost:5173".to_string(),
            backend_url: format!("http://{DEFAULT_TSS_HOST}:{DEFAULT_TSS_PORT}"),
            cashfree: CashfreeConfig::default(),
            mailer: MailerConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("TSS_HOST").ok().unwrap_or_else(|| DEFAULT_TSS_HOST.into());
        let port = env::var("TSS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for TSS_PORT. {e} Using the default, {DEFAULT_TSS_PORT}, instead."
                    );
                    DEFAULT_TSS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_TSS_PORT);
        let database_url = env::var("TSS_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ TSS_DATABASE_URL is not set. Please set it to the URL for the storefront database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let client_url = env::var("TSS_CLIENT_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ TSS_CLIENT_URL is not set. Using http://localhost:5173.");
            "http://localhost:5173".to_string()
        });
        let backend_url = env::var("TSS_BACKEND_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ TSS_BACKEND_URL is not set. Using http://{host}:{port}.");
            format!("http://{host}:{port}")
        });
        let cashfree = CashfreeConfig::new_from_env_or_default();
        let mailer = MailerConfig::new_from_env_or_default();
        Self { host, port, database_url, auth, client_url, backend_url, cashfree, mailer }
    }
}

//-------------------------------------   AuthConfig  ---------------------------------------------

/// The secret used to sign and verify access tokens. Loaded from `TSS_AUTH_SECRET`.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub secret: Secret<String>,
}

impl Default for AuthConfig {
    /// Generates a random signing secret. Tokens will not survive a server restart, so don't use this in production.
    fn default() -> Self {
        warn!(
            "🪛️ Using a random authentication secret. This is only useful for testing. All access tokens will be \
             invalidated when the server restarts. It's better to set TSS_AUTH_SECRET explicitly."
        );
        let nonce = format!("{}{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default(), std::process::id());
        Self { secret: Secret::new(nonce) }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, String> {
        let secret = env::var("TSS_AUTH_SECRET").map_err(|_| "TSS_AUTH_SECRET is not set.".to_string())?;
        if secret.len() < 16 {
            return Err("TSS_AUTH_SECRET must be at least 16 characters long.".to_string());
        }
        Ok(Self { secret: Secret::new(secret) })
    }
}
