use log::*;
use ts_common::Secret;

const SANDBOX_BASE_URL: &str = "https://sandbox.cashfree.com/pg";
const PRODUCTION_BASE_URL: &str = "https://api.cashfree.com/pg";
const DEFAULT_API_VERSION: &str = "2023-08-01";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GatewayEnvironment {
    #[default]
    Sandbox,
    Production,
}

#[derive(Debug, Clone, Default)]
pub struct CashfreeConfig {
    pub environment: GatewayEnvironment,
    pub app_id: String,
    pub api_secret: Secret<String>,
    pub api_version: String,
}

impl CashfreeConfig {
    pub fn new_from_env_or_default() -> Self {
        let environment = match std::env::var("TSS_CASHFREE_ENV").map(|s| s.to_lowercase()) {
            Ok(s) if s == "production" || s == "prod" || s == "live" => GatewayEnvironment::Production,
            Ok(_) => GatewayEnvironment::Sandbox,
            Err(_) => {
                warn!("TSS_CASHFREE_ENV not set, using the sandbox gateway");
                GatewayEnvironment::Sandbox
            },
        };
        let app_id = std::env::var("TSS_CASHFREE_APP_ID").unwrap_or_else(|_| {
            warn!("TSS_CASHFREE_APP_ID not set, using a (probably useless) default");
            "TEST0000000000000000".to_string()
        });
        let api_secret = Secret::new(std::env::var("TSS_CASHFREE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("TSS_CASHFREE_SECRET_KEY not set, using a (probably useless) default");
            "cfsk_test_00000000000000".to_string()
        }));
        let api_version = std::env::var("TSS_CASHFREE_API_VERSION").unwrap_or_else(|_| {
            warn!("TSS_CASHFREE_API_VERSION not set, using {DEFAULT_API_VERSION} as default");
            DEFAULT_API_VERSION.to_string()
        });
        Self { environment, app_id, api_secret, api_version }
    }

    pub fn base_url(&self) -> &'static str {
        match self.environment {
            GatewayEnvironment::Sandbox => SANDBOX_BASE_URL,
            GatewayEnvironment::Production => PRODUCTION_BASE_URL,
        }
    }
}
