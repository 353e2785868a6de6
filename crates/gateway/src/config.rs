//! Gateway configuration.

use std::env;

use account_service_lib::AccountServiceConfig;
use auth_service_lib::config::AuthServiceConfig;
use common::AppResult;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Account store connection
    pub accounts: AccountServiceConfig,
    /// Onboarding and session settings
    pub auth: AuthServiceConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            host: env::var("GATEWAY_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("GATEWAY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            accounts: AccountServiceConfig::from_env(),
            auth: AuthServiceConfig::from_env()?,
        })
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            accounts: AccountServiceConfig::default(),
            auth: AuthServiceConfig::default(),
        }
    }
}
