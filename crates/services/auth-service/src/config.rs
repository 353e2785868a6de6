//! Auth service configuration.

use std::env;

use chrono::Duration;
use common::{AppError, AppResult, Environment, JwtConfig};
use domain::{DEFAULT_INVITATION_EXPIRY_HOURS, MAX_INVITATION_EXPIRY_HOURS};

const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_NAME: &str = "Social";

/// Auth service configuration.
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    pub environment: Environment,
    /// Session token signing
    pub jwt: JwtConfig,
    /// Lifetime of an invitation token
    pub invitation_expiry_hours: i64,
    /// Base of the activation link mailed to registrants
    pub frontend_url: String,
    /// Return the plaintext invitation token in the registration response
    pub expose_activation_token: bool,
    /// `None` selects the no-op mailer
    pub smtp: Option<SmtpConfig>,
}

impl AuthServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let environment = lookup("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();
        let jwt = JwtConfig::from_lookup(&lookup)?;

        Ok(Self {
            environment,
            jwt,
            invitation_expiry_hours: lookup("INVITATION_EXPIRY_HOURS")
                .and_then(|h| h.parse().ok())
                .filter(|h: &i64| (1..=MAX_INVITATION_EXPIRY_HOURS).contains(h))
                .unwrap_or(DEFAULT_INVITATION_EXPIRY_HOURS),
            frontend_url: lookup("FRONTEND_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
            expose_activation_token: lookup("EXPOSE_ACTIVATION_TOKEN")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(!environment.is_production()),
            smtp: SmtpConfig::from_lookup(&lookup),
        })
    }

    /// Invitation lifetime; fails when `invitation_expiry_hours` is out of range.
    pub fn invitation_ttl(&self) -> AppResult<Duration> {
        if !(1..=MAX_INVITATION_EXPIRY_HOURS).contains(&self.invitation_expiry_hours) {
            return Err(AppError::internal(format!(
                "INVITATION_EXPIRY_HOURS must be between 1 and {}",
                MAX_INVITATION_EXPIRY_HOURS
            )));
        }
        Duration::try_hours(self.invitation_expiry_hours)
            .ok_or_else(|| AppError::internal("INVITATION_EXPIRY_HOURS out of range"))
    }

    /// Mail is sent in sandbox mode everywhere except production.
    pub fn mail_sandbox(&self) -> bool {
        !self.environment.is_production()
    }

    /// Link the registrant follows to redeem the invitation.
    pub fn activation_url(&self, token: &str) -> String {
        format!("{}/confirm/{}", self.frontend_url, token)
    }
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            jwt: JwtConfig::default(),
            invitation_expiry_hours: DEFAULT_INVITATION_EXPIRY_HOURS,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            expose_activation_token: true,
            smtp: None,
        }
    }
}

/// SMTP delivery settings.
#[derive(Clone, Default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    /// Implicit TLS; port 465 always uses it
    pub use_tls: bool,
    pub insecure_skip_verify: bool,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("use_tls", &self.use_tls)
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .finish()
    }
}

impl SmtpConfig {
    /// Load from environment; `None` when `SMTP_HOST` is unset or empty.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Option<Self> {
        let host = lookup("SMTP_HOST").filter(|h| !h.trim().is_empty())?;

        Some(Self {
            host,
            port: lookup("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            username: lookup("SMTP_USERNAME").unwrap_or_default(),
            password: lookup("SMTP_PASSWORD").unwrap_or_default(),
            from_email: lookup("FROM_EMAIL").unwrap_or_default(),
            from_name: lookup("FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
            use_tls: lookup("SMTP_TLS").and_then(|v| parse_bool(&v)).unwrap_or(false),
            insecure_skip_verify: lookup("SMTP_INSECURE_SKIP_VERIFY")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(false),
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
