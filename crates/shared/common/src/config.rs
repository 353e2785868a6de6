//! Shared configuration structures.

use serde::{Deserialize, Serialize};

use domain::{
    DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_TOKEN_ISSUER, MAX_JWT_EXPIRATION_HOURS,
    MIN_JWT_SECRET_LENGTH,
};

use crate::error::{AppError, AppResult};

/// Deployment environment, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Parse `APP_ENV`; anything but `production` is development.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// JWT configuration for session tokens.
#[derive(Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    #[serde(skip_serializing)]
    pub secret: String,
    pub expiration_hours: i64,
    /// `iss` claim
    pub issuer: String,
    /// `aud` claim
    pub audience: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expiration_hours", &self.expiration_hours)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish()
    }
}

impl JwtConfig {
    /// Load configuration through a variable source such as `std::env::var`.
    ///
    /// Debug builds fall back to an insecure development secret when
    /// `JWT_SECRET` is unset; release builds refuse to start without one.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let secret = match lookup("JWT_SECRET") {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            None => {
                return Err(AppError::internal(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let issuer = lookup("JWT_ISSUER").unwrap_or_else(|| DEFAULT_TOKEN_ISSUER.to_string());
        let config = Self {
            secret,
            expiration_hours: lookup("JWT_EXPIRATION_HOURS")
                .and_then(|h| h.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| issuer.clone()),
            issuer,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the security requirements of the configuration.
    pub fn validate(&self) -> AppResult<()> {
        if self.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::internal(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        if !(1..=MAX_JWT_EXPIRATION_HOURS).contains(&self.expiration_hours) {
            return Err(AppError::internal(format!(
                "JWT_EXPIRATION_HOURS must be between 1 and {}",
                MAX_JWT_EXPIRATION_HOURS
            )));
        }
        Ok(())
    }

    /// Get JWT secret as bytes.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            issuer: DEFAULT_TOKEN_ISSUER.to_string(),
            audience: DEFAULT_TOKEN_ISSUER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_environment_parse() {
        assert!(Environment::parse("production").is_production());
        assert!(Environment::parse(" PRODUCTION ").is_production());
        assert!(!Environment::parse("staging").is_production());
        assert!(!Environment::parse("").is_production());
    }

    #[test]
    fn test_jwt_audience_defaults_to_issuer() {
        let config = JwtConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "0123456789abcdef0123456789abcdef"),
            ("JWT_ISSUER", "social-api"),
        ]))
        .unwrap();

        assert_eq!(config.issuer, "social-api");
        assert_eq!(config.audience, "social-api");
        assert_eq!(config.expiration_hours, DEFAULT_JWT_EXPIRATION_HOURS);
    }

    #[test]
    fn test_jwt_short_secret_rejected() {
        let result = JwtConfig::from_lookup(lookup(&[("JWT_SECRET", "short")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_jwt_expiration_bounds() {
        let secret = ("JWT_SECRET", "0123456789abcdef0123456789abcdef");

        for hours in ["0", "-1", "8761", "10000000000000"] {
            let result = JwtConfig::from_lookup(lookup(&[secret, ("JWT_EXPIRATION_HOURS", hours)]));
            assert!(result.is_err(), "{hours} hours accepted");
        }

        let config =
            JwtConfig::from_lookup(lookup(&[secret, ("JWT_EXPIRATION_HOURS", "8760")])).unwrap();
        assert_eq!(config.expiration_hours, MAX_JWT_EXPIRATION_HOURS);
    }

    #[test]
    fn test_jwt_debug_redacts_secret() {
        let config = JwtConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            ..JwtConfig::default()
        };
        let debug = format!("{:?}", config);

        assert!(!debug.contains("0123456789abcdef"));
        assert!(debug.contains("[REDACTED]"));
    }
}
