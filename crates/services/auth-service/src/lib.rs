//! Auth Service Library
//!
//! Onboarding and authentication workflows: registration with invitation
//! mail, invitation redemption and session tokens. Storage comes from the
//! account service through [`AccountRepository`]; the gateway exposes the
//! workflows over HTTP.

pub mod config;
pub mod mailer;
pub mod security;
pub mod service;
pub mod username;
pub mod validation;

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use account_service_lib::AccountRepository;
use common::{AppError, AppResult};
use domain::USER_INVITATION_TEMPLATE;

use crate::config::{AuthServiceConfig, SmtpConfig};
use crate::mailer::{Mailer, SmtpMailer};
use crate::service::Authenticator;

pub use crate::service::{AuthService, Registration, RegisteredAccount, TokenResponse};

/// Build the auth service over the given account store.
///
/// The mailer is chosen from the configuration: SMTP when `SMTP_HOST` is
/// set, otherwise the no-op dispatcher.
pub fn build(
    accounts: Arc<dyn AccountRepository>,
    config: &AuthServiceConfig,
) -> AppResult<Authenticator> {
    let mailer = mailer::from_config(config.smtp.as_ref())?;
    Authenticator::new(accounts, mailer, config)
}

/// Send a sandbox invitation through the configured SMTP server.
pub async fn run_mailtest(to: &str, display_name: &str, activation_url: &str) -> AppResult<u16> {
    let smtp = SmtpConfig::from_env()
        .ok_or_else(|| AppError::internal("SMTP_HOST must be set to send test mail"))?;
    let mailer = SmtpMailer::new(smtp)?;

    let vars = json!({
        "DisplayName": display_name,
        "ActivationURL": activation_url,
    });
    let status = mailer
        .send(USER_INVITATION_TEMPLATE, display_name, to, &vars, true)
        .await?;

    info!(to, status, "Test mail sent");
    Ok(status)
}
