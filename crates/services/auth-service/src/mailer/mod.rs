//! Mail dispatch.
//!
//! The registrar talks to a [`Mailer`]; which one is decided by whether SMTP
//! is configured.

mod noop;
mod smtp;
mod templates;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use common::AppResult;

use crate::config::SmtpConfig;

pub use noop::NoopMailer;
pub use smtp::SmtpMailer;
pub use templates::{MailTemplates, RenderedMail};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Renders a named template and delivers it.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `template` rendered with `vars` to `email`.
    ///
    /// Returns the delivery status code reported by the transport.
    async fn send(
        &self,
        template: &str,
        display_name: &str,
        email: &str,
        vars: &Value,
        is_sandbox: bool,
    ) -> AppResult<u16>;
}

/// SMTP when configured, otherwise the no-op dispatcher.
pub fn from_config(smtp: Option<&SmtpConfig>) -> AppResult<Arc<dyn Mailer>> {
    match smtp {
        Some(config) => {
            tracing::info!(host = %config.host, port = config.port, "Using SMTP mailer");
            Ok(Arc::new(SmtpMailer::new(config.clone())?))
        }
        None => {
            tracing::warn!("SMTP not configured - invitation mail will not be delivered");
            Ok(Arc::new(NoopMailer::new()))
        }
    }
}
