//! Mailer that accepts everything and delivers nothing.

use async_trait::async_trait;
use serde_json::Value;

use common::AppResult;

use super::Mailer;

const ACCEPTED: u16 = 200;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMailer;

impl NoopMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(
        &self,
        template: &str,
        _display_name: &str,
        email: &str,
        _vars: &Value,
        is_sandbox: bool,
    ) -> AppResult<u16> {
        tracing::debug!(template, to = %email, sandbox = is_sandbox, "Mail not sent (no-op mailer)");
        Ok(ACCEPTED)
    }
}
