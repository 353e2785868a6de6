//! SMTP mailer backed by lettre.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde_json::Value;

use common::{AppError, AppResult};

use super::{MailTemplates, Mailer};
use crate::config::SmtpConfig;

/// Port on which SMTP servers expect implicit TLS
const SMTPS_PORT: u16 = 465;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    templates: MailTemplates,
}

impl SmtpMailer {
    /// Build the transport; fails when a required setting is missing.
    pub fn new(config: SmtpConfig) -> AppResult<Self> {
        validate(&config)?;

        let from_address = config
            .from_email
            .parse()
            .map_err(|e| AppError::internal(format!("FROM_EMAIL is invalid: {e}")))?;
        let from = Mailbox::new(Some(config.from_name.clone()), from_address);

        let tls_parameters = TlsParameters::builder(config.host.clone())
            .dangerous_accept_invalid_certs(config.insecure_skip_verify)
            .build()
            .map_err(|e| AppError::internal(format!("SMTP TLS setup failed: {e}")))?;
        let tls = if config.use_tls || config.port == SMTPS_PORT {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Required(tls_parameters)
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
            .port(config.port)
            .tls(tls)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self {
            transport,
            from,
            templates: MailTemplates::new()?,
        })
    }

    fn build_message(
        &self,
        template: &str,
        display_name: &str,
        email: &str,
        vars: &Value,
    ) -> AppResult<Message> {
        let rendered = self.templates.render(template, vars)?;
        let to_address = email
            .parse()
            .map_err(|e| AppError::mail(format!("invalid recipient: {e}")))?;

        Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(Some(display_name.to_string()), to_address))
            .subject(rendered.subject)
            .header(ContentType::TEXT_HTML)
            .body(rendered.body)
            .map_err(|e| AppError::mail(format!("build message: {e}")))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        template: &str,
        display_name: &str,
        email: &str,
        vars: &Value,
        is_sandbox: bool,
    ) -> AppResult<u16> {
        let message = self.build_message(template, display_name, email, vars)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| AppError::mail(format!("SMTP delivery failed: {e}")))?;

        let status = response.code().to_string().parse().unwrap_or_default();
        tracing::info!(template, to = %email, status, sandbox = is_sandbox, "Mail sent");
        Ok(status)
    }
}

fn validate(config: &SmtpConfig) -> AppResult<()> {
    let missing = if config.host.trim().is_empty() {
        Some("SMTP_HOST")
    } else if config.port == 0 {
        Some("SMTP_PORT")
    } else if config.username.is_empty() {
        Some("SMTP_USERNAME")
    } else if config.password.is_empty() {
        Some("SMTP_PASSWORD")
    } else if config.from_email.is_empty() {
        Some("FROM_EMAIL")
    } else {
        None
    };

    match missing {
        Some(key) => Err(AppError::internal(format!("{key} is required for SMTP delivery"))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::USER_INVITATION_TEMPLATE;
    use serde_json::json;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "mailer".to_string(),
            password: "secret".to_string(),
            from_email: "noreply@example.com".to_string(),
            from_name: "Social".to_string(),
            use_tls: false,
            insecure_skip_verify: false,
        }
    }

    #[test]
    fn test_validate_reports_first_missing_setting() {
        let config = SmtpConfig {
            password: String::new(),
            ..config()
        };

        match validate(&config) {
            Err(AppError::Internal(msg)) => assert!(msg.contains("SMTP_PASSWORD")),
            other => panic!("expected internal error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_build_message_renders_template() {
        let mailer = SmtpMailer::new(config()).unwrap();
        let message = mailer
            .build_message(
                USER_INVITATION_TEMPLATE,
                "Ann Lee",
                "ann@example.com",
                &json!({
                    "DisplayName": "Ann Lee",
                    "ActivationURL": "http://localhost:5173/confirm/t0k3n",
                }),
            )
            .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("<ann@example.com>"));
        assert!(raw.contains("Subject: Finish registration with Social"));
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_mail_error() {
        let mailer = SmtpMailer::new(config()).unwrap();
        let result = mailer.build_message(
            USER_INVITATION_TEMPLATE,
            "Ann",
            "not-an-address",
            &json!({ "DisplayName": "Ann", "ActivationURL": "x" }),
        );

        assert!(matches!(result, Err(AppError::Mail(_))));
    }
}
