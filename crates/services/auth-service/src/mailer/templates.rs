//! Handlebars mail templates.
//!
//! Each template has a `<name>.subject` and a `<name>.body` part, embedded
//! at compile time.

use handlebars::Handlebars;
use serde_json::Value;

use common::{AppError, AppResult};
use domain::USER_INVITATION_TEMPLATE;

const TEMPLATES: &[(&str, &str, &str)] = &[(
    USER_INVITATION_TEMPLATE,
    include_str!("../../templates/user_invitation.subject.hbs"),
    include_str!("../../templates/user_invitation.body.hbs"),
)];

/// Subject and HTML body of a rendered template.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMail {
    pub subject: String,
    pub body: String,
}

/// Registry of the embedded templates.
pub struct MailTemplates {
    registry: Handlebars<'static>,
}

impl MailTemplates {
    pub fn new() -> AppResult<Self> {
        let mut registry = Handlebars::new();
        // A variable missing from the bag is an error, not an empty string
        registry.set_strict_mode(true);

        for (name, subject, body) in TEMPLATES {
            registry
                .register_template_string(&subject_key(name), subject.trim())
                .map_err(|e| AppError::internal(format!("template {name}: {e}")))?;
            registry
                .register_template_string(&body_key(name), *body)
                .map_err(|e| AppError::internal(format!("template {name}: {e}")))?;
        }

        Ok(Self { registry })
    }

    pub fn render(&self, template: &str, vars: &Value) -> AppResult<RenderedMail> {
        if !self.registry.has_template(&subject_key(template)) {
            return Err(AppError::mail(format!("unknown mail template: {template}")));
        }

        let subject = self
            .registry
            .render(&subject_key(template), vars)
            .map_err(|e| AppError::mail(format!("render {template} subject: {e}")))?;
        let body = self
            .registry
            .render(&body_key(template), vars)
            .map_err(|e| AppError::mail(format!("render {template} body: {e}")))?;

        Ok(RenderedMail { subject, body })
    }
}

fn subject_key(name: &str) -> String {
    format!("{name}.subject")
}

fn body_key(name: &str) -> String {
    format!("{name}.body")
}
