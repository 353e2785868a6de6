//! Registration saga.
//!
//! Hash password, allocate a username, issue an invitation, persist account
//! and invitation together, then mail the invitation. A delivery failure
//! removes the account again before the error is reported. Between the
//! commit and that compensating delete the email counts as taken, so a
//! concurrent retry with the same address sees `DuplicateEmail`.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use account_service_lib::AccountRepository;
use common::{AppError, AppResult};
use domain::{Account, NewAccount, Password, Role, USER_INVITATION_TEMPLATE};

use crate::config::AuthServiceConfig;
use crate::mailer::Mailer;
use crate::security::{InvitationIssuer, IssuedInvitation};
use crate::username::UsernameAllocator;
use crate::validation::RegistrationValidator;

/// Registration input as submitted by the client.
#[derive(Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    /// Preferred username; generated when absent or taken
    pub username: Option<String>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("country", &self.country)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("password_confirmation", &"[REDACTED]")
            .field("username", &self.username)
            .finish()
    }
}

/// Outcome of a successful registration.
#[derive(Clone)]
pub struct RegisteredAccount {
    pub account: Account,
    /// Plaintext invitation token, present only when exposure is enabled
    pub activation_token: Option<String>,
}

impl std::fmt::Debug for RegisteredAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredAccount")
            .field("account", &self.account)
            .field(
                "activation_token",
                &self.activation_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Trim and lower-case an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Runs the registration saga.
pub struct Registrar {
    accounts: Arc<dyn AccountRepository>,
    mailer: Arc<dyn Mailer>,
    validator: RegistrationValidator,
    invitations: InvitationIssuer,
    config: AuthServiceConfig,
}

impl Registrar {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        mailer: Arc<dyn Mailer>,
        validator: RegistrationValidator,
        config: &AuthServiceConfig,
    ) -> AppResult<Self> {
        Ok(Self {
            accounts,
            mailer,
            validator,
            invitations: InvitationIssuer::new(config.invitation_ttl()?),
            config: config.clone(),
        })
    }

    pub async fn register(&self, input: Registration) -> AppResult<RegisteredAccount> {
        self.validator.validate(&input)?;

        let email = normalize_email(&input.email);
        let password_hash = Password::new(&input.password)?.into_string();
        let allocator = UsernameAllocator::new(&input.first_name, &input.last_name, &email)
            .with_requested(input.username.clone());
        let invitation = self.invitations.issue()?;

        let template = NewAccount {
            username: String::new(),
            email,
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            country: input.country.trim().to_string(),
            password_hash,
            role: Role::User,
        };

        let account = self.persist(&allocator, template, &invitation).await?;
        tracing::info!(account_id = %account.id, username = %account.username, "Account created");

        self.dispatch_invitation(&account, &invitation).await?;

        Ok(RegisteredAccount {
            account,
            activation_token: self.config.expose_activation_token.then_some(invitation.plaintext),
        })
    }

    /// Write account and invitation, retrying with a fresh username on collision.
    async fn persist(
        &self,
        allocator: &UsernameAllocator,
        template: NewAccount,
        invitation: &IssuedInvitation,
    ) -> AppResult<Account> {
        for attempt in 0..allocator.max_attempts() {
            let candidate = NewAccount {
                username: allocator.candidate(attempt),
                ..template.clone()
            };

            match self
                .accounts
                .create_with_invitation(candidate, invitation.to_new_invitation())
                .await
            {
                Ok(account) => return Ok(account),
                Err(AppError::DuplicateUsername) => {
                    tracing::debug!(attempt, "Username taken, retrying with a new candidate");
                }
                Err(err) => return Err(err),
            }
        }

        tracing::warn!(
            attempts = allocator.max_attempts(),
            "Username allocation exhausted"
        );
        Err(AppError::DuplicateUsername)
    }

    async fn dispatch_invitation(
        &self,
        account: &Account,
        invitation: &IssuedInvitation,
    ) -> AppResult<()> {
        let display_name = account.display_name();
        let vars = json!({
            "DisplayName": display_name,
            "ActivationURL": self.config.activation_url(&invitation.plaintext),
        });

        match self
            .mailer
            .send(
                USER_INVITATION_TEMPLATE,
                &display_name,
                &account.email,
                &vars,
                self.config.mail_sandbox(),
            )
            .await
        {
            Ok(status) => {
                tracing::info!(account_id = %account.id, status, "Invitation mail sent");
                Ok(())
            }
            Err(err) => {
                tracing::error!(account_id = %account.id, error = ?err, "Invitation mail failed");
                self.compensate(account.id).await;
                Err(into_mail_error(err))
            }
        }
    }

    /// Best-effort removal of an account whose invitation never went out.
    async fn compensate(&self, account_id: Uuid) {
        match self.accounts.delete(account_id).await {
            Ok(()) => tracing::info!(%account_id, "Rolled back account after mail failure"),
            Err(err) => {
                tracing::error!(%account_id, error = ?err, "Compensating delete failed")
            }
        }
    }
}

fn into_mail_error(err: AppError) -> AppError {
    match err {
        AppError::Mail(_) => err,
        other => AppError::mail(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ann@Example.COM "), "ann@example.com");
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let input = Registration {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            country: "NZ".to_string(),
            email: "ann@example.com".to_string(),
            password: "Str0ng!Pass".to_string(),
            password_confirmation: "Str0ng!Pass".to_string(),
            username: None,
        };

        assert!(!format!("{:?}", input).contains("Str0ng!Pass"));
    }

    #[test]
    fn test_non_mail_errors_become_mail_errors() {
        assert!(matches!(
            into_mail_error(AppError::internal("boom")),
            AppError::Mail(_)
        ));
        assert!(matches!(
            into_mail_error(AppError::mail("smtp down")),
            AppError::Mail(msg) if msg == "smtp down"
        ));
    }
}
