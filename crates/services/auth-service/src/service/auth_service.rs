//! Authentication service - registration, activation and login.
//!
//! SOLID (SRP): each workflow lives in its own component; this facade only
//! routes calls to them.

use std::sync::Arc;

use async_trait::async_trait;

use account_service_lib::AccountRepository;
use common::AppResult;
use domain::Account;

use super::activation::Activator;
use super::registration::{RegisteredAccount, Registrar, Registration};
use super::session::{Claims, SessionIssuer, TokenResponse};
use crate::config::AuthServiceConfig;
use crate::mailer::Mailer;
use crate::validation::RegistrationValidator;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a pending account and mail its invitation
    async fn register(&self, input: Registration) -> AppResult<RegisteredAccount>;

    /// Redeem an invitation token
    async fn activate(&self, token: String) -> AppResult<Account>;

    /// Exchange credentials for a session token
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Verify a session token and extract its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    registrar: Registrar,
    activator: Activator,
    sessions: SessionIssuer,
}

impl Authenticator {
    /// Wire the workflows around one account store and mailer.
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        mailer: Arc<dyn Mailer>,
        config: &AuthServiceConfig,
    ) -> AppResult<Self> {
        let validator = RegistrationValidator::new()?;

        Ok(Self {
            registrar: Registrar::new(accounts.clone(), mailer, validator, config)?,
            activator: Activator::new(accounts.clone()),
            sessions: SessionIssuer::new(accounts, config.jwt.clone())?,
        })
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, input: Registration) -> AppResult<RegisteredAccount> {
        self.registrar.register(input).await
    }

    async fn activate(&self, token: String) -> AppResult<Account> {
        self.activator.activate(&token).await
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        self.sessions.issue(&email, &password).await
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        self.sessions.verify(token)
    }
}
