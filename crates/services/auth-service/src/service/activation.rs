//! Invitation redemption.

use std::sync::Arc;

use chrono::Utc;

use account_service_lib::AccountRepository;
use common::{AppError, AppResult};
use domain::Account;

use crate::security::InvitationIssuer;

/// Redeems invitation tokens.
pub struct Activator {
    accounts: Arc<dyn AccountRepository>,
}

impl Activator {
    pub fn new(accounts: Arc<dyn AccountRepository>) -> Self {
        Self { accounts }
    }

    /// Activate the account behind `token`.
    ///
    /// Unknown, consumed and expired tokens all yield `InvalidToken`.
    pub async fn activate(&self, token: &str) -> AppResult<Account> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::InvalidToken);
        }

        let hash = InvitationIssuer::hash(token);
        match self.accounts.activate_by_token_hash(&hash, Utc::now()).await {
            Ok(account) => {
                tracing::info!(account_id = %account.id, "Account activated");
                Ok(account)
            }
            Err(AppError::NotFound) => Err(AppError::InvalidToken),
            Err(err) => Err(err),
        }
    }
}
