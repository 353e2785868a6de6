//! In-memory account repository for tests.
//!
//! Holds the same guarantees as the PostgreSQL store: email and username are
//! unique, account and invitation are written together, and an invitation is
//! consumed at most once.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::AccountRepository;
use common::{AppError, AppResult};
use domain::{Account, AccountStatus, Invitation, NewAccount, NewInvitation};

#[derive(Default)]
struct State {
    accounts: Vec<Account>,
    invitations: Vec<Invitation>,
}

/// Mutex-guarded account store
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| AppError::internal("account store lock poisoned"))
    }

    /// Number of stored accounts
    pub fn account_count(&self) -> usize {
        self.lock().map(|s| s.accounts.len()).unwrap_or_default()
    }

    /// Number of stored invitations
    pub fn invitation_count(&self) -> usize {
        self.lock().map(|s| s.invitations.len()).unwrap_or_default()
    }

    /// Invitation belonging to the given account
    pub fn invitation_for(&self, account_id: Uuid) -> Option<Invitation> {
        let state = self.lock().ok()?;
        state
            .invitations
            .iter()
            .find(|i| i.account_id == account_id)
            .cloned()
    }

    /// Move the invitation's expiry into the past.
    pub fn expire_invitation(&self, account_id: Uuid) {
        if let Ok(mut state) = self.lock() {
            if let Some(inv) = state
                .invitations
                .iter_mut()
                .find(|i| i.account_id == account_id)
            {
                inv.expires_at = Utc::now() - Duration::seconds(1);
            }
        }
    }
}

#[async_trait]
impl AccountRepository for MemoryStore {
    async fn create_with_invitation(
        &self,
        account: NewAccount,
        invitation: NewInvitation,
    ) -> AppResult<Account> {
        let mut state = self.lock()?;

        if state.accounts.iter().any(|a| a.email == account.email) {
            return Err(AppError::DuplicateEmail);
        }
        if state.accounts.iter().any(|a| a.username == account.username) {
            return Err(AppError::DuplicateUsername);
        }
        if state
            .invitations
            .iter()
            .any(|i| i.token_hash == invitation.token_hash)
        {
            return Err(AppError::internal("invitation token hash collision"));
        }

        let now = Utc::now();
        let created = Account {
            id: Uuid::new_v4(),
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            country: account.country,
            password_hash: account.password_hash,
            role: account.role,
            status: AccountStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        state.invitations.push(Invitation {
            id: Uuid::new_v4(),
            account_id: created.id,
            token_hash: invitation.token_hash,
            expires_at: invitation.expires_at,
            consumed_at: None,
            created_at: now,
        });
        state.accounts.push(created.clone());

        Ok(created)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let state = self.lock()?;
        Ok(state.accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn activate_by_token_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Account> {
        let mut state = self.lock()?;

        let invitation_idx = state
            .invitations
            .iter()
            .position(|i| i.token_hash == token_hash && i.is_redeemable(now))
            .ok_or(AppError::NotFound)?;
        let account_id = state.invitations[invitation_idx].account_id;
        let account_idx = state
            .accounts
            .iter()
            .position(|a| a.id == account_id)
            .ok_or(AppError::NotFound)?;

        // Both rows change together or not at all
        state.invitations[invitation_idx].consumed_at = Some(now);
        let account = &mut state.accounts[account_idx];
        account.status = AccountStatus::Active;
        account.updated_at = now;

        Ok(account.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut state = self.lock()?;

        let before = state.accounts.len();
        state.accounts.retain(|a| a.id != id);
        if state.accounts.len() == before {
            return Err(AppError::NotFound);
        }
        state.invitations.retain(|i| i.account_id != id);

        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
