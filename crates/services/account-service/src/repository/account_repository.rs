//! Account repository: accounts and their invitations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::entities::account::{
    self, Entity as AccountEntity, IDX_ACCOUNTS_EMAIL_UNIQUE, IDX_ACCOUNTS_USERNAME_UNIQUE,
};
use super::entities::invitation::{self, Entity as InvitationEntity};
use common::{AppError, AppResult};
use domain::{Account, AccountStatus, NewAccount, NewInvitation};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a pending account and its invitation as one unit.
    ///
    /// Either both rows exist afterwards or neither does. Uniqueness
    /// conflicts come back as `DuplicateEmail` / `DuplicateUsername`.
    async fn create_with_invitation(
        &self,
        account: NewAccount,
        invitation: NewInvitation,
    ) -> AppResult<Account>;

    /// Find account by (normalized) email address
    async fn get_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Consume the invitation with this token hash and activate its account.
    ///
    /// Returns `NotFound` when no unconsumed, unexpired invitation matches.
    /// Of two concurrent calls with the same hash at most one succeeds.
    async fn activate_by_token_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Account>;

    /// Remove an account together with its invitation
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// PostgreSQL implementation of AccountRepository
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn create_with_invitation(
        &self,
        account: NewAccount,
        invitation: NewInvitation,
    ) -> AppResult<Account> {
        let txn = self.db.begin().await?;

        match insert_account_with_invitation(&txn, account, invitation).await {
            Ok(model) => {
                txn.commit().await?;
                Ok(Account::from(model))
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback after failed insert failed");
                }
                Err(classify_write_error(err))
            }
        }
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn activate_by_token_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Account> {
        let txn = self.db.begin().await?;

        let invitation = InvitationEntity::find()
            .filter(invitation::Column::TokenHash.eq(token_hash))
            .filter(invitation::Column::ConsumedAt.is_null())
            .filter(invitation::Column::ExpiresAt.gt(now))
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;

        // Compare-and-set: a concurrent redemption leaves zero rows to update
        let consumed = InvitationEntity::update_many()
            .col_expr(invitation::Column::ConsumedAt, Expr::value(now))
            .filter(invitation::Column::Id.eq(invitation.id))
            .filter(invitation::Column::ConsumedAt.is_null())
            .exec(&txn)
            .await?;

        if consumed.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        AccountEntity::update_many()
            .col_expr(
                account::Column::Status,
                Expr::value(AccountStatus::Active.as_str()),
            )
            .col_expr(account::Column::UpdatedAt, Expr::value(now))
            .filter(account::Column::Id.eq(invitation.account_id))
            .exec(&txn)
            .await?;

        let model = AccountEntity::find_by_id(invitation.account_id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;

        txn.commit().await?;
        Ok(Account::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;

        InvitationEntity::delete_many()
            .filter(invitation::Column::AccountId.eq(id))
            .exec(&txn)
            .await?;

        let result = AccountEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        txn.commit().await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        crate::infra::ping(&self.db).await.map_err(AppError::from)
    }
}

async fn insert_account_with_invitation(
    txn: &DatabaseTransaction,
    account: NewAccount,
    invitation: NewInvitation,
) -> Result<account::Model, DbErr> {
    let now = Utc::now();
    let account_id = Uuid::new_v4();

    let model = account::ActiveModel {
        id: Set(account_id),
        username: Set(account.username),
        email: Set(account.email),
        first_name: Set(account.first_name),
        last_name: Set(account.last_name),
        country: Set(account.country),
        password_hash: Set(account.password_hash),
        role: Set(account.role.as_str().to_string()),
        status: Set(AccountStatus::Pending.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await?;

    invitation::ActiveModel {
        id: Set(Uuid::new_v4()),
        account_id: Set(account_id),
        token_hash: Set(invitation.token_hash),
        expires_at: Set(invitation.expires_at),
        consumed_at: Set(None),
        created_at: Set(now),
    }
    .insert(txn)
    .await?;

    Ok(model)
}

/// Map unique-index violations onto the conflict they represent.
fn classify_write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => classify_unique_violation(&detail)
            .unwrap_or_else(|| AppError::internal(format!("Unique constraint violated: {detail}"))),
        _ => AppError::from(err),
    }
}

fn classify_unique_violation(detail: &str) -> Option<AppError> {
    if detail.contains(IDX_ACCOUNTS_EMAIL_UNIQUE) {
        Some(AppError::DuplicateEmail)
    } else if detail.contains(IDX_ACCOUNTS_USERNAME_UNIQUE) {
        Some(AppError::DuplicateUsername)
    } else {
        None
    }
}
