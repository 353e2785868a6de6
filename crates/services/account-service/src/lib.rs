//! Account Service Library
//!
//! Durable storage of accounts and their invitations. The auth service
//! drives it through the [`AccountRepository`] trait; the gateway owns the
//! connection and the migration CLI.

pub mod config;
pub mod infra;
pub mod repository;

use tracing::info;

pub use crate::config::AccountServiceConfig;
pub use crate::infra::Database;
pub use crate::repository::{AccountRepository, AccountStore};

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &AccountServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(config).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Connect to the database, apply pending migrations and build the store.
pub async fn connect_store(config: &AccountServiceConfig) -> Result<AccountStore, sea_orm::DbErr> {
    let db = Database::connect(config).await?;
    Ok(AccountStore::new(db.get_connection()))
}
