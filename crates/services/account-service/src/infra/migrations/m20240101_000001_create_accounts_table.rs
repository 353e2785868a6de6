//! Migration: Create accounts table.

use sea_orm_migration::prelude::*;

use crate::repository::entities::account::{IDX_ACCOUNTS_EMAIL_UNIQUE, IDX_ACCOUNTS_USERNAME_UNIQUE};
use domain::{ROLE_USER, STATUS_PENDING};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Accounts::Username).string_len(100).not_null())
                    .col(ColumnDef::new(Accounts::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Accounts::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Accounts::LastName).string_len(100).not_null())
                    .col(ColumnDef::new(Accounts::Country).string_len(100).not_null())
                    .col(ColumnDef::new(Accounts::PasswordHash).text().not_null())
                    .col(
                        ColumnDef::new(Accounts::Role)
                            .string_len(32)
                            .not_null()
                            .default(ROLE_USER),
                    )
                    .col(
                        ColumnDef::new(Accounts::Status)
                            .string_len(16)
                            .not_null()
                            .default(STATUS_PENDING),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Named unique indexes: conflict reports carry these names
        manager
            .create_index(
                Index::create()
                    .name(IDX_ACCOUNTS_EMAIL_UNIQUE)
                    .table(Accounts::Table)
                    .col(Accounts::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_ACCOUNTS_USERNAME_UNIQUE)
                    .table(Accounts::Table)
                    .col(Accounts::Username)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Accounts {
    Table,
    Id,
    Username,
    Email,
    FirstName,
    LastName,
    Country,
    PasswordHash,
    Role,
    Status,
    CreatedAt,
    UpdatedAt,
}
