//! Migration: Create invitations table.
//!
//! One invitation per account; deleting the account removes its invitation.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_accounts_table::Accounts;
use crate::repository::entities::invitation::{
    IDX_INVITATIONS_ACCOUNT_ID_UNIQUE, IDX_INVITATIONS_TOKEN_HASH_UNIQUE,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Invitations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Invitations::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Invitations::AccountId).uuid().not_null())
                    .col(ColumnDef::new(Invitations::TokenHash).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Invitations::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Invitations::ConsumedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Invitations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invitations_account_id")
                            .from(Invitations::Table, Invitations::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_INVITATIONS_ACCOUNT_ID_UNIQUE)
                    .table(Invitations::Table)
                    .col(Invitations::AccountId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_INVITATIONS_TOKEN_HASH_UNIQUE)
                    .table(Invitations::Table)
                    .col(Invitations::TokenHash)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Invitations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Invitations {
    Table,
    Id,
    AccountId,
    TokenHash,
    ExpiresAt,
    ConsumedAt,
    CreatedAt,
}
