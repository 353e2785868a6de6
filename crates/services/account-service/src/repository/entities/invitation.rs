//! Invitation database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Invitation;

/// One invitation per account
pub const IDX_INVITATIONS_ACCOUNT_ID_UNIQUE: &str = "idx_invitations_account_id_unique";
pub const IDX_INVITATIONS_TOKEN_HASH_UNIQUE: &str = "idx_invitations_token_hash_unique";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "invitations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub account_id: Uuid,
    /// Hex SHA-256 of the mailed token
    #[sea_orm(unique)]
    pub token_hash: String,
    pub expires_at: DateTimeUtc,
    pub consumed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Invitation {
    fn from(model: Model) -> Self {
        Invitation {
            id: model.id,
            account_id: model.account_id,
            token_hash: model.token_hash,
            expires_at: model.expires_at,
            consumed_at: model.consumed_at,
            created_at: model.created_at,
        }
    }
}
