//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Account, AccountStatus, Role};

/// Unique index on `accounts.email`
pub const IDX_ACCOUNTS_EMAIL_UNIQUE: &str = "idx_accounts_email_unique";
/// Unique index on `accounts.username`
pub const IDX_ACCOUNTS_USERNAME_UNIQUE: &str = "idx_accounts_username_unique";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::invitation::Entity")]
    Invitation,
}

impl Related<super::invitation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invitation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Account {
            id: model.id,
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            country: model.country,
            password_hash: model.password_hash,
            role: Role::from(model.role.as_str()),
            status: AccountStatus::from(model.status.as_str()),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
