//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ROLE_ADMIN, ROLE_USER, STATUS_ACTIVE, STATUS_PENDING};

/// Account roles enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::User => ROLE_USER,
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => Role::Admin,
            _ => Role::User,
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::from(s.as_str())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activation state of an account.
///
/// `Pending` -> `Active` happens exactly once, when the invitation is redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Active,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => STATUS_PENDING,
            AccountStatus::Active => STATUS_ACTIVE,
        }
    }
}

impl From<&str> for AccountStatus {
    fn from(s: &str) -> Self {
        match s {
            STATUS_ACTIVE => AccountStatus::Active,
            _ => AccountStatus::Pending,
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Check if the account has been activated
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Name used to address the account holder in mail.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Data needed to persist a new account.
///
/// Carries the hashed credential only; the plain password never reaches this type.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    pub password_hash: String,
    pub role: Role,
}

/// Account response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AccountResponse {
    /// Unique account identifier
    pub id: Uuid,
    /// Public handle
    pub username: String,
    /// Email address
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub country: String,
    /// Account role
    pub role: String,
    /// `pending` until the invitation is redeemed, then `active`
    pub status: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            country: account.country,
            role: account.role.to_string(),
            status: account.status.to_string(),
            created_at: account.created_at,
        }
    }
}
