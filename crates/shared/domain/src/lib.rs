//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Its types are shared by the account store, the auth service and the gateway.

pub mod account;
pub mod constants;
pub mod error;
pub mod invitation;
pub mod password;

pub use account::{Account, AccountResponse, AccountStatus, NewAccount, Role};
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use invitation::{Invitation, NewInvitation};
pub use password::Password;
