//! SeaORM entities for the account store.

pub mod account;
pub mod invitation;
