//! Token generation and invitation issuance.

mod invitation;
mod token;

pub use invitation::{InvitationIssuer, IssuedInvitation};
pub use token::{generate_token, random_alphanumeric, sha256_hex};
