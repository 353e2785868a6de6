//! Invitation issuer.
//!
//! The plaintext token leaves this module only inside [`IssuedInvitation`],
//! whose `Debug` output hides it.

use chrono::{DateTime, Duration, Utc};

use super::token::{generate_token, sha256_hex};
use common::{AppError, AppResult};
use domain::{NewInvitation, INVITATION_TOKEN_BYTES};

/// A freshly minted invitation token pair.
pub struct IssuedInvitation {
    /// Delivered to the registrant; never stored
    pub plaintext: String,
    /// Stored; never delivered
    pub hash: String,
    pub expires_at: DateTime<Utc>,
}

impl IssuedInvitation {
    /// Storage half of the pair.
    pub fn to_new_invitation(&self) -> NewInvitation {
        NewInvitation {
            token_hash: self.hash.clone(),
            expires_at: self.expires_at,
        }
    }
}

impl std::fmt::Debug for IssuedInvitation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedInvitation")
            .field("plaintext", &"[REDACTED]")
            .field("hash", &self.hash)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Produces invitation tokens with a fixed lifetime.
#[derive(Debug, Clone, Copy)]
pub struct InvitationIssuer {
    ttl: Duration,
}

impl InvitationIssuer {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub fn issue(&self) -> AppResult<IssuedInvitation> {
        self.issue_at(Utc::now())
    }

    pub fn issue_at(&self, now: DateTime<Utc>) -> AppResult<IssuedInvitation> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::internal("invitation expiry out of range"))?;
        let plaintext = generate_token(INVITATION_TOKEN_BYTES);
        let hash = sha256_hex(&plaintext);

        Ok(IssuedInvitation {
            plaintext,
            hash,
            expires_at,
        })
    }

    /// Hash a presented plaintext token for lookup.
    pub fn hash(plaintext: &str) -> String {
        sha256_hex(plaintext)
    }
}
