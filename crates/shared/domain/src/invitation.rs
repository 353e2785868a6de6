//! Invitation domain entity.
//!
//! An invitation holds only the SHA-256 hash of the token mailed to the
//! registrant. It is redeemable while unconsumed and unexpired; both
//! consumption and expiry are terminal.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Stored invitation record.
#[derive(Debug, Clone, PartialEq)]
pub struct Invitation {
    pub id: Uuid,
    pub account_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    /// Set once, when the invitation activates its account
    pub consumed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether the invitation can still activate its account at `now`.
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        !self.is_consumed() && !self.is_expired(now)
    }
}

/// Invitation data persisted together with a new account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvitation {
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn invitation(expires_in: Duration, consumed: bool) -> Invitation {
        let now = Utc::now();
        Invitation {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            token_hash: "ab".repeat(32),
            expires_at: now + expires_in,
            consumed_at: consumed.then_some(now),
            created_at: now,
        }
    }

    #[test]
    fn test_fresh_invitation_is_redeemable() {
        assert!(invitation(Duration::hours(1), false).is_redeemable(Utc::now()));
    }

    #[test]
    fn test_consumed_invitation_is_not_redeemable() {
        assert!(!invitation(Duration::hours(1), true).is_redeemable(Utc::now()));
    }

    #[test]
    fn test_expired_invitation_is_not_redeemable() {
        let expired = invitation(Duration::seconds(-1), false);
        assert!(expired.is_expired(Utc::now()));
        assert!(!expired.is_redeemable(Utc::now()));
    }
}
