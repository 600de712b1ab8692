//! Hold TTL policy.
//!
//! A hold provisionally reserves quantity for a fixed window; once the
//! window lapses the hold is dead whether or not the sweeper has caught it
//! yet. Every read/mutate path applies the same expiry predicate so lazy
//! and swept expiry always agree.

use chrono::Duration;

use crate::types::Timestamp;

/// Fixed time-to-live for a new hold: 5 minutes.
pub const HOLD_TTL_SECS: i64 = 300;

/// Expiry instant for a hold created at `now`.
pub fn expiry_at(now: Timestamp) -> Timestamp {
    now + Duration::seconds(HOLD_TTL_SECS)
}

/// Whether a hold with the given `expires_at` is past its TTL.
///
/// The boundary counts as expired: a hold expiring exactly at `now` is no
/// longer usable. Conversely the active-quantity sum counts only holds with
/// `expires_at > now`, so the two predicates partition cleanly.
pub fn is_expired(expires_at: Timestamp, now: Timestamp) -> bool {
    expires_at <= now
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn expiry_is_ttl_after_creation() {
        let now = Utc::now();
        assert_eq!(expiry_at(now), now + Duration::seconds(300));
    }

    #[test]
    fn not_expired_before_deadline() {
        let now = Utc::now();
        assert!(!is_expired(now + Duration::seconds(1), now));
    }

    #[test]
    fn expired_exactly_at_deadline() {
        let now = Utc::now();
        assert!(is_expired(now, now));
    }

    #[test]
    fn expired_after_deadline() {
        let now = Utc::now();
        assert!(is_expired(now - Duration::seconds(1), now));
    }
}
