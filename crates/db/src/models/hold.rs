//! Hold entity models and DTOs.

use kassa_core::holds;
use kassa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::{HoldStatus, StatusId};

/// A row from the `holds` table.
///
/// Status transitions out of HELD are terminal. `released_at` is set exactly
/// once, at the moment the hold leaves HELD (whichever path takes it there).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Hold {
    pub id: DbId,
    pub user_id: DbId,
    pub seance_id: DbId,
    pub quantity: i32,
    pub status_id: StatusId,
    pub idempotency_key: String,
    pub expires_at: Timestamp,
    pub released_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Hold {
    /// Whether the row is still in the HELD state.
    pub fn is_held(&self) -> bool {
        self.status_id == HoldStatus::Held.id()
    }

    /// Transition HELD -> EXPIRED in memory if the TTL has lapsed at `now`,
    /// setting `released_at` if unset. Returns whether a transition
    /// occurred; the caller is responsible for persisting it.
    ///
    /// Applied on every read/mutate path so a stale hold is unusable even
    /// before the sweeper has run.
    pub fn expire_if_needed(&mut self, now: Timestamp) -> bool {
        if self.is_held() && holds::is_expired(self.expires_at, now) {
            self.status_id = HoldStatus::Expired.id();
            if self.released_at.is_none() {
                self.released_at = Some(now);
            }
            return true;
        }
        false
    }
}

/// DTO for `POST /holds`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHold {
    pub user_id: DbId,
    pub seance_id: DbId,
    pub quantity: i32,
    pub idempotency_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn held_hold(expires_at: Timestamp) -> Hold {
        let now = Utc::now();
        Hold {
            id: 1,
            user_id: 7,
            seance_id: 3,
            quantity: 2,
            status_id: HoldStatus::Held.id(),
            idempotency_key: "k1".into(),
            expires_at,
            released_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn expire_if_needed_transitions_stale_held() {
        let now = Utc::now();
        let mut hold = held_hold(now - Duration::seconds(1));

        assert!(hold.expire_if_needed(now));
        assert_eq!(hold.status_id, HoldStatus::Expired.id());
        assert_eq!(hold.released_at, Some(now));
    }

    #[test]
    fn expire_if_needed_ignores_live_held() {
        let now = Utc::now();
        let mut hold = held_hold(now + Duration::seconds(60));

        assert!(!hold.expire_if_needed(now));
        assert_eq!(hold.status_id, HoldStatus::Held.id());
        assert_eq!(hold.released_at, None);
    }

    #[test]
    fn expire_if_needed_never_touches_terminal_states() {
        let now = Utc::now();
        for terminal in [
            HoldStatus::Expired,
            HoldStatus::Released,
            HoldStatus::Consumed,
        ] {
            let mut hold = held_hold(now - Duration::seconds(10));
            hold.status_id = terminal.id();
            hold.released_at = Some(now - Duration::seconds(10));

            assert!(!hold.expire_if_needed(now));
            assert_eq!(hold.status_id, terminal.id());
        }
    }

    #[test]
    fn expire_if_needed_preserves_existing_released_at() {
        let now = Utc::now();
        let earlier = now - Duration::seconds(30);
        let mut hold = held_hold(now - Duration::seconds(1));
        hold.released_at = Some(earlier);

        assert!(hold.expire_if_needed(now));
        assert_eq!(hold.released_at, Some(earlier));
    }
}
