//! Repository for the `holds` table.
//!
//! All capacity-affecting transitions on holds flow through here; the
//! booking layer decides, this layer persists. Terminal-state protection is
//! enforced twice: the booking layer checks the in-memory status and every
//! UPDATE carries a `status_id = HELD` guard so a lost race degrades to a
//! no-op instead of a double transition.

use kassa_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgExecutor};

use crate::models::hold::{CreateHold, Hold};
use crate::models::status::HoldStatus;

use super::{map_insert, InsertOutcome};

/// Column list for `holds` queries.
const COLUMNS: &str = "\
    id, user_id, seance_id, quantity, status_id, idempotency_key, \
    expires_at, released_at, created_at, updated_at";

/// Provides persistence for holds.
pub struct HoldRepo;

impl HoldRepo {
    /// Insert a new HELD row. A duplicate idempotency key surfaces as
    /// [`InsertOutcome::UniqueViolation`] for the caller to recover from.
    pub async fn insert(
        conn: &mut PgConnection,
        input: &CreateHold,
        expires_at: Timestamp,
    ) -> Result<InsertOutcome<Hold>, sqlx::Error> {
        let query = format!(
            "INSERT INTO holds (user_id, seance_id, quantity, status_id, idempotency_key, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let result = sqlx::query_as::<_, Hold>(&query)
            .bind(input.user_id)
            .bind(input.seance_id)
            .bind(input.quantity)
            .bind(HoldStatus::Held.id())
            .bind(&input.idempotency_key)
            .bind(expires_at)
            .fetch_one(conn)
            .await;
        map_insert(result)
    }

    /// Find a hold by its ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Hold>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM holds WHERE id = $1");
        sqlx::query_as::<_, Hold>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a hold by its caller-supplied idempotency key.
    pub async fn find_by_idempotency_key(
        executor: impl PgExecutor<'_>,
        key: &str,
    ) -> Result<Option<Hold>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM holds WHERE idempotency_key = $1");
        sqlx::query_as::<_, Hold>(&query)
            .bind(key)
            .fetch_optional(executor)
            .await
    }

    /// Lock a hold row for the remainder of the caller's transaction.
    ///
    /// Serializes release/consume against each other on the same hold.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Hold>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM holds WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Hold>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Sum the quantity of HELD holds on `seance_id` whose TTL is still
    /// running at `now` (strictly `expires_at > now`). Expired-but-unswept
    /// rows do not count against capacity.
    pub async fn sum_active_quantity(
        executor: impl PgExecutor<'_>,
        seance_id: DbId,
        now: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let (sum,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(quantity), 0) FROM holds \
             WHERE seance_id = $1 AND status_id = $2 AND expires_at > $3",
        )
        .bind(seance_id)
        .bind(HoldStatus::Held.id())
        .bind(now)
        .fetch_one(executor)
        .await?;
        Ok(sum)
    }

    /// Persist a lazy HELD -> EXPIRED transition decided by
    /// `Hold::expire_if_needed`. Guarded on `status_id = HELD` so it
    /// composes with the sweeper. Returns the stored row as the database
    /// wrote it, or `None` when the hold had already left HELD.
    pub async fn persist_expiry(
        executor: impl PgExecutor<'_>,
        id: DbId,
        now: Timestamp,
    ) -> Result<Option<Hold>, sqlx::Error> {
        let query = format!(
            "UPDATE holds \
             SET status_id = $2, released_at = COALESCE(released_at, $3) \
             WHERE id = $1 AND status_id = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Hold>(&query)
            .bind(id)
            .bind(HoldStatus::Expired.id())
            .bind(now)
            .bind(HoldStatus::Held.id())
            .fetch_optional(executor)
            .await
    }

    /// Transition HELD -> RELEASED. Returns `None` when the hold had
    /// already left HELD.
    pub async fn mark_released(
        executor: impl PgExecutor<'_>,
        id: DbId,
        now: Timestamp,
    ) -> Result<Option<Hold>, sqlx::Error> {
        Self::transition(executor, id, HoldStatus::Released, now).await
    }

    /// Transition HELD -> CONSUMED as part of purchase finalization.
    pub async fn mark_consumed(
        executor: impl PgExecutor<'_>,
        id: DbId,
        now: Timestamp,
    ) -> Result<Option<Hold>, sqlx::Error> {
        Self::transition(executor, id, HoldStatus::Consumed, now).await
    }

    // Callers get the row back as stored; Postgres truncates timestamps to
    // microseconds, so echoing the bound `now` would disagree with later
    // reads.
    async fn transition(
        executor: impl PgExecutor<'_>,
        id: DbId,
        to: HoldStatus,
        now: Timestamp,
    ) -> Result<Option<Hold>, sqlx::Error> {
        let query = format!(
            "UPDATE holds \
             SET status_id = $2, released_at = $3 \
             WHERE id = $1 AND status_id = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Hold>(&query)
            .bind(id)
            .bind(to.id())
            .bind(now)
            .bind(HoldStatus::Held.id())
            .fetch_optional(executor)
            .await
    }

    /// Bulk-expire every stale hold in one atomic conditional UPDATE.
    ///
    /// The predicate makes this a no-op on rows another path already
    /// transitioned, so the sweeper needs no coordination with per-row
    /// operations. Returns the number of rows expired.
    pub async fn expire_all_due(
        executor: impl PgExecutor<'_>,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE holds \
             SET status_id = $1, released_at = $2 \
             WHERE status_id = $3 AND expires_at <= $2 AND released_at IS NULL",
        )
        .bind(HoldStatus::Expired.id())
        .bind(now)
        .bind(HoldStatus::Held.id())
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
