//! Hold lifecycle: admission under the seance lock, lazy expiry on read,
//! idempotent release.

use kassa_core::error::CoreError;
use kassa_core::types::{DbId, Timestamp};
use kassa_core::{availability, holds};
use kassa_db::models::hold::{CreateHold, Hold};
use kassa_db::repositories::{HoldRepo, InsertOutcome, PurchaseRepo, SeanceRepo};
use sqlx::{Connection, PgConnection};

use crate::error::AppResult;

/// Result of a hold create call: the hold plus whether this call actually
/// created it (`false` on an idempotent replay).
#[derive(Debug)]
pub struct HoldOutcome {
    pub hold: Hold,
    pub created: bool,
}

/// Create a hold, or return the existing one for a replayed idempotency key.
///
/// Admission runs entirely under the seance row lock: the availability sums
/// and the insert are atomic per seance, so two concurrent holds can never
/// jointly oversell.
pub async fn create_hold(
    conn: &mut PgConnection,
    input: &CreateHold,
    now: Timestamp,
) -> AppResult<HoldOutcome> {
    // Replay check before taking any lock. The unique constraint backstops
    // the race where a duplicate arrives between this read and the insert.
    if let Some(hold) = HoldRepo::find_by_idempotency_key(&mut *conn, &input.idempotency_key).await?
    {
        let hold = apply_lazy_expiry(conn, hold, now).await?;
        return Ok(HoldOutcome {
            hold,
            created: false,
        });
    }

    let seance = SeanceRepo::lock_for_update(conn, input.seance_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Seance", input.seance_id))?;

    let sold = PurchaseRepo::sum_sold_quantity(&mut *conn, seance.id).await?;
    let held = HoldRepo::sum_active_quantity(&mut *conn, seance.id, now).await?;
    let available = availability::available(seance.capacity as i64, sold, held);

    if i64::from(input.quantity) > available {
        return Err(CoreError::Validation(format!(
            "Insufficient capacity for seance {}: requested {}, available {}",
            seance.id, input.quantity, available
        ))
        .into());
    }

    let expires_at = holds::expiry_at(now);

    // Savepoint around the insert: a 23505 aborts the statement's
    // transaction scope, and the recovery re-read below must still run
    // inside the outer transaction.
    let mut sp = conn.begin().await?;
    let outcome = HoldRepo::insert(&mut sp, input, expires_at).await?;
    match outcome {
        InsertOutcome::Inserted(hold) => {
            sp.commit().await?;
            tracing::info!(
                hold_id = hold.id,
                seance_id = hold.seance_id,
                quantity = hold.quantity,
                "Hold created"
            );
            Ok(HoldOutcome {
                hold,
                created: true,
            })
        }
        InsertOutcome::UniqueViolation { constraint } => {
            sp.rollback().await?;
            tracing::debug!(
                constraint = constraint.as_deref(),
                idempotency_key = %input.idempotency_key,
                "Hold insert lost an idempotency race, re-reading"
            );
            let hold = HoldRepo::find_by_idempotency_key(&mut *conn, &input.idempotency_key)
                .await?
                .ok_or_else(|| {
                    CoreError::Internal(format!(
                        "hold insert violated a unique constraint ({constraint:?}) \
                         but no row matches idempotency key"
                    ))
                })?;
            let hold = apply_lazy_expiry(conn, hold, now).await?;
            Ok(HoldOutcome {
                hold,
                created: false,
            })
        }
    }
}

/// Fetch a hold, applying lazy expiry first.
pub async fn get_hold(conn: &mut PgConnection, id: DbId, now: Timestamp) -> AppResult<Hold> {
    let hold = HoldRepo::find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Hold", id))?;
    apply_lazy_expiry(conn, hold, now).await
}

/// Release a hold. Idempotent: releasing a hold that has already left HELD
/// (by any path) returns its current state unchanged.
pub async fn release_hold(conn: &mut PgConnection, id: DbId, now: Timestamp) -> AppResult<Hold> {
    let mut hold = HoldRepo::lock_for_update(conn, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Hold", id))?;

    // A stale hold expires instead of releasing; nothing further to do.
    if hold.expire_if_needed(now) {
        if let Some(stored) = HoldRepo::persist_expiry(&mut *conn, hold.id, now).await? {
            hold = stored;
        }
        return Ok(hold);
    }

    if !hold.is_held() {
        return Ok(hold);
    }

    // Guarded transition; we hold the row lock so it cannot lose a race.
    if let Some(stored) = HoldRepo::mark_released(&mut *conn, hold.id, now).await? {
        hold = stored;
        tracing::info!(hold_id = hold.id, "Hold released");
    }

    Ok(hold)
}

/// Persist an in-memory lazy expiry decided by `Hold::expire_if_needed`,
/// returning the row as stored.
async fn apply_lazy_expiry(
    conn: &mut PgConnection,
    mut hold: Hold,
    now: Timestamp,
) -> AppResult<Hold> {
    if hold.expire_if_needed(now) {
        match HoldRepo::persist_expiry(&mut *conn, hold.id, now).await? {
            Some(stored) => {
                hold = stored;
                tracing::debug!(hold_id = hold.id, "Hold lazily expired on read");
            }
            // Another path transitioned the row between the read and this
            // update; return what it wrote.
            None => {
                hold = HoldRepo::find_by_id(&mut *conn, hold.id)
                    .await?
                    .ok_or_else(|| CoreError::not_found("Hold", hold.id))?;
            }
        }
    }
    Ok(hold)
}
