//! Availability calculation for a seance.

use kassa_core::availability;
use kassa_core::types::Timestamp;
use kassa_db::models::seance::{Seance, SeanceAvailability};
use kassa_db::repositories::{HoldRepo, PurchaseRepo};
use sqlx::PgConnection;

use crate::error::AppResult;

/// Availability breakdown for a seance: `capacity - sold - active_held`,
/// clamped to zero for display.
///
/// The two sums are read without the seance lock, so a transient negative
/// is possible while a purchase commits; admission never uses this path.
pub async fn for_seance(
    conn: &mut PgConnection,
    seance: &Seance,
    now: Timestamp,
) -> AppResult<SeanceAvailability> {
    let sold = PurchaseRepo::sum_sold_quantity(&mut *conn, seance.id).await?;
    let held = HoldRepo::sum_active_quantity(&mut *conn, seance.id, now).await?;

    let raw = availability::available(seance.capacity as i64, sold, held);
    if raw < 0 {
        tracing::warn!(
            seance_id = seance.id,
            available = raw,
            "Availability went negative, clamping for display"
        );
    }

    Ok(SeanceAvailability {
        seance_id: seance.id,
        capacity: seance.capacity,
        sold,
        held,
        available: availability::available_for_display(seance.capacity as i64, sold, held),
    })
}
