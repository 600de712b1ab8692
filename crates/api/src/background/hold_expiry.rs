//! Periodic sweep of stale holds.
//!
//! Spawns a background task that bulk-expires HELD holds whose TTL has
//! lapsed. Runs on a fixed interval using `tokio::time::interval`. This is
//! the backstop against abandoned holds that are never read or released;
//! the conditional UPDATE it issues is a no-op on rows the lazy per-row
//! paths already transitioned, so no coordination is needed.

use std::time::Duration;

use chrono::Utc;
use kassa_db::repositories::HoldRepo;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Run the hold expiry sweep loop.
///
/// Sweeps every `interval`, until `cancel` is triggered.
pub async fn run(pool: PgPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = interval.as_secs(), "Hold expiry sweeper started");

    let mut interval = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Hold expiry sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                match HoldRepo::expire_all_due(&pool, Utc::now()).await {
                    Ok(expired) => {
                        if expired > 0 {
                            tracing::info!(expired, "Hold expiry sweep: expired stale holds");
                        } else {
                            tracing::debug!("Hold expiry sweep: nothing to expire");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Hold expiry sweep failed");
                    }
                }
            }
        }
    }
}
