//! Purchase entity models and DTOs.

use kassa_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `purchases` table. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Purchase {
    pub id: DbId,
    pub hold_id: DbId,
    pub seance_id: DbId,
    pub user_id: DbId,
    pub quantity: i32,
    pub amount: Decimal,
    pub payment_ref: String,
    pub status_id: StatusId,
    pub idempotency_key: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /purchases`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePurchase {
    pub hold_id: DbId,
    pub payment_ref: String,
    pub idempotency_key: String,
}

/// Result of a purchase create call: the purchase plus whether this call
/// actually created it (`false` on an idempotent replay).
#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    pub purchase: Purchase,
    pub created: bool,
}
