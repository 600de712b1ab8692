//! Payment entity models and DTOs.
//!
//! Payments are written by the mock authorize endpoint and consumed by the
//! purchase finalizer; the booking core never mutates them.

use kassa_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::{PaymentStatus, StatusId};

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub payment_ref: String,
    pub status_id: StatusId,
    pub amount: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Payment {
    pub fn is_authorized(&self) -> bool {
        self.status_id == PaymentStatus::Authorized.id()
    }
}

/// DTO for `POST /payments/authorize`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizePayment {
    pub amount: Decimal,
}
