//! Handlers for the `/purchases` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use kassa_core::error::CoreError;
use kassa_core::types::{DbId, Timestamp};
use kassa_db::models::purchase::{CreatePurchase, Purchase};
use kassa_db::models::status::PurchaseStatus;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::booking;
use crate::error::AppResult;
use crate::handlers::{validate_idempotency_key, validate_payment_ref};
use crate::response::DataResponse;
use crate::state::AppState;

/// Purchase as rendered to API clients. `created` distinguishes a fresh
/// purchase from an idempotent replay.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    pub id: DbId,
    pub hold_id: DbId,
    pub seance_id: DbId,
    pub user_id: DbId,
    pub quantity: i32,
    pub amount: Decimal,
    pub payment_ref: String,
    pub status: &'static str,
    pub idempotency_key: String,
    pub created_at: Timestamp,
    pub created: bool,
}

impl PurchaseResponse {
    fn new(purchase: Purchase, created: bool) -> Self {
        let status = PurchaseStatus::from_id(purchase.status_id)
            .map(|s| s.name())
            .unwrap_or("UNKNOWN");
        Self {
            id: purchase.id,
            hold_id: purchase.hold_id,
            seance_id: purchase.seance_id,
            user_id: purchase.user_id,
            quantity: purchase.quantity,
            amount: purchase.amount,
            payment_ref: purchase.payment_ref,
            status,
            idempotency_key: purchase.idempotency_key,
            created_at: purchase.created_at,
            created,
        }
    }
}

/// POST /api/v1/purchases
///
/// Finalize a purchase against a held reservation. Returns 201 when the
/// purchase was created by this call, 200 on an idempotent replay.
pub async fn create_purchase(
    State(state): State<AppState>,
    Json(input): Json<CreatePurchase>,
) -> AppResult<impl IntoResponse> {
    if input.hold_id < 1 {
        return Err(CoreError::Validation("hold_id must be a positive id".into()).into());
    }
    validate_payment_ref(&input.payment_ref)?;
    validate_idempotency_key(&input.idempotency_key)?;

    let outcome = booking::purchases::create_purchase(&state.pool, &input, Utc::now()).await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(DataResponse {
            data: PurchaseResponse::new(outcome.purchase, outcome.created),
        }),
    ))
}
