//! Handlers for the `/payments` resource.
//!
//! There is no gateway behind this endpoint; the decision comes from the
//! deterministic mock rule in `kassa_core::payment` so integration tests
//! can force either outcome by choosing the amount.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kassa_core::error::CoreError;
use kassa_core::payment::{self, Decision};
use kassa_core::types::{DbId, Timestamp};
use kassa_db::models::payment::{AuthorizePayment, Payment};
use kassa_db::models::status::PaymentStatus;
use kassa_db::repositories::PaymentRepo;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Payment as rendered to API clients.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: DbId,
    pub payment_ref: String,
    pub status: &'static str,
    pub amount: Decimal,
    pub created_at: Timestamp,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        let status = PaymentStatus::from_id(payment.status_id)
            .map(|s| s.name())
            .unwrap_or("UNKNOWN");
        Self {
            id: payment.id,
            payment_ref: payment.payment_ref,
            status,
            amount: payment.amount,
            created_at: payment.created_at,
        }
    }
}

/// POST /api/v1/payments/authorize
///
/// Authorize (or decline) a payment of the given amount under a freshly
/// generated payment reference. Returns 201 either way; the decision is in
/// the body.
pub async fn authorize_payment(
    State(state): State<AppState>,
    Json(input): Json<AuthorizePayment>,
) -> AppResult<impl IntoResponse> {
    if input.amount < Decimal::ZERO {
        return Err(CoreError::Validation("amount must not be negative".into()).into());
    }

    let decision = payment::mock_decision(input.amount)
        .ok_or_else(|| CoreError::Validation("amount is out of range".into()))?;

    let status = match decision {
        Decision::Authorized => PaymentStatus::Authorized,
        Decision::Declined => PaymentStatus::Declined,
    };

    let payment_ref = Uuid::new_v4().to_string();
    let payment = PaymentRepo::insert(&state.pool, &payment_ref, status, input.amount).await?;

    tracing::info!(
        payment_ref = %payment.payment_ref,
        status = status.name(),
        "Payment decision recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PaymentResponse::from(payment),
        }),
    ))
}
