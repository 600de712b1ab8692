//! Handlers for the `/holds` resource.
//!
//! Each handler owns the database transaction; the booking service runs
//! inside it and the handler commits before responding.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use kassa_core::error::CoreError;
use kassa_core::types::{DbId, Timestamp};
use kassa_db::models::hold::{CreateHold, Hold};
use kassa_db::models::status::HoldStatus;
use serde::Serialize;

use crate::booking;
use crate::error::AppResult;
use crate::handlers::validate_idempotency_key;
use crate::response::DataResponse;
use crate::state::AppState;

/// Hold as rendered to API clients: status as its lookup name.
#[derive(Debug, Serialize)]
pub struct HoldResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub seance_id: DbId,
    pub quantity: i32,
    pub status: &'static str,
    pub idempotency_key: String,
    pub expires_at: Timestamp,
    pub released_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<Hold> for HoldResponse {
    fn from(hold: Hold) -> Self {
        let status = HoldStatus::from_id(hold.status_id)
            .map(|s| s.name())
            .unwrap_or("UNKNOWN");
        Self {
            id: hold.id,
            user_id: hold.user_id,
            seance_id: hold.seance_id,
            quantity: hold.quantity,
            status,
            idempotency_key: hold.idempotency_key,
            expires_at: hold.expires_at,
            released_at: hold.released_at,
            created_at: hold.created_at,
        }
    }
}

/// POST /api/v1/holds
///
/// Create a hold, or replay an existing one for the same idempotency key.
/// Returns 201 when a new hold was created, 200 on a replay.
pub async fn create_hold(
    State(state): State<AppState>,
    Json(input): Json<CreateHold>,
) -> AppResult<impl IntoResponse> {
    if input.quantity < 1 {
        return Err(CoreError::Validation("quantity must be at least 1".into()).into());
    }
    validate_idempotency_key(&input.idempotency_key)?;

    let mut tx = state.pool.begin().await?;
    let outcome = booking::holds::create_hold(&mut tx, &input, Utc::now()).await?;
    tx.commit().await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(DataResponse {
            data: HoldResponse::from(outcome.hold),
        }),
    ))
}

/// GET /api/v1/holds/{id}
///
/// Fetch a hold. A stale HELD hold is expired (and persisted) before it is
/// returned.
pub async fn get_hold(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    let hold = booking::holds::get_hold(&mut tx, id, Utc::now()).await?;
    tx.commit().await?;

    Ok(Json(DataResponse {
        data: HoldResponse::from(hold),
    }))
}

/// DELETE /api/v1/holds/{id}
///
/// Release a hold. Idempotent: a hold that has already left HELD is
/// returned unchanged.
pub async fn release_hold(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    let hold = booking::holds::release_hold(&mut tx, id, Utc::now()).await?;
    tx.commit().await?;

    Ok(Json(DataResponse {
        data: HoldResponse::from(hold),
    }))
}
