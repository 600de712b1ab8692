//! Handlers for the `/seances` resource (and its nesting under `/events`).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use kassa_core::error::CoreError;
use kassa_core::types::DbId;
use kassa_db::models::seance::{CreateSeance, SeanceSearchQuery};
use kassa_db::repositories::{EventRepo, SeanceRepo};

use crate::booking;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/events/{event_id}/seances
///
/// Create a seance under an event. Capacity is fixed at creation.
pub async fn create_seance(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<CreateSeance>,
) -> AppResult<impl IntoResponse> {
    if input.capacity < 0 {
        return Err(CoreError::Validation("capacity must not be negative".into()).into());
    }

    if !EventRepo::exists(&state.pool, event_id).await? {
        return Err(CoreError::not_found("Event", event_id).into());
    }

    let seance = SeanceRepo::create(&state.pool, event_id, &input).await?;
    tracing::info!(
        seance_id = seance.id,
        event_id,
        capacity = seance.capacity,
        "Seance created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: seance })))
}

/// GET /api/v1/events/{event_id}/seances
///
/// List the seances of one event.
pub async fn list_event_seances(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Query(mut params): Query<SeanceSearchQuery>,
) -> AppResult<impl IntoResponse> {
    if !EventRepo::exists(&state.pool, event_id).await? {
        return Err(CoreError::not_found("Event", event_id).into());
    }

    params.event_id = Some(event_id);
    let seances = SeanceRepo::search(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: seances }))
}

/// GET /api/v1/seances
///
/// Search seances across events by date window.
pub async fn search_seances(
    State(state): State<AppState>,
    Query(params): Query<SeanceSearchQuery>,
) -> AppResult<impl IntoResponse> {
    let seances = SeanceRepo::search(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: seances }))
}

/// GET /api/v1/seances/{id}
pub async fn get_seance(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let seance = SeanceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Seance", id))?;
    Ok(Json(DataResponse { data: seance }))
}

/// GET /api/v1/seances/{id}/availability
///
/// Availability breakdown (capacity, sold, held, available) at the time of
/// the request.
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut conn = state.pool.acquire().await?;

    let seance = SeanceRepo::find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Seance", id))?;

    let availability = booking::availability::for_seance(&mut conn, &seance, Utc::now()).await?;
    Ok(Json(DataResponse { data: availability }))
}
