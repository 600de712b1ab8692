//! Handlers for the `/events` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kassa_core::error::CoreError;
use kassa_core::types::DbId;
use kassa_db::models::event::{
    CreateEvent, EventSearchQuery, EventWithPerformers, UpdateEvent,
};
use kassa_db::repositories::{EventRepo, PerformerRepo};
use sqlx::PgConnection;

use crate::error::AppResult;
use crate::handlers::validate_name;
use crate::response::DataResponse;
use crate::state::AppState;

/// Reject performer sets containing unknown ids.
async fn validate_performer_ids(
    conn: &mut PgConnection,
    performer_ids: &[DbId],
) -> AppResult<()> {
    if performer_ids.is_empty() {
        return Ok(());
    }
    let found = PerformerRepo::count_existing(&mut *conn, performer_ids).await?;
    if found != performer_ids.len() as i64 {
        return Err(CoreError::Validation(format!(
            "performer_ids contains unknown ids ({found} of {} exist)",
            performer_ids.len()
        ))
        .into());
    }
    Ok(())
}

/// POST /api/v1/events
///
/// Create an event, optionally attaching performers. Returns 201.
pub async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<CreateEvent>,
) -> AppResult<impl IntoResponse> {
    validate_name("name", &input.name)?;

    let mut tx = state.pool.begin().await?;
    if let Some(performer_ids) = &input.performer_ids {
        validate_performer_ids(&mut tx, performer_ids).await?;
    }
    let event = EventRepo::create(&mut tx, &input).await?;
    let performer_ids = EventRepo::performer_ids(&mut *tx, event.id).await?;
    tx.commit().await?;

    tracing::info!(event_id = event.id, name = %event.name, "Event created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: EventWithPerformers {
                event,
                performer_ids,
            },
        }),
    ))
}

/// GET /api/v1/events
///
/// Search events by type, name substring, and start-date window.
pub async fn search_events(
    State(state): State<AppState>,
    Query(params): Query<EventSearchQuery>,
) -> AppResult<impl IntoResponse> {
    let events = EventRepo::search(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Event", id))?;
    let performer_ids = EventRepo::performer_ids(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: EventWithPerformers {
            event,
            performer_ids,
        },
    }))
}

/// PUT /api/v1/events/{id}
///
/// Partial update; a present `performer_ids` replaces the whole set.
pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }

    let mut tx = state.pool.begin().await?;
    if let Some(performer_ids) = &input.performer_ids {
        validate_performer_ids(&mut tx, performer_ids).await?;
    }
    let event = EventRepo::update(&mut tx, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Event", id))?;
    let performer_ids = EventRepo::performer_ids(&mut *tx, id).await?;
    tx.commit().await?;

    Ok(Json(DataResponse {
        data: EventWithPerformers {
            event,
            performer_ids,
        },
    }))
}

/// DELETE /api/v1/events/{id}
///
/// Delete an event and (via cascade) its performer links. Returns 204.
pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = EventRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::not_found("Event", id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
