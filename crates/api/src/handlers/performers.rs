//! Handlers for the `/performers` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use kassa_core::error::CoreError;
use kassa_core::types::DbId;
use kassa_db::models::performer::{CreatePerformer, PerformerListQuery, UpdatePerformer};
use kassa_db::repositories::PerformerRepo;

use crate::error::AppResult;
use crate::handlers::validate_name;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/performers
pub async fn create_performer(
    State(state): State<AppState>,
    Json(input): Json<CreatePerformer>,
) -> AppResult<impl IntoResponse> {
    validate_name("name", &input.name)?;

    let performer = PerformerRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: performer })))
}

/// GET /api/v1/performers
///
/// List performers, optionally filtered by a name substring.
pub async fn list_performers(
    State(state): State<AppState>,
    Query(params): Query<PerformerListQuery>,
) -> AppResult<impl IntoResponse> {
    let performers = PerformerRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: performers }))
}

/// GET /api/v1/performers/{id}
pub async fn get_performer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let performer = PerformerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Performer", id))?;
    Ok(Json(DataResponse { data: performer }))
}

/// PUT /api/v1/performers/{id}
pub async fn update_performer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePerformer>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }

    let performer = PerformerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Performer", id))?;
    Ok(Json(DataResponse { data: performer }))
}

/// DELETE /api/v1/performers/{id}
pub async fn delete_performer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = PerformerRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::not_found("Performer", id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
