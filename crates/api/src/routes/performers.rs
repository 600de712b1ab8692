//! Route definitions for the `/performers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::performers;
use crate::state::AppState;

/// Routes mounted at `/performers`.
///
/// ```text
/// GET    /        -> list_performers
/// POST   /        -> create_performer
/// GET    /{id}    -> get_performer
/// PUT    /{id}    -> update_performer
/// DELETE /{id}    -> delete_performer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(performers::list_performers).post(performers::create_performer),
        )
        .route(
            "/{id}",
            get(performers::get_performer)
                .put(performers::update_performer)
                .delete(performers::delete_performer),
        )
}
