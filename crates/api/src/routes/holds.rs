//! Route definitions for the `/holds` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::holds;
use crate::state::AppState;

/// Routes mounted at `/holds`.
///
/// ```text
/// POST   /        -> create_hold (idempotent by key)
/// GET    /{id}    -> get_hold
/// DELETE /{id}    -> release_hold
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(holds::create_hold))
        .route("/{id}", get(holds::get_hold).delete(holds::release_hold))
}
