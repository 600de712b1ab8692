//! Route definitions for the `/seances` resource.
//!
//! Seance creation lives under `/events/{event_id}/seances`; this router
//! carries the cross-event lookups.

use axum::routing::get;
use axum::Router;

use crate::handlers::seances;
use crate::state::AppState;

/// Routes mounted at `/seances`.
///
/// ```text
/// GET    /                     -> search_seances
/// GET    /{id}                 -> get_seance
/// GET    /{id}/availability    -> get_availability
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(seances::search_seances))
        .route("/{id}", get(seances::get_seance))
        .route("/{id}/availability", get(seances::get_availability))
}
