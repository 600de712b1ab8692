//! Route definitions for the `/events` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::{events, seances};
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /                        -> search_events
/// POST   /                        -> create_event
/// GET    /{id}                    -> get_event
/// PUT    /{id}                    -> update_event
/// DELETE /{id}                    -> delete_event
/// GET    /{event_id}/seances      -> list_event_seances
/// POST   /{event_id}/seances      -> create_seance
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::search_events).post(events::create_event))
        .route(
            "/{id}",
            get(events::get_event)
                .put(events::update_event)
                .delete(events::delete_event),
        )
        .route(
            "/{event_id}/seances",
            get(seances::list_event_seances).post(seances::create_seance),
        )
}
