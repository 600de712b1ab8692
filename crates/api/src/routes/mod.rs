pub mod events;
pub mod health;
pub mod holds;
pub mod payments;
pub mod performers;
pub mod purchases;
pub mod seances;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /events                          search, create
/// /events/{id}                     get, update, delete
/// /events/{event_id}/seances       list, create
///
/// /performers                      list, create
/// /performers/{id}                 get, update, delete
///
/// /seances                         search
/// /seances/{id}                    get
/// /seances/{id}/availability       availability breakdown
///
/// /holds                           create (idempotent)
/// /holds/{id}                      get, release (DELETE)
///
/// /purchases                       create (idempotent)
///
/// /payments/authorize              mock authorization decision
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/events", events::router())
        .nest("/performers", performers::router())
        .nest("/seances", seances::router())
        .nest("/holds", holds::router())
        .nest("/purchases", purchases::router())
        .nest("/payments", payments::router())
}
