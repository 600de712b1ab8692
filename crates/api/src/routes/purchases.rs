//! Route definitions for the `/purchases` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::purchases;
use crate::state::AppState;

/// Routes mounted at `/purchases`.
///
/// ```text
/// POST   /    -> create_purchase (idempotent by key)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(purchases::create_purchase))
}
