//! Route definitions for the `/payments` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// POST   /authorize    -> authorize_payment (mock decision)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/authorize", post(payments::authorize_payment))
}
