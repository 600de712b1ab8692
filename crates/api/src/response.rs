//! Response envelope for API handlers.
//!
//! Every successful JSON body is `{ "data": ... }`; error bodies are built
//! separately in [`crate::error`]. Handlers wrap their payload in
//! [`DataResponse`] rather than assembling the envelope with
//! `serde_json::json!`.

use serde::Serialize;

/// `{ "data": T }` wrapper around a serializable payload.
///
/// ```ignore
/// Ok(Json(DataResponse { data: hold }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
