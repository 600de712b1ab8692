//! Event entity models and DTOs.

use kassa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub event_type: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /events`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub event_type: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    /// Performers to attach at creation. Unknown ids fail the request.
    pub performer_ids: Option<Vec<DbId>>,
}

/// DTO for `PUT /events/{id}`. `None` fields are left unchanged; a present
/// `performer_ids` replaces the whole performer set.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEvent {
    pub event_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub summary: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub performer_ids: Option<Vec<DbId>>,
}

/// Query parameters for `GET /events`.
#[derive(Debug, Deserialize)]
pub struct EventSearchQuery {
    pub event_type: Option<String>,
    /// Case-insensitive substring match on the event name.
    pub name: Option<String>,
    pub start_from: Option<Timestamp>,
    pub start_to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Event plus its attached performer ids, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct EventWithPerformers {
    #[serde(flatten)]
    pub event: Event,
    pub performer_ids: Vec<DbId>,
}
