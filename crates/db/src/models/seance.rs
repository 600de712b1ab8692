//! Seance entity models and DTOs.
//!
//! A seance is one scheduled instance of an event with a fixed capacity.
//! Capacity is set at creation and never updated; the booking layer locks
//! the seance row while deciding hold admission.

use kassa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `seances` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Seance {
    pub id: DbId,
    pub event_id: DbId,
    pub capacity: i32,
    pub start_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /events/{event_id}/seances`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSeance {
    pub capacity: i32,
    pub start_date: Option<Timestamp>,
}

/// Query parameters for `GET /seances`.
#[derive(Debug, Deserialize)]
pub struct SeanceSearchQuery {
    pub event_id: Option<DbId>,
    pub date_from: Option<Timestamp>,
    pub date_to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Availability breakdown returned by `GET /seances/{id}/availability`.
#[derive(Debug, Clone, Serialize)]
pub struct SeanceAvailability {
    pub seance_id: DbId,
    pub capacity: i32,
    pub sold: i64,
    pub held: i64,
    pub available: i64,
}
