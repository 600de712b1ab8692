//! Performer entity models and DTOs.

use kassa_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `performers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Performer {
    pub id: DbId,
    pub name: String,
    pub role: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /performers`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePerformer {
    pub name: String,
    pub role: Option<String>,
    pub description: Option<String>,
}

/// DTO for `PUT /performers/{id}`. `None` fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePerformer {
    pub name: Option<String>,
    pub role: Option<String>,
    pub description: Option<String>,
}

/// Query parameters for `GET /performers`.
#[derive(Debug, Deserialize)]
pub struct PerformerListQuery {
    /// Case-insensitive substring match on the performer name.
    pub name: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
