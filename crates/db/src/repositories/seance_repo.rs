//! Repository for the `seances` table.

use kassa_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::seance::{CreateSeance, Seance, SeanceSearchQuery};

use super::{clamp_limit, clamp_offset};

/// Column list for `seances` queries.
const COLUMNS: &str = "id, event_id, capacity, start_date, created_at, updated_at";

/// Provides persistence for seances.
pub struct SeanceRepo;

impl SeanceRepo {
    /// Create a seance under an event. Capacity is fixed from here on.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        event_id: DbId,
        input: &CreateSeance,
    ) -> Result<Seance, sqlx::Error> {
        let query = format!(
            "INSERT INTO seances (event_id, capacity, start_date) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Seance>(&query)
            .bind(event_id)
            .bind(input.capacity)
            .bind(input.start_date)
            .fetch_one(executor)
            .await
    }

    /// Find a seance by its ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Seance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM seances WHERE id = $1");
        sqlx::query_as::<_, Seance>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Lock the seance row for the remainder of the caller's transaction.
    ///
    /// This is the serialization point for hold admission: every concurrent
    /// hold creation against the same seance queues here, so the
    /// availability check and the insert that follows are atomic per
    /// seance. Unrelated seances are unaffected.
    pub async fn lock_for_update(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Seance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM seances WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Seance>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Search seances by event and start-date window, newest window first.
    pub async fn search(
        executor: impl PgExecutor<'_>,
        params: &SeanceSearchQuery,
    ) -> Result<Vec<Seance>, sqlx::Error> {
        let limit = clamp_limit(params.limit);
        let offset = clamp_offset(params.offset);

        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx: u32 = 1;

        if params.event_id.is_some() {
            conditions.push(format!("event_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.date_from.is_some() {
            conditions.push(format!("start_date >= ${bind_idx}"));
            bind_idx += 1;
        }
        if params.date_to.is_some() {
            conditions.push(format!("start_date <= ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM seances \
             {where_clause} \
             ORDER BY start_date ASC NULLS LAST, id ASC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Seance>(&query);

        if let Some(event_id) = params.event_id {
            q = q.bind(event_id);
        }
        if let Some(from) = params.date_from {
            q = q.bind(from);
        }
        if let Some(to) = params.date_to {
            q = q.bind(to);
        }

        q = q.bind(limit).bind(offset);

        q.fetch_all(executor).await
    }
}
