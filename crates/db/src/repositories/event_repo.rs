//! Repository for the `events` table and its performer join.

use kassa_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::event::{CreateEvent, Event, EventSearchQuery, UpdateEvent};

use super::{clamp_limit, clamp_offset};

/// Column list for `events` queries.
const COLUMNS: &str = "\
    id, event_type, name, description, summary, start_date, end_date, \
    created_at, updated_at";

/// Provides persistence for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert an event and attach its initial performer set.
    ///
    /// Multi-statement; must run inside the caller's transaction so a
    /// failed performer attach rolls back the event row too.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateEvent,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (event_type, name, description, summary, start_date, end_date) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(&input.event_type)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.summary)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(&mut *conn)
            .await?;

        if let Some(performer_ids) = &input.performer_ids {
            Self::set_performers(conn, event.id, performer_ids).await?;
        }

        Ok(event)
    }

    /// Find an event by its ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Whether an event with this ID exists.
    pub async fn exists(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM events WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    /// Apply a partial update. `None` fields keep their current value.
    /// Returns the updated row, or `None` if the event does not exist.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET \
                 event_type = COALESCE($2, event_type), \
                 name = COALESCE($3, name), \
                 description = COALESCE($4, description), \
                 summary = COALESCE($5, summary), \
                 start_date = COALESCE($6, start_date), \
                 end_date = COALESCE($7, end_date) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.event_type)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.summary)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(&mut *conn)
            .await?;

        if event.is_some() {
            if let Some(performer_ids) = &input.performer_ids {
                Self::set_performers(conn, id, performer_ids).await?;
            }
        }

        Ok(event)
    }

    /// Replace the full performer set for an event.
    pub async fn set_performers(
        conn: &mut PgConnection,
        event_id: DbId,
        performer_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM event_performers WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *conn)
            .await?;

        if !performer_ids.is_empty() {
            sqlx::query(
                "INSERT INTO event_performers (event_id, performer_id) \
                 SELECT $1, unnest($2::bigint[])",
            )
            .bind(event_id)
            .bind(performer_ids)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Performer ids attached to an event, in stable order.
    pub async fn performer_ids(
        executor: impl PgExecutor<'_>,
        event_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT performer_id FROM event_performers \
             WHERE event_id = $1 ORDER BY performer_id",
        )
        .bind(event_id)
        .fetch_all(executor)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Delete an event. Returns `false` when no row matched.
    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Search events by type, name substring, and start-date window.
    pub async fn search(
        executor: impl PgExecutor<'_>,
        params: &EventSearchQuery,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let limit = clamp_limit(params.limit);
        let offset = clamp_offset(params.offset);

        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx: u32 = 1;

        if params.event_type.is_some() {
            conditions.push(format!("event_type = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.name.is_some() {
            conditions.push(format!("name ILIKE '%' || ${bind_idx} || '%'"));
            bind_idx += 1;
        }
        if params.start_from.is_some() {
            conditions.push(format!("start_date >= ${bind_idx}"));
            bind_idx += 1;
        }
        if params.start_to.is_some() {
            conditions.push(format!("start_date <= ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM events \
             {where_clause} \
             ORDER BY start_date ASC NULLS LAST, id ASC \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Event>(&query);

        if let Some(event_type) = &params.event_type {
            q = q.bind(event_type);
        }
        if let Some(name) = &params.name {
            q = q.bind(name);
        }
        if let Some(from) = params.start_from {
            q = q.bind(from);
        }
        if let Some(to) = params.start_to {
            q = q.bind(to);
        }

        q = q.bind(limit).bind(offset);

        q.fetch_all(executor).await
    }
}
