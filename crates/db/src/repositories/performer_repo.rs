//! Repository for the `performers` table.

use kassa_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::performer::{CreatePerformer, Performer, PerformerListQuery, UpdatePerformer};

use super::{clamp_limit, clamp_offset};

/// Column list for `performers` queries.
const COLUMNS: &str = "id, name, role, description, created_at, updated_at";

/// Provides persistence for performers.
pub struct PerformerRepo;

impl PerformerRepo {
    /// Insert a performer.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreatePerformer,
    ) -> Result<Performer, sqlx::Error> {
        let query = format!(
            "INSERT INTO performers (name, role, description) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Performer>(&query)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.description)
            .fetch_one(executor)
            .await
    }

    /// Find a performer by its ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Performer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM performers WHERE id = $1");
        sqlx::query_as::<_, Performer>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// How many of `ids` exist. Used to validate a performer set before
    /// attaching it to an event.
    pub async fn count_existing(
        executor: impl PgExecutor<'_>,
        ids: &[DbId],
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM performers WHERE id = ANY($1::bigint[])",
        )
        .bind(ids)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    /// Apply a partial update. `None` fields keep their current value.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        id: DbId,
        input: &UpdatePerformer,
    ) -> Result<Option<Performer>, sqlx::Error> {
        let query = format!(
            "UPDATE performers SET \
                 name = COALESCE($2, name), \
                 role = COALESCE($3, role), \
                 description = COALESCE($4, description) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Performer>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.role)
            .bind(&input.description)
            .fetch_optional(executor)
            .await
    }

    /// Delete a performer. Returns `false` when no row matched.
    pub async fn delete(executor: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM performers WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List performers, optionally filtered by name substring.
    pub async fn list(
        executor: impl PgExecutor<'_>,
        params: &PerformerListQuery,
    ) -> Result<Vec<Performer>, sqlx::Error> {
        let limit = clamp_limit(params.limit);
        let offset = clamp_offset(params.offset);

        match &params.name {
            Some(name) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM performers \
                     WHERE name ILIKE '%' || $1 || '%' \
                     ORDER BY name ASC, id ASC \
                     LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Performer>(&query)
                    .bind(name)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(executor)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM performers \
                     ORDER BY name ASC, id ASC \
                     LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Performer>(&query)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(executor)
                    .await
            }
        }
    }
}
