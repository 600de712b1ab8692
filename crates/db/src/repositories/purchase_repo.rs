//! Repository for the `purchases` table.

use kassa_core::types::DbId;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgExecutor};

use crate::models::purchase::Purchase;
use crate::models::status::PurchaseStatus;

use super::{map_insert, InsertOutcome};

/// Column list for `purchases` queries.
const COLUMNS: &str = "\
    id, hold_id, seance_id, user_id, quantity, amount, payment_ref, \
    status_id, idempotency_key, created_at, updated_at";

/// Fields for a new purchase row, copied from the consumed hold by the
/// finalizer.
#[derive(Debug)]
pub struct InsertPurchase<'a> {
    pub hold_id: DbId,
    pub seance_id: DbId,
    pub user_id: DbId,
    pub quantity: i32,
    pub amount: Decimal,
    pub payment_ref: &'a str,
    pub idempotency_key: &'a str,
}

/// Provides persistence for purchases.
pub struct PurchaseRepo;

impl PurchaseRepo {
    /// Insert a SOLD purchase. Either unique constraint (idempotency key,
    /// payment ref) surfaces as [`InsertOutcome::UniqueViolation`]; the
    /// finalizer disambiguates by re-reading.
    pub async fn insert(
        conn: &mut PgConnection,
        input: &InsertPurchase<'_>,
    ) -> Result<InsertOutcome<Purchase>, sqlx::Error> {
        let query = format!(
            "INSERT INTO purchases \
                 (hold_id, seance_id, user_id, quantity, amount, payment_ref, status_id, idempotency_key) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        let result = sqlx::query_as::<_, Purchase>(&query)
            .bind(input.hold_id)
            .bind(input.seance_id)
            .bind(input.user_id)
            .bind(input.quantity)
            .bind(input.amount)
            .bind(input.payment_ref)
            .bind(PurchaseStatus::Sold.id())
            .bind(input.idempotency_key)
            .fetch_one(conn)
            .await;
        map_insert(result)
    }

    /// Find a purchase by its caller-supplied idempotency key.
    pub async fn find_by_idempotency_key(
        executor: impl PgExecutor<'_>,
        key: &str,
    ) -> Result<Option<Purchase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM purchases WHERE idempotency_key = $1");
        sqlx::query_as::<_, Purchase>(&query)
            .bind(key)
            .fetch_optional(executor)
            .await
    }

    /// Find the purchase funded by `payment_ref`, if any.
    pub async fn find_by_payment_ref(
        executor: impl PgExecutor<'_>,
        payment_ref: &str,
    ) -> Result<Option<Purchase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM purchases WHERE payment_ref = $1");
        sqlx::query_as::<_, Purchase>(&query)
            .bind(payment_ref)
            .fetch_optional(executor)
            .await
    }

    /// Sum the quantity sold for a seance.
    pub async fn sum_sold_quantity(
        executor: impl PgExecutor<'_>,
        seance_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (sum,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(quantity), 0) FROM purchases \
             WHERE seance_id = $1 AND status_id = $2",
        )
        .bind(seance_id)
        .bind(PurchaseStatus::Sold.id())
        .fetch_one(executor)
        .await?;
        Ok(sum)
    }
}
