//! Repository for the `payments` table.

use rust_decimal::Decimal;
use sqlx::PgExecutor;

use crate::models::payment::Payment;
use crate::models::status::PaymentStatus;

/// Column list for `payments` queries.
const COLUMNS: &str = "id, payment_ref, status_id, amount, created_at, updated_at";

/// Provides persistence for payment authorization records.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Record an authorization decision under a fresh `payment_ref`.
    pub async fn insert(
        executor: impl PgExecutor<'_>,
        payment_ref: &str,
        status: PaymentStatus,
        amount: Decimal,
    ) -> Result<Payment, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments (payment_ref, status_id, amount) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(payment_ref)
            .bind(status.id())
            .bind(amount)
            .fetch_one(executor)
            .await
    }

    /// Find a payment by its reference.
    pub async fn find_by_ref(
        executor: impl PgExecutor<'_>,
        payment_ref: &str,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE payment_ref = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(payment_ref)
            .fetch_optional(executor)
            .await
    }
}
