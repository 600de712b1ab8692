//! Purchase finalization: converts a still-valid hold into a sale once the
//! referenced payment checks out.

use kassa_core::error::CoreError;
use kassa_core::pricing;
use kassa_core::types::Timestamp;
use kassa_db::models::purchase::{CreatePurchase, PurchaseOutcome};
use kassa_db::models::status::{HoldStatus, PaymentStatus};
use kassa_db::repositories::purchase_repo::InsertPurchase;
use kassa_db::repositories::{HoldRepo, InsertOutcome, PaymentRepo, PurchaseRepo};
use kassa_db::DbPool;
use sqlx::{Connection, PgConnection};

use crate::error::AppResult;

/// Finalize a purchase against a held reservation.
///
/// The hold row lock serializes concurrent finalizations of the same hold;
/// the idempotency-key and payment-ref unique constraints catch the races
/// that arrive before either request has inserted.
///
/// Unlike the hold operations this owns its transaction: the stale-hold
/// rejection must commit the EXPIRED transition while the request itself
/// fails, which a caller-held transaction would roll back.
pub async fn create_purchase(
    pool: &DbPool,
    input: &CreatePurchase,
    now: Timestamp,
) -> AppResult<PurchaseOutcome> {
    let mut tx = pool.begin().await?;

    // Replay check: a finished purchase is returned as-is without touching
    // the hold or the payment again.
    if let Some(purchase) =
        PurchaseRepo::find_by_idempotency_key(&mut *tx, &input.idempotency_key).await?
    {
        return Ok(PurchaseOutcome {
            purchase,
            created: false,
        });
    }

    let payment = PaymentRepo::find_by_ref(&mut *tx, &input.payment_ref)
        .await?
        .ok_or_else(|| CoreError::NotFound {
            entity: "Payment",
            key: input.payment_ref.clone(),
        })?;

    if !payment.is_authorized() {
        let status = PaymentStatus::from_id(payment.status_id)
            .map(|s| s.name())
            .unwrap_or("UNKNOWN");
        return Err(CoreError::Validation(format!(
            "Payment {} is not authorized (status {status})",
            input.payment_ref
        ))
        .into());
    }

    let mut hold = HoldRepo::lock_for_update(&mut tx, input.hold_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Hold", input.hold_id))?;

    // A stale hold is unusable even if no sweep has run yet; the expiry is
    // committed as a side effect of the rejection.
    if hold.expire_if_needed(now) {
        HoldRepo::persist_expiry(&mut *tx, hold.id, now).await?;
        tx.commit().await?;
        return Err(CoreError::Validation(format!("Hold {} has expired", hold.id)).into());
    }

    if !hold.is_held() {
        let status = HoldStatus::from_id(hold.status_id)
            .map(|s| s.name())
            .unwrap_or("UNKNOWN");
        return Err(CoreError::Validation(format!(
            "Hold {} is not active (status {status})",
            hold.id
        ))
        .into());
    }

    let expected = pricing::order_amount(hold.quantity);
    if payment.amount != expected {
        return Err(CoreError::Validation(format!(
            "Payment amount mismatch for hold {}: expected {expected}, got {}",
            hold.id, payment.amount
        ))
        .into());
    }

    let insert = InsertPurchase {
        hold_id: hold.id,
        seance_id: hold.seance_id,
        user_id: hold.user_id,
        quantity: hold.quantity,
        amount: expected,
        payment_ref: &input.payment_ref,
        idempotency_key: &input.idempotency_key,
    };

    // Savepoint around the insert so the recovery re-reads below can still
    // run in the outer transaction after a 23505.
    let mut sp = tx.begin().await?;
    let outcome = PurchaseRepo::insert(&mut sp, &insert).await?;
    match outcome {
        InsertOutcome::Inserted(purchase) => {
            sp.commit().await?;

            // Consume the hold in the same atomic unit as the insert. We
            // hold the row lock and just verified HELD, so a zero-row
            // update means invariants are broken.
            if HoldRepo::mark_consumed(&mut *tx, hold.id, now).await?.is_none() {
                return Err(CoreError::Internal(format!(
                    "hold {} changed state under its own row lock",
                    hold.id
                ))
                .into());
            }
            tx.commit().await?;

            tracing::info!(
                purchase_id = purchase.id,
                hold_id = hold.id,
                seance_id = hold.seance_id,
                quantity = hold.quantity,
                "Purchase finalized"
            );
            Ok(PurchaseOutcome {
                purchase,
                created: true,
            })
        }
        InsertOutcome::UniqueViolation { constraint } => {
            sp.rollback().await?;
            recover_from_unique_violation(&mut tx, input, constraint).await
        }
    }
}

/// Disambiguate a unique-constraint violation on purchase insert.
///
/// Either a concurrent duplicate raced ahead (same idempotency key, replay
/// it) or the payment ref already funded another purchase (conflict carrying
/// that purchase's id). Anything else is unexplained and surfaces as fatal.
async fn recover_from_unique_violation(
    conn: &mut PgConnection,
    input: &CreatePurchase,
    constraint: Option<String>,
) -> AppResult<PurchaseOutcome> {
    if let Some(purchase) =
        PurchaseRepo::find_by_idempotency_key(&mut *conn, &input.idempotency_key).await?
    {
        return Ok(PurchaseOutcome {
            purchase,
            created: false,
        });
    }

    if let Some(existing) = PurchaseRepo::find_by_payment_ref(&mut *conn, &input.payment_ref).await?
    {
        return Err(CoreError::Conflict {
            message: format!(
                "Payment reference {} already funded purchase {}",
                input.payment_ref, existing.id
            ),
            existing_purchase_id: Some(existing.id),
        }
        .into());
    }

    Err(CoreError::Internal(format!(
        "purchase insert violated a unique constraint ({constraint:?}) \
         matching neither the idempotency key nor the payment ref"
    ))
    .into())
}
