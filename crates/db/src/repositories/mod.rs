//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! an executor as the first argument: `impl PgExecutor<'_>` for single
//! statements (pool or open transaction), `&mut PgConnection` where the
//! statement must join the caller's transaction (row locks, multi-statement
//! writes).

pub mod event_repo;
pub mod hold_repo;
pub mod payment_repo;
pub mod performer_repo;
pub mod purchase_repo;
pub mod seance_repo;

pub use event_repo::EventRepo;
pub use hold_repo::HoldRepo;
pub use payment_repo::PaymentRepo;
pub use performer_repo::PerformerRepo;
pub use purchase_repo::PurchaseRepo;
pub use seance_repo::SeanceRepo;

/// Result of an insert that may hit a unique constraint.
///
/// Duplicate-key handling is part of the booking protocol (idempotency keys,
/// payment refs), so repositories surface the violation as data instead of
/// an error to catch; callers branch on it directly.
#[derive(Debug)]
pub enum InsertOutcome<T> {
    Inserted(T),
    /// PostgreSQL 23505. `constraint` is the violated constraint name when
    /// the driver reports one (ours are all named `uq_*`).
    UniqueViolation { constraint: Option<String> },
}

/// Classify `err` as a unique violation, returning the constraint name.
fn unique_violation(err: &sqlx::Error) -> Option<Option<String>> {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return Some(db_err.constraint().map(str::to_owned));
        }
    }
    None
}

/// Map an insert result into an [`InsertOutcome`], letting every error
/// other than 23505 propagate.
fn map_insert<T>(result: Result<T, sqlx::Error>) -> Result<InsertOutcome<T>, sqlx::Error> {
    match result {
        Ok(row) => Ok(InsertOutcome::Inserted(row)),
        Err(err) => match unique_violation(&err) {
            Some(constraint) => Ok(InsertOutcome::UniqueViolation { constraint }),
            None => Err(err),
        },
    }
}

/// Maximum page size for list/search queries.
pub(crate) const MAX_LIMIT: i64 = 100;

/// Default page size for list/search queries.
pub(crate) const DEFAULT_LIMIT: i64 = 50;

pub(crate) fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

pub(crate) fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
