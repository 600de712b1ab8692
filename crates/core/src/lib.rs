//! Pure domain logic for the kassa box-office backend.
//!
//! No database access here: availability arithmetic, hold TTL policy,
//! pricing, the mock payment decision, and the shared error taxonomy.
//! Everything that touches Postgres lives in `kassa-db` and `kassa-api`.

pub mod availability;
pub mod error;
pub mod holds;
pub mod payment;
pub mod pricing;
pub mod types;
