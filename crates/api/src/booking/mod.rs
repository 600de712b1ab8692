//! Booking services: hold admission, purchase finalization, availability.
//!
//! The hold and availability services take a `&mut PgConnection` that
//! already sits inside a transaction owned by the calling handler; the
//! handler commits (or drops) it. Purchase finalization owns its own
//! transaction instead, because its stale-hold rejection commits a write
//! while the request fails. Inserts whose unique-constraint violation is
//! part of the protocol run under a savepoint (a failed statement poisons
//! the surrounding transaction, so the re-read recovery must roll back to a
//! savepoint first).

pub mod availability;
pub mod holds;
pub mod purchases;
