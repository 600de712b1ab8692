//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Query/update DTOs where the resource supports them

pub mod event;
pub mod hold;
pub mod payment;
pub mod performer;
pub mod purchase;
pub mod seance;
pub mod status;
