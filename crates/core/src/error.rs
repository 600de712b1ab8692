use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Entity lookup failed. `key` is the identifier the caller supplied,
    /// rendered as text because payments are addressed by ref, not id.
    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A write collided with existing state. When the collision is a reused
    /// payment reference, `existing_purchase_id` names the purchase that
    /// already consumed it.
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        existing_purchase_id: Option<DbId>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a not-found error with a numeric id.
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound {
            entity,
            key: id.to_string(),
        }
    }

    /// Conflict without an associated purchase id.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
            existing_purchase_id: None,
        }
    }
}
