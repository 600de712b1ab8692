//! HTTP handlers, grouped by resource.

pub mod events;
pub mod holds;
pub mod payments;
pub mod performers;
pub mod purchases;
pub mod seances;

use kassa_core::error::CoreError;

use crate::error::AppError;

/// Maximum idempotency key length accepted by the booking endpoints.
const MAX_IDEMPOTENCY_KEY_LEN: usize = 80;

/// Maximum payment reference length.
const MAX_PAYMENT_REF_LEN: usize = 64;

/// Validate a caller-supplied idempotency key: non-blank, at most 80 chars.
pub(crate) fn validate_idempotency_key(key: &str) -> Result<(), AppError> {
    if key.trim().is_empty() {
        return Err(CoreError::Validation("idempotency_key must not be blank".into()).into());
    }
    if key.len() > MAX_IDEMPOTENCY_KEY_LEN {
        return Err(CoreError::Validation(format!(
            "idempotency_key must be at most {MAX_IDEMPOTENCY_KEY_LEN} characters"
        ))
        .into());
    }
    Ok(())
}

/// Validate a payment reference: non-blank, at most 64 chars.
pub(crate) fn validate_payment_ref(payment_ref: &str) -> Result<(), AppError> {
    if payment_ref.trim().is_empty() {
        return Err(CoreError::Validation("payment_ref must not be blank".into()).into());
    }
    if payment_ref.len() > MAX_PAYMENT_REF_LEN {
        return Err(CoreError::Validation(format!(
            "payment_ref must be at most {MAX_PAYMENT_REF_LEN} characters"
        ))
        .into());
    }
    Ok(())
}

/// Validate a required, non-blank name field.
pub(crate) fn validate_name(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be blank")).into());
    }
    Ok(())
}
