//! Mock payment authorization decision.
//!
//! There is no real gateway behind `/payments/authorize`; the decision is a
//! deterministic rule so integration tests can force either outcome: the
//! absolute amount, rounded half-up to cents, is declined iff it comes to
//! exactly 7 cents.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Cent total that triggers a DECLINED decision.
const DECLINE_CENTS: i64 = 7;

/// Outcome of the mock authorization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Authorized,
    Declined,
}

/// Decide whether to authorize a payment of `amount`.
///
/// Returns `None` when the amount is too large to express in cents as an
/// i64; callers treat that as a validation failure.
pub fn mock_decision(amount: Decimal) -> Option<Decision> {
    let cents = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()?;

    if cents == DECLINE_CENTS {
        Some(Decision::Declined)
    } else {
        Some(Decision::Authorized)
    }
}
