//! Flat per-unit pricing.
//!
//! Purchases are priced at a single fixed unit price; the finalizer
//! compares the authorized payment amount against `order_amount` with exact
//! decimal equality, so any nonzero delta (including sub-cent) is rejected.

use rust_decimal::Decimal;

/// Flat price per reserved unit: 100.00.
pub fn unit_price() -> Decimal {
    Decimal::new(100_00, 2)
}

/// Total amount owed for a hold of `quantity` units.
pub fn order_amount(quantity: i32) -> Decimal {
    unit_price() * Decimal::from(quantity)
}
