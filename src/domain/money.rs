//! Monetary types for catalog prices.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Percentage of `amount` relative to `base`, or zero when `base` is zero.
#[must_use]
pub fn percentage_of(amount: Price, base: Price) -> Decimal {
    if base.is_zero() {
        return Decimal::ZERO;
    }
    amount / base * Decimal::ONE_HUNDRED
}
