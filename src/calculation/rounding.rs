//! Monetary rounding policy.
//!
//! Every externally emitted monetary figure is rounded to 2 decimal places
//! using half-up rounding at the point of emission; intermediate arithmetic
//! stays at full precision.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to cents using half-up rounding.
///
/// # Example
///
/// ```
/// use payroll_tax_engine::calculation::round_to_cents;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = Decimal::from_str("124.005").unwrap();
/// assert_eq!(round_to_cents(amount), Decimal::from_str("124.01").unwrap());
/// ```
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
