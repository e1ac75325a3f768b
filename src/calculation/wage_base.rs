//! Wage-base capping for taxes with an annual wage cap.
//!
//! Social Security, FUTA, and SUTA all stop applying once cumulative wages
//! reach an annual wage base. This module provides the pure capping
//! function used by both the employee- and employer-side calculators.

use rust_decimal::Decimal;

/// Returns the portion of `current_wage` still subject to a capped tax.
///
/// * Fully exhausted (`ytd_wage >= wage_base`): returns 0.
/// * Straddling the cap: returns the remaining headroom
///   `wage_base - ytd_wage`.
/// * Otherwise: returns `current_wage` unchanged.
///
/// # Example
///
/// ```
/// use payroll_tax_engine::calculation::taxable_wage;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
///
/// // $3,000 of headroom left under the cap
/// assert_eq!(
///     taxable_wage(dec("5000"), dec("173100"), dec("176100")),
///     dec("3000")
/// );
/// ```
pub fn taxable_wage(current_wage: Decimal, ytd_wage: Decimal, wage_base: Decimal) -> Decimal {
    if ytd_wage >= wage_base {
        Decimal::ZERO
    } else if ytd_wage + current_wage > wage_base {
        wage_base - ytd_wage
    } else {
        current_wage
    }
}
