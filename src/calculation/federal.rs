//! Federal tax calculation.
//!
//! Computes federal income tax withholding, Social Security, Medicare, and
//! Additional Medicare for one pay period. All numeric tax parameters come
//! from the supplied [`FederalFormulas`] bundle; nothing is hardcoded here.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{FederalTaxes, FilingStatus};
use crate::providers::FederalFormulas;

use super::brackets::tax_from_brackets;
use super::rounding::round_to_cents;
use super::wage_base::taxable_wage;

/// Inputs to the federal tax calculation.
#[derive(Debug, Clone)]
pub struct FederalTaxInput {
    /// Federal taxable income for the period (gross minus pre-tax deductions).
    pub taxable_income: Decimal,
    /// Federal filing status.
    pub filing_status: FilingStatus,
    /// Number of withholding allowances claimed.
    pub allowances: u32,
    /// Additional flat withholding elected per pay period.
    pub additional_withholding: Decimal,
    /// Whether the employee is a non-resident alien for withholding purposes.
    pub nonresident_alien: bool,
    /// Year-to-date wages already subjected to Social Security tax.
    pub ytd_social_security_wages: Decimal,
}

/// Computes all federal employee-side taxes for one pay period.
///
/// Income tax applies the filing-status bracket table after the allowance
/// reduction and the non-resident-alien wage addback; Social Security is
/// capped against the annual wage base using the year-to-date figure;
/// Medicare is uncapped; Additional Medicare applies only above the
/// bundle's threshold. Each figure is rounded to cents at emission.
pub fn calculate_federal_taxes(
    input: &FederalTaxInput,
    formulas: &FederalFormulas,
) -> EngineResult<FederalTaxes> {
    let brackets = formulas
        .brackets
        .get(&input.filing_status)
        .filter(|table| !table.is_empty())
        .ok_or_else(|| EngineError::MissingFormula {
            jurisdiction: "federal".to_string(),
            detail: format!(
                "no bracket table for filing status '{}'",
                input.filing_status.as_str()
            ),
        })?;

    let mut bracket_wages = input.taxable_income;
    if input.nonresident_alien {
        bracket_wages += formulas.nonresident_alien_addback;
    }
    bracket_wages -= Decimal::from(input.allowances) * formulas.allowance_amount;
    if bracket_wages < Decimal::ZERO {
        bracket_wages = Decimal::ZERO;
    }
    let federal_income_tax = tax_from_brackets(bracket_wages, brackets) + input.additional_withholding;

    let social_security_wages = taxable_wage(
        input.taxable_income,
        input.ytd_social_security_wages,
        formulas.social_security_wage_base,
    );
    let social_security = formulas.social_security_rate * social_security_wages;

    // Medicare wages are not capped.
    let medicare = formulas.medicare_rate * input.taxable_income;

    let additional_medicare = if input.taxable_income > formulas.additional_medicare_threshold {
        formulas.additional_medicare_rate
            * (input.taxable_income - formulas.additional_medicare_threshold)
    } else {
        Decimal::ZERO
    };

    Ok(FederalTaxes {
        federal_income_tax: round_to_cents(federal_income_tax),
        social_security: round_to_cents(social_security),
        medicare: round_to_cents(medicare),
        additional_medicare: round_to_cents(additional_medicare),
    })
}
