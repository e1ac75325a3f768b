//! State tax calculation and withholding-state resolution.
//!
//! The withholding state defaults to the work state; a reciprocity
//! agreement between the home and work states redirects withholding to the
//! home state. State income tax, SDI, employee SUI, and paid family leave
//! are all computed from the withholding state's formula bundle.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::StateTaxes;
use crate::providers::{IncomeTaxFormula, RatedTax, ReciprocityRule, ReciprocityService, StateFormulas};

use super::brackets::tax_from_brackets;
use super::rounding::round_to_cents;

/// The outcome of withholding-state resolution.
#[derive(Debug, Clone)]
pub struct WithholdingStateResolution {
    /// The state entitled to income-tax withholding.
    pub state_code: String,
    /// Whether a reciprocity agreement redirected withholding to the
    /// home state.
    pub reciprocity_applied: bool,
    /// The rule consulted; `None` when home and work states are identical
    /// (no lookup is performed).
    pub rule: Option<ReciprocityRule>,
}

/// Determines the withholding state for a home/work state pair.
///
/// Same-state pairs skip the reciprocity lookup entirely. Otherwise the
/// caller-supplied rule is used when present; a fresh lookup happens only
/// when no rule was supplied.
pub async fn resolve_withholding_state(
    home_state: &str,
    work_state: &str,
    provided_rule: Option<ReciprocityRule>,
    reciprocity: &dyn ReciprocityService,
) -> EngineResult<WithholdingStateResolution> {
    if home_state == work_state {
        return Ok(WithholdingStateResolution {
            state_code: work_state.to_string(),
            reciprocity_applied: false,
            rule: None,
        });
    }

    let rule = match provided_rule {
        Some(rule) => rule,
        None => reciprocity.reciprocity_rule(home_state, work_state).await?,
    };

    if rule.has_agreement {
        Ok(WithholdingStateResolution {
            state_code: home_state.to_string(),
            reciprocity_applied: true,
            rule: Some(rule),
        })
    } else {
        Ok(WithholdingStateResolution {
            state_code: work_state.to_string(),
            reciprocity_applied: false,
            rule: Some(rule),
        })
    }
}

/// Inputs to the state tax calculation.
#[derive(Debug, Clone)]
pub struct StateTaxInput {
    /// Gross pay for the period.
    pub gross_pay: Decimal,
    /// Total pre-tax deductions for the period.
    pub pre_tax_deductions: Decimal,
    /// Additional flat state withholding elected per pay period.
    pub additional_withholding: Decimal,
}

/// Computes state taxable income under the state's own wage definition.
///
/// States differ on whether pre-tax deductions reduce state wages; the
/// formula bundle decides, never an assumption of federal conformity.
pub fn calculate_state_taxable_income(
    gross_pay: Decimal,
    pre_tax_deductions: Decimal,
    formulas: &StateFormulas,
) -> Decimal {
    if formulas.pre_tax_deductions_reduce_wages {
        let taxable = gross_pay - pre_tax_deductions;
        if taxable < Decimal::ZERO { Decimal::ZERO } else { taxable }
    } else {
        gross_pay
    }
}

fn rated_tax_amount(wage: Decimal, tax: &Option<RatedTax>) -> Decimal {
    match tax {
        Some(t) => {
            let capped = match t.wage_base {
                Some(base) if wage > base => base,
                _ => wage,
            };
            t.rate * capped
        }
        None => Decimal::ZERO,
    }
}

/// Computes all state employee-side taxes from the withholding state's
/// formula bundle.
///
/// SDI, employee SUI, and paid family leave are gated by their `Option`
/// formulas; a state without the tax yields exactly 0.00. Each figure is
/// rounded to cents at emission.
pub fn calculate_state_taxes(input: &StateTaxInput, formulas: &StateFormulas) -> StateTaxes {
    let taxable_income =
        calculate_state_taxable_income(input.gross_pay, input.pre_tax_deductions, formulas);

    let income_tax = match &formulas.income_tax {
        IncomeTaxFormula::None => Decimal::ZERO,
        IncomeTaxFormula::Flat { rate } => {
            *rate * taxable_income + input.additional_withholding
        }
        IncomeTaxFormula::Brackets { brackets } => {
            tax_from_brackets(taxable_income, brackets) + input.additional_withholding
        }
    };

    StateTaxes {
        state_code: formulas.state.clone(),
        state_income_tax: round_to_cents(income_tax),
        state_disability_insurance: round_to_cents(rated_tax_amount(input.gross_pay, &formulas.sdi)),
        state_unemployment_insurance: round_to_cents(rated_tax_amount(
            input.gross_pay,
            &formulas.employee_sui,
        )),
        paid_family_leave: round_to_cents(rated_tax_amount(
            input.gross_pay,
            &formulas.paid_family_leave,
        )),
    }
}
