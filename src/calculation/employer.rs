//! Employer-side tax calculation.
//!
//! FUTA, SUTA, the employer FICA match, and state-mandated additional
//! employer taxes. Employer taxes never reduce the employee's net pay.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::EmployerTaxes;
use crate::providers::{FederalFormulas, StateFormulas};

use super::rounding::round_to_cents;
use super::wage_base::taxable_wage;

/// Inputs to the employer tax calculation.
#[derive(Debug, Clone)]
pub struct EmployerTaxInput {
    /// Gross pay for the period.
    pub gross_pay: Decimal,
    /// The Social Security wage figure, after the employee-side cap.
    pub social_security_wages: Decimal,
    /// The Medicare wage figure (uncapped).
    pub medicare_wages: Decimal,
}

/// Computes all employer-side taxes for one pay period.
///
/// FUTA and SUTA each apply their own rate against the period wage capped
/// at their own wage base; the employer FICA match mirrors the
/// employee-side wage figures. Each figure is rounded to cents at
/// emission.
pub fn calculate_employer_taxes(
    input: &EmployerTaxInput,
    federal: &FederalFormulas,
    state: &StateFormulas,
) -> EmployerTaxes {
    let futa_wages = taxable_wage(input.gross_pay, Decimal::ZERO, federal.futa_wage_base);
    let suta_wages = taxable_wage(input.gross_pay, Decimal::ZERO, state.suta_wage_base);

    let mut other = BTreeMap::new();
    for tax in &state.additional_employer_taxes {
        let wages = match tax.wage_base {
            Some(base) => taxable_wage(input.gross_pay, Decimal::ZERO, base),
            None => input.gross_pay,
        };
        let amount = round_to_cents(tax.rate * wages);
        if amount > Decimal::ZERO {
            other.insert(tax.name.clone(), amount);
        }
    }

    EmployerTaxes {
        federal_unemployment: round_to_cents(federal.futa_rate * futa_wages),
        state_unemployment: round_to_cents(state.suta_rate * suta_wages),
        social_security: round_to_cents(federal.social_security_rate * input.social_security_wages),
        medicare: round_to_cents(federal.medicare_rate * input.medicare_wages),
        other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilingStatus, PeriodType};
    use crate::providers::{IncomeTaxFormula, NamedRatedTax, TaxBracket};
    use std::collections::HashMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_federal_formulas() -> FederalFormulas {
        let mut brackets = HashMap::new();
        brackets.insert(
            FilingStatus::Single,
            vec![TaxBracket {
                over: Decimal::ZERO,
                up_to: None,
                rate: dec("0.10"),
                base_tax: Decimal::ZERO,
            }],
        );
        FederalFormulas {
            period_type: PeriodType::Biweekly,
            brackets,
            allowance_amount: dec("165.38"),
            nonresident_alien_addback: dec("367.31"),
            social_security_rate: dec("0.062"),
            social_security_wage_base: dec("176100"),
            medicare_rate: dec("0.0145"),
            additional_medicare_threshold: dec("7692.31"),
            additional_medicare_rate: dec("0.009"),
            futa_rate: dec("0.006"),
            futa_wage_base: dec("269.23"),
        }
    }

    fn create_state_formulas() -> StateFormulas {
        StateFormulas {
            state: "TX".to_string(),
            period_type: PeriodType::Biweekly,
            income_tax: IncomeTaxFormula::None,
            pre_tax_deductions_reduce_wages: true,
            sdi: None,
            employee_sui: None,
            paid_family_leave: None,
            suta_rate: dec("0.027"),
            suta_wage_base: dec("346.15"),
            additional_employer_taxes: vec![],
        }
    }

    fn create_input(gross: &str) -> EmployerTaxInput {
        EmployerTaxInput {
            gross_pay: dec(gross),
            social_security_wages: dec(gross),
            medicare_wages: dec(gross),
        }
    }

    #[test]
    fn test_futa_capped_at_wage_base() {
        let result = calculate_employer_taxes(
            &create_input("2000"),
            &create_federal_formulas(),
            &create_state_formulas(),
        );

        // 0.6% of the 269.23 cap, not of the full 2000
        assert_eq!(result.federal_unemployment, dec("1.62"));
    }

    #[test]
    fn test_suta_capped_at_own_wage_base() {
        let result = calculate_employer_taxes(
            &create_input("2000"),
            &create_federal_formulas(),
            &create_state_formulas(),
        );

        // 2.7% of the 346.15 cap
        assert_eq!(result.state_unemployment, dec("9.35"));
    }

    #[test]
    fn test_wage_below_caps_taxed_in_full() {
        let result = calculate_employer_taxes(
            &create_input("200"),
            &create_federal_formulas(),
            &create_state_formulas(),
        );

        assert_eq!(result.federal_unemployment, dec("1.20"));
        assert_eq!(result.state_unemployment, dec("5.40"));
    }

    #[test]
    fn test_employer_fica_mirrors_employee_wages() {
        let input = EmployerTaxInput {
            gross_pay: dec("3000"),
            // Employee side already capped Social Security wages at 1100
            social_security_wages: dec("1100"),
            medicare_wages: dec("3000"),
        };

        let result = calculate_employer_taxes(
            &input,
            &create_federal_formulas(),
            &create_state_formulas(),
        );

        assert_eq!(result.social_security, dec("68.20"));
        assert_eq!(result.medicare, dec("43.50"));
    }

    #[test]
    fn test_additional_employer_taxes_summed_by_name() {
        let mut state = create_state_formulas();
        state.additional_employer_taxes = vec![
            NamedRatedTax {
                name: "workforce_development".to_string(),
                rate: dec("0.001175"),
                wage_base: Some(dec("1665.38")),
            },
            NamedRatedTax {
                name: "employment_training".to_string(),
                rate: dec("0.001"),
                wage_base: None,
            },
        ];

        let result = calculate_employer_taxes(
            &create_input("2000"),
            &create_federal_formulas(),
            &state,
        );

        assert_eq!(result.other.len(), 2);
        // 0.1175% of the 1665.38 cap
        assert_eq!(result.other["workforce_development"], dec("1.96"));
        // 0.1% of the full 2000
        assert_eq!(result.other["employment_training"], dec("2.00"));
    }

    #[test]
    fn test_zero_rate_additional_taxes_dropped() {
        let mut state = create_state_formulas();
        state.additional_employer_taxes = vec![NamedRatedTax {
            name: "dormant_levy".to_string(),
            rate: Decimal::ZERO,
            wage_base: None,
        }];

        let result = calculate_employer_taxes(
            &create_input("2000"),
            &create_federal_formulas(),
            &state,
        );

        assert!(result.other.is_empty());
    }
}
