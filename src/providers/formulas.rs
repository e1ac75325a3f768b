//! Tax formula bundles and the formula lookup interface.
//!
//! Formula bundles carry every rate, bracket table, and wage base the
//! calculators need for one (jurisdiction, period type) pair. The engine
//! never hardcodes tax values; everything numeric lives in these bundles.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{FilingStatus, PeriodType};

/// One bracket of a progressive tax table.
///
/// A bracket applies to income strictly above `over` and up to `up_to`
/// (unbounded for the top bracket). The tax for income inside a bracket is
/// `base_tax + rate × (income − over)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// The lower bound of the bracket (exclusive).
    pub over: Decimal,
    /// The upper bound of the bracket (inclusive); `None` for the top bracket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_to: Option<Decimal>,
    /// The marginal rate inside the bracket.
    pub rate: Decimal,
    /// Cumulative tax owed on income up to `over`.
    pub base_tax: Decimal,
}

/// Federal tax formulas for one period type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederalFormulas {
    /// The period type these formulas are scaled to.
    pub period_type: PeriodType,
    /// Withholding bracket tables per filing status.
    pub brackets: HashMap<FilingStatus, Vec<TaxBracket>>,
    /// Per-period taxable-income reduction per withholding allowance.
    pub allowance_amount: Decimal,
    /// Per-period wage addback applied to non-resident aliens before the
    /// bracket table.
    pub nonresident_alien_addback: Decimal,
    /// Social Security (OASDI) tax rate.
    pub social_security_rate: Decimal,
    /// Annual Social Security wage base.
    pub social_security_wage_base: Decimal,
    /// Medicare tax rate.
    pub medicare_rate: Decimal,
    /// Per-period wage threshold above which Additional Medicare applies.
    pub additional_medicare_threshold: Decimal,
    /// Additional Medicare tax rate.
    pub additional_medicare_rate: Decimal,
    /// Federal unemployment (FUTA) tax rate, employer side.
    pub futa_rate: Decimal,
    /// Per-period FUTA wage cap.
    pub futa_wage_base: Decimal,
}

/// How a state computes income tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum IncomeTaxFormula {
    /// The state levies no income tax.
    None,
    /// A single flat rate on taxable income.
    Flat {
        /// The flat tax rate.
        rate: Decimal,
    },
    /// A progressive bracket table.
    Brackets {
        /// The bracket table, ordered by `over` ascending.
        brackets: Vec<TaxBracket>,
    },
}

/// A rate with an optional wage cap, for capability-gated taxes
/// (SDI, employee SUI, paid family leave).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatedTax {
    /// The tax rate.
    pub rate: Decimal,
    /// Per-period wage cap; uncapped when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wage_base: Option<Decimal>,
}

/// A named employer-side tax with an optional wage cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRatedTax {
    /// The tax name (e.g., "workforce_development").
    pub name: String,
    /// The tax rate.
    pub rate: Decimal,
    /// Per-period wage cap; uncapped when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wage_base: Option<Decimal>,
}

/// State tax formulas for one (state, period type) pair.
///
/// Capability-gated taxes are modeled as `Option`s: a state without SDI has
/// `sdi: None`, which computes to exactly zero, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFormulas {
    /// Two-letter state code.
    pub state: String,
    /// The period type these formulas are scaled to.
    pub period_type: PeriodType,
    /// How the state computes income tax.
    pub income_tax: IncomeTaxFormula,
    /// Whether pre-tax deductions reduce state taxable wages. States
    /// differ on federal conformity here.
    pub pre_tax_deductions_reduce_wages: bool,
    /// State disability insurance (employee share), if levied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdi: Option<RatedTax>,
    /// State unemployment insurance (employee share), if levied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_sui: Option<RatedTax>,
    /// Paid family leave contribution, if levied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_family_leave: Option<RatedTax>,
    /// State unemployment (SUTA) tax rate, employer side.
    pub suta_rate: Decimal,
    /// Per-period SUTA wage cap.
    pub suta_wage_base: Decimal,
    /// State-specific additional employer taxes.
    #[serde(default)]
    pub additional_employer_taxes: Vec<NamedRatedTax>,
}

/// Supplies period-scaled tax formula bundles per jurisdiction.
#[async_trait]
pub trait TaxFormulasService: Send + Sync {
    /// Returns the federal formulas scaled to the given period type.
    async fn federal_formulas(&self, period_type: PeriodType) -> EngineResult<FederalFormulas>;

    /// Returns the formulas for a state, scaled to the given period type.
    async fn state_formulas(
        &self,
        state: &str,
        period_type: PeriodType,
    ) -> EngineResult<StateFormulas>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_income_tax_formula_serialization_is_tagged() {
        let none = IncomeTaxFormula::None;
        assert_eq!(
            serde_json::to_string(&none).unwrap(),
            r#"{"method":"none"}"#
        );

        let flat = IncomeTaxFormula::Flat { rate: dec("0.0307") };
        let json = serde_json::to_string(&flat).unwrap();
        assert!(json.contains("\"method\":\"flat\""));
        assert!(json.contains("0.0307"));
    }

    #[test]
    fn test_income_tax_formula_brackets_round_trip() {
        let formula = IncomeTaxFormula::Brackets {
            brackets: vec![
                TaxBracket {
                    over: Decimal::ZERO,
                    up_to: Some(dec("8500")),
                    rate: dec("0.04"),
                    base_tax: Decimal::ZERO,
                },
                TaxBracket {
                    over: dec("8500"),
                    up_to: None,
                    rate: dec("0.045"),
                    base_tax: dec("340"),
                },
            ],
        };

        let json = serde_json::to_string(&formula).unwrap();
        let deserialized: IncomeTaxFormula = serde_json::from_str(&json).unwrap();
        assert_eq!(formula, deserialized);
    }

    #[test]
    fn test_rated_tax_skips_absent_wage_base() {
        let uncapped = RatedTax {
            rate: dec("0.012"),
            wage_base: None,
        };
        let json = serde_json::to_string(&uncapped).unwrap();
        assert!(!json.contains("wage_base"));
    }

    #[test]
    fn test_state_formulas_capability_flags_deserialize_absent() {
        let json = r#"{
            "state": "TX",
            "period_type": "biweekly",
            "income_tax": { "method": "none" },
            "pre_tax_deductions_reduce_wages": true,
            "suta_rate": "0.027",
            "suta_wage_base": "346.15"
        }"#;

        let formulas: StateFormulas = serde_json::from_str(json).unwrap();
        assert!(formulas.sdi.is_none());
        assert!(formulas.employee_sui.is_none());
        assert!(formulas.paid_family_leave.is_none());
        assert!(formulas.additional_employer_taxes.is_empty());
    }
}
