//! Calculation result models for the payroll tax engine.
//!
//! This module contains the [`CalculationResult`] type and its associated
//! structures that capture all outputs from a gross-to-net calculation,
//! together with the batch and multistate result envelopes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{JurisdictionType, PayPeriod};

/// Employee-side federal taxes for one pay period.
///
/// # Example
///
/// ```
/// use payroll_tax_engine::models::FederalTaxes;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let federal = FederalTaxes {
///     federal_income_tax: Decimal::from_str("201.29").unwrap(),
///     social_security: Decimal::from_str("124.00").unwrap(),
///     medicare: Decimal::from_str("29.00").unwrap(),
///     additional_medicare: Decimal::ZERO,
/// };
/// assert_eq!(federal.total(), Decimal::from_str("354.29").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederalTaxes {
    /// Federal income tax withholding.
    pub federal_income_tax: Decimal,
    /// Social Security (OASDI) tax, subject to the annual wage base.
    pub social_security: Decimal,
    /// Medicare tax (uncapped).
    pub medicare: Decimal,
    /// Additional Medicare tax above the annual threshold.
    pub additional_medicare: Decimal,
}

impl FederalTaxes {
    /// Sum of all federal employee-side taxes.
    pub fn total(&self) -> Decimal {
        self.federal_income_tax + self.social_security + self.medicare + self.additional_medicare
    }
}

/// Employee-side state taxes for one pay period.
///
/// `state_code` is the withholding state after reciprocity resolution; it
/// may differ from the work state when a reciprocity agreement applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTaxes {
    /// The state whose taxes were withheld.
    pub state_code: String,
    /// State income tax withholding.
    pub state_income_tax: Decimal,
    /// State disability insurance (employee share), 0 where not levied.
    pub state_disability_insurance: Decimal,
    /// State unemployment insurance (employee share), 0 where not levied.
    pub state_unemployment_insurance: Decimal,
    /// Paid family leave contribution, 0 where not levied.
    pub paid_family_leave: Decimal,
}

impl StateTaxes {
    /// Sum of all state employee-side taxes.
    pub fn total(&self) -> Decimal {
        self.state_income_tax
            + self.state_disability_insurance
            + self.state_unemployment_insurance
            + self.paid_family_leave
    }
}

/// Identifying metadata for a local taxing jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionSummary {
    /// Human-readable jurisdiction name.
    pub name: String,
    /// The kind of taxing authority.
    pub jurisdiction_type: JurisdictionType,
    /// The official jurisdiction code.
    pub code: String,
}

/// Taxes levied by a single local jurisdiction.
///
/// Jurisdiction metadata is kept separate from the variable-keyed tax map,
/// so callers never have to guess which keys are taxes and which are
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTax {
    /// The jurisdiction that levied these taxes.
    pub jurisdiction: JurisdictionSummary,
    /// Tax type to amount; only non-zero amounts are recorded.
    pub taxes: BTreeMap<String, Decimal>,
}

impl LocalTax {
    /// Sum of all taxes levied by this jurisdiction.
    pub fn total(&self) -> Decimal {
        self.taxes.values().copied().sum()
    }
}

/// Employer-side taxes for one pay period.
///
/// These are informational: they never reduce the employee's net pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerTaxes {
    /// Federal unemployment tax (FUTA).
    pub federal_unemployment: Decimal,
    /// State unemployment tax (SUTA).
    pub state_unemployment: Decimal,
    /// Employer Social Security match.
    pub social_security: Decimal,
    /// Employer Medicare match.
    pub medicare: Decimal,
    /// State-specific additional employer taxes, by name.
    #[serde(default)]
    pub other: BTreeMap<String, Decimal>,
}

impl EmployerTaxes {
    /// Sum of all employer-side taxes.
    pub fn total(&self) -> Decimal {
        self.federal_unemployment
            + self.state_unemployment
            + self.social_security
            + self.medicare
            + self.other.values().copied().sum::<Decimal>()
    }
}

/// The arithmetic trail from gross pay down to net pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrossToNetSummary {
    /// Gross pay for the period.
    pub gross_pay: Decimal,
    /// Total pre-tax deductions.
    pub pre_tax_deductions: Decimal,
    /// Federal taxable income (gross minus pre-tax deductions).
    pub federal_taxable_income: Decimal,
    /// Total employee-side taxes.
    pub total_taxes: Decimal,
    /// Total post-tax deductions.
    pub post_tax_deductions: Decimal,
    /// Net pay after deductions and taxes.
    pub net_pay: Decimal,
}

/// The complete result of a single gross-to-net calculation.
///
/// Produced fresh per call and never mutated afterwards; persistence of
/// results (and of updated YTD wage figures) belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The ID of the employee the calculation is for.
    pub employee_id: String,
    /// The pay period for this calculation.
    pub pay_period: PayPeriod,
    /// Employee-side federal taxes.
    pub federal: FederalTaxes,
    /// Employee-side state taxes (after reciprocity resolution).
    pub state: StateTaxes,
    /// Local taxes, one entry per applicable jurisdiction.
    pub local: Vec<LocalTax>,
    /// Employer-side taxes.
    pub employer: EmployerTaxes,
    /// Total employee-side taxes.
    pub total_taxes: Decimal,
    /// Net pay after deductions and taxes.
    pub net_pay: Decimal,
    /// The arithmetic trail from gross to net.
    pub summary: GrossToNetSummary,
}

/// The outcome of one employee within a batch calculation.
///
/// A failing employee never aborts the batch; its error is recorded here
/// instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmployeeOutcome {
    /// The employee's calculation succeeded.
    Success {
        /// The completed calculation.
        result: Box<CalculationResult>,
    },
    /// The employee's calculation failed.
    Error {
        /// The ID of the employee that failed.
        employee_id: String,
        /// Machine-readable error code.
        code: String,
        /// Human-readable error message.
        message: String,
    },
}

impl EmployeeOutcome {
    /// Returns true if this outcome is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, EmployeeOutcome::Success { .. })
    }
}

/// The envelope returned by a batch calculation.
///
/// Always returned successfully: per-employee failures appear as
/// [`EmployeeOutcome::Error`] records in `results`, preserving input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Unique identifier for this batch run.
    pub batch_id: Uuid,
    /// When the batch was processed.
    pub timestamp: DateTime<Utc>,
    /// Number of employees submitted.
    pub total_employees: usize,
    /// Per-employee outcomes, in input order.
    pub results: Vec<EmployeeOutcome>,
}

/// A reciprocity rule that was consulted for a multistate calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReciprocitySummary {
    /// The employee's home state.
    pub home_state: String,
    /// The work state the rule was resolved against.
    pub work_state: String,
    /// Whether a reciprocity agreement exists for the pair.
    pub has_agreement: bool,
    /// Free-form agreement details, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// State and local taxes for one work location of a multistate calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationTaxes {
    /// The work state for this earnings slice.
    pub work_state: String,
    /// The earnings allocated to this location.
    pub earnings: Decimal,
    /// State taxes computed for this slice (after reciprocity).
    pub state: StateTaxes,
    /// Local taxes computed for this slice.
    pub local: Vec<LocalTax>,
    /// Whether a reciprocity agreement redirected withholding to the
    /// home state for this location.
    pub reciprocity_applied: bool,
}

/// The result of a multistate calculation: one employee, several work
/// locations, a single federal computation over the combined earnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultistateResult {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The ID of the employee the calculation is for.
    pub employee_id: String,
    /// The pay period for this calculation.
    pub pay_period: PayPeriod,
    /// Combined earnings across all work locations.
    pub total_earnings: Decimal,
    /// Federal taxes, computed once on the combined earnings.
    pub federal: FederalTaxes,
    /// Per-work-location state and local taxes.
    pub locations: Vec<LocationTaxes>,
    /// Reciprocity rules consulted across cross-state locations,
    /// deduplicated by state pair.
    pub reciprocity_rules: Vec<ReciprocitySummary>,
    /// Total employee-side taxes across federal, state, and local.
    pub total_taxes: Decimal,
}
