//! Local tax rate definitions and the rate lookup interface.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// How a local tax is computed from gross pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalTaxRate {
    /// A percentage of gross pay.
    Percentage(Decimal),
    /// A flat amount per pay period.
    FlatAmount(Decimal),
}

/// A single local tax levied by a jurisdiction.
///
/// Definitions are effective-dated; the rate service returns only the
/// definitions in force as of the requested date. The optional wage bounds
/// gate eligibility: a pay run outside `[minimum_wage, maximum_wage]` is
/// not subject to the tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxDefinition {
    /// The kind of tax (e.g., "city_wage_tax", "school_district_tax").
    pub tax_type: String,
    /// How the tax is computed.
    pub rate: LocalTaxRate,
    /// Minimum gross pay for the tax to apply (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_wage: Option<Decimal>,
    /// Maximum gross pay for the tax to apply (inclusive).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_wage: Option<Decimal>,
    /// The date this definition came into force.
    pub effective_date: NaiveDate,
}

/// Supplies effective-dated local tax definitions and shared wage bases.
#[async_trait]
pub trait TaxRateService: Send + Sync {
    /// Returns the tax definitions in force for a jurisdiction as of a date.
    async fn local_tax_rates(
        &self,
        jurisdiction_id: &str,
        as_of: NaiveDate,
    ) -> EngineResult<Vec<TaxDefinition>>;

    /// Returns the annual Social Security wage base.
    async fn social_security_wage_base(&self) -> EngineResult<Decimal>;
}
