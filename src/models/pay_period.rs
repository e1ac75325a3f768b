//! Pay period models.
//!
//! This module contains the [`PayPeriod`] and [`PeriodType`] types that define
//! the calculation context for a payroll run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The cadence of a pay period.
///
/// The period type selects which period-scaled tax formulas apply to a
/// calculation: bracket thresholds and wage caps differ between a weekly
/// and a monthly payroll run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodType {
    /// 52 pay periods per year.
    Weekly,
    /// 26 pay periods per year.
    Biweekly,
    /// 24 pay periods per year (twice a month).
    Semimonthly,
    /// 12 pay periods per year.
    Monthly,
    /// 4 pay periods per year.
    Quarterly,
    /// A single annual pay period.
    Annually,
}

impl PeriodType {
    /// Returns the number of pay periods of this type in a calendar year.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_tax_engine::models::PeriodType;
    ///
    /// assert_eq!(PeriodType::Biweekly.periods_per_year(), 26);
    /// assert_eq!(PeriodType::Semimonthly.periods_per_year(), 24);
    /// ```
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PeriodType::Weekly => 52,
            PeriodType::Biweekly => 26,
            PeriodType::Semimonthly => 24,
            PeriodType::Monthly => 12,
            PeriodType::Quarterly => 4,
            PeriodType::Annually => 1,
        }
    }

    /// Returns the snake_case name of this period type.
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Weekly => "weekly",
            PeriodType::Biweekly => "biweekly",
            PeriodType::Semimonthly => "semimonthly",
            PeriodType::Monthly => "monthly",
            PeriodType::Quarterly => "quarterly",
            PeriodType::Annually => "annually",
        }
    }
}

/// Represents a pay period: the earning window plus the pay date.
///
/// Local tax rates are effective-dated against `pay_date`, and the period
/// type drives period scaling of bracket tables and wage caps.
///
/// # Example
///
/// ```
/// use payroll_tax_engine::models::{PayPeriod, PeriodType};
/// use chrono::NaiveDate;
///
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
///     pay_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
///     period_type: PeriodType::Biweekly,
/// };
/// assert!(period.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
    /// The date wages are paid; tax rates are resolved as of this date.
    pub pay_date: NaiveDate,
    /// The cadence of the pay period.
    pub period_type: PeriodType,
}

impl PayPeriod {
    /// Validates the date ordering invariant: start ≤ end ≤ pay date.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end_date < self.start_date {
            return Err(EngineError::Validation {
                field: "pay_period.end_date".to_string(),
                message: "end date precedes start date".to_string(),
            });
        }
        if self.pay_date < self.end_date {
            return Err(EngineError::Validation {
                field: "pay_period.pay_date".to_string(),
                message: "pay date precedes end date".to_string(),
            });
        }
        Ok(())
    }
}
