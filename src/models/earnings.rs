//! Earnings and deduction models.
//!
//! Earnings and both deduction groups follow the same shape: a set of named
//! components plus an optional precomputed `total` that overrides the
//! component sum when present.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Earnings for one pay period, broken down by component.
///
/// # Example
///
/// ```
/// use payroll_tax_engine::models::Earnings;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let earnings = Earnings {
///     regular: Decimal::from_str("1800.00").unwrap(),
///     overtime: Decimal::from_str("200.00").unwrap(),
///     ..Earnings::default()
/// };
/// assert_eq!(earnings.gross_pay(), Decimal::from_str("2000.00").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Earnings {
    /// Regular wages.
    #[serde(default)]
    pub regular: Decimal,
    /// Overtime wages.
    #[serde(default)]
    pub overtime: Decimal,
    /// Bonus payments.
    #[serde(default)]
    pub bonus: Decimal,
    /// Commission payments.
    #[serde(default)]
    pub commission: Decimal,
    /// Any other earnings.
    #[serde(default)]
    pub other: Decimal,
    /// Precomputed total; overrides the component sum when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

impl Earnings {
    /// Creates earnings from a precomputed total.
    pub fn from_total(total: Decimal) -> Self {
        Self {
            total: Some(total),
            ..Self::default()
        }
    }

    /// Returns the gross pay: the precomputed total if present, otherwise
    /// the sum of components.
    pub fn gross_pay(&self) -> Decimal {
        self.total.unwrap_or_else(|| {
            self.regular + self.overtime + self.bonus + self.commission + self.other
        })
    }

    /// Validates that every component (and the override) is non-negative.
    pub fn validate(&self) -> EngineResult<()> {
        let components = [
            ("earnings.regular", self.regular),
            ("earnings.overtime", self.overtime),
            ("earnings.bonus", self.bonus),
            ("earnings.commission", self.commission),
            ("earnings.other", self.other),
        ];
        for (field, value) in components {
            if value < Decimal::ZERO {
                return Err(EngineError::Validation {
                    field: field.to_string(),
                    message: "earnings components must not be negative".to_string(),
                });
            }
        }
        if let Some(total) = self.total {
            if total < Decimal::ZERO {
                return Err(EngineError::Validation {
                    field: "earnings.total".to_string(),
                    message: "earnings total must not be negative".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Pre-tax deductions that reduce federal taxable income.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PreTaxDeductions {
    /// 401(k) retirement contributions.
    #[serde(default)]
    pub retirement_401k: Decimal,
    /// Medical insurance premiums.
    #[serde(default)]
    pub medical: Decimal,
    /// Dental insurance premiums.
    #[serde(default)]
    pub dental: Decimal,
    /// Vision insurance premiums.
    #[serde(default)]
    pub vision: Decimal,
    /// Health savings account contributions.
    #[serde(default)]
    pub hsa: Decimal,
    /// Flexible spending account contributions.
    #[serde(default)]
    pub fsa: Decimal,
    /// Any other pre-tax deductions.
    #[serde(default)]
    pub other: Decimal,
    /// Precomputed total; overrides the component sum when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

impl PreTaxDeductions {
    /// Returns the total pre-tax deduction amount.
    pub fn amount(&self) -> Decimal {
        self.total.unwrap_or_else(|| {
            self.retirement_401k
                + self.medical
                + self.dental
                + self.vision
                + self.hsa
                + self.fsa
                + self.other
        })
    }
}

/// Post-tax deductions applied after all taxes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PostTaxDeductions {
    /// Wage garnishments.
    #[serde(default)]
    pub garnishments: Decimal,
    /// Any other post-tax deductions.
    #[serde(default)]
    pub other: Decimal,
    /// Precomputed total; overrides the component sum when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

impl PostTaxDeductions {
    /// Returns the total post-tax deduction amount.
    pub fn amount(&self) -> Decimal {
        self.total.unwrap_or_else(|| self.garnishments + self.other)
    }
}

/// The full set of deductions for one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Deductions {
    /// Deductions taken before taxes.
    #[serde(default)]
    pub pre_tax: PreTaxDeductions,
    /// Deductions taken after taxes.
    #[serde(default)]
    pub post_tax: PostTaxDeductions,
}

impl Deductions {
    /// Validates that no deduction amount is negative.
    pub fn validate(&self) -> EngineResult<()> {
        if self.pre_tax.amount() < Decimal::ZERO {
            return Err(EngineError::Validation {
                field: "deductions.pre_tax".to_string(),
                message: "pre-tax deductions must not be negative".to_string(),
            });
        }
        if self.post_tax.amount() < Decimal::ZERO {
            return Err(EngineError::Validation {
                field: "deductions.post_tax".to_string(),
                message: "post-tax deductions must not be negative".to_string(),
            });
        }
        Ok(())
    }
}
