//! Employee model and related types.
//!
//! This module defines the [`Employee`] struct together with the filing
//! election and location reference types used to identify where and how an
//! employee is taxed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Federal filing status for income tax withholding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    /// Single filer.
    Single,
    /// Married filing jointly.
    MarriedFilingJointly,
    /// Married filing separately (withheld at the single rate schedule).
    MarriedFilingSeparately,
    /// Head of household.
    HeadOfHousehold,
}

impl FilingStatus {
    /// Returns the snake_case name of this filing status.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilingStatus::Single => "single",
            FilingStatus::MarriedFilingJointly => "married_filing_jointly",
            FilingStatus::MarriedFilingSeparately => "married_filing_separately",
            FilingStatus::HeadOfHousehold => "head_of_household",
        }
    }
}

/// A postal address used for jurisdiction resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line (e.g., "123 Main St").
    pub street: String,
    /// City name.
    pub city: String,
    /// Two-letter state code (e.g., "TX").
    pub state: String,
    /// ZIP code.
    pub zip: String,
}

impl Address {
    /// Returns a single-line rendering of the address for error messages.
    pub fn display_line(&self) -> String {
        format!("{}, {}, {} {}", self.street, self.city, self.state, self.zip)
    }
}

/// A reference to a taxable location: either a full address or a
/// pre-resolved location code.
///
/// At least one of the two sources must be present; when both are supplied
/// the code takes precedence (it skips address geocoding entirely).
///
/// # Example
///
/// ```
/// use payroll_tax_engine::models::LocationRef;
///
/// let by_code = LocationRef::from_code("US-TX-HOU");
/// assert!(by_code.validate("work").is_ok());
///
/// let empty = LocationRef { address: None, code: None };
/// assert!(empty.validate("work").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LocationRef {
    /// The full postal address, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    /// A pre-resolved location code, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl LocationRef {
    /// Creates a location reference from a location code.
    pub fn from_code(code: impl Into<String>) -> Self {
        Self {
            address: None,
            code: Some(code.into()),
        }
    }

    /// Creates a location reference from a full address.
    pub fn from_address(address: Address) -> Self {
        Self {
            address: Some(address),
            code: None,
        }
    }

    /// Validates that this reference carries at least one usable source.
    ///
    /// `field` names the owning field ("home" or "work") in the error.
    pub fn validate(&self, field: &str) -> EngineResult<()> {
        if self.address.is_none() && self.code.is_none() {
            return Err(EngineError::Validation {
                field: field.to_string(),
                message: "location requires an address or a location code".to_string(),
            });
        }
        Ok(())
    }

    /// Returns a human-readable rendering of the reference for diagnostics.
    pub fn describe(&self) -> String {
        match (&self.code, &self.address) {
            (Some(code), _) => code.clone(),
            (None, Some(addr)) => addr.display_line(),
            (None, None) => "<unspecified>".to_string(),
        }
    }
}

/// Represents an employee subject to payroll tax calculation.
///
/// Filing elections and the year-to-date Social Security wage figure are
/// caller-supplied inputs; the engine never mutates them. After a
/// successful run the caller is responsible for persisting an updated YTD
/// figure for the next pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Where the employee lives.
    pub home: LocationRef,
    /// Where the employee works.
    pub work: LocationRef,
    /// Federal filing status.
    pub filing_status: FilingStatus,
    /// Number of federal withholding allowances claimed.
    #[serde(default)]
    pub federal_allowances: u32,
    /// Additional flat federal withholding per pay period.
    #[serde(default)]
    pub additional_withholding: Decimal,
    /// Additional flat state withholding per pay period.
    #[serde(default)]
    pub state_additional_withholding: Decimal,
    /// Whether the employee is a non-resident alien for withholding purposes.
    #[serde(default)]
    pub nonresident_alien: bool,
    /// Year-to-date wages already subjected to Social Security tax.
    #[serde(default)]
    pub ytd_social_security_wages: Decimal,
}

impl Employee {
    /// Validates the employee's required fields.
    pub fn validate(&self) -> EngineResult<()> {
        if self.id.is_empty() {
            return Err(EngineError::Validation {
                field: "employee.id".to_string(),
                message: "employee id must not be empty".to_string(),
            });
        }
        self.home.validate("employee.home")?;
        self.work.validate("employee.work")?;
        if self.ytd_social_security_wages < Decimal::ZERO {
            return Err(EngineError::Validation {
                field: "employee.ytd_social_security_wages".to_string(),
                message: "year-to-date wages must not be negative".to_string(),
            });
        }
        Ok(())
    }
}
