//! Core data models for the payroll tax calculation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod earnings;
mod employee;
mod location;
mod pay_period;

pub use calculation_result::{
    BatchResult, CalculationResult, EmployeeOutcome, EmployerTaxes, FederalTaxes,
    GrossToNetSummary, JurisdictionSummary, LocalTax, LocationTaxes, MultistateResult,
    ReciprocitySummary, StateTaxes,
};
pub use earnings::{Deductions, Earnings, PostTaxDeductions, PreTaxDeductions};
pub use employee::{Address, Employee, FilingStatus, LocationRef};
pub use location::{JurisdictionType, LocationInfo, TaxJurisdiction};
pub use pay_period::{PayPeriod, PeriodType};
