//! Calculation logic for the payroll tax engine.
//!
//! This module contains the leaf calculators the orchestrator composes:
//! wage-base capping, progressive bracket application, federal taxes,
//! state taxes with withholding-state resolution, local tax resolution,
//! employer-side taxes, and the shared monetary rounding policy.

mod brackets;
mod employer;
mod federal;
mod local;
mod rounding;
mod state;
mod wage_base;

pub use brackets::tax_from_brackets;
pub use employer::{EmployerTaxInput, calculate_employer_taxes};
pub use federal::{FederalTaxInput, calculate_federal_taxes};
pub use local::resolve_local_taxes;
pub use rounding::round_to_cents;
pub use state::{
    StateTaxInput, WithholdingStateResolution, calculate_state_taxable_income,
    calculate_state_taxes, resolve_withholding_state,
};
pub use wage_base::taxable_wage;
