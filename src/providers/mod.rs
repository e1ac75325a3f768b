//! Collaborator interfaces consumed by the calculation engine.
//!
//! The engine never stores tax rates, jurisdiction boundaries, or
//! reciprocity agreements itself; it consumes them through the narrow
//! async traits defined here. The [`crate::config`] module ships a
//! YAML-backed implementation of all four traits.

mod formulas;
mod location;
mod rates;
mod reciprocity;

pub use formulas::{
    FederalFormulas, IncomeTaxFormula, NamedRatedTax, RatedTax, StateFormulas, TaxBracket,
    TaxFormulasService,
};
pub use location::LocationService;
pub use rates::{LocalTaxRate, TaxDefinition, TaxRateService};
pub use reciprocity::{ReciprocityRule, ReciprocityService};
