//! Configuration types for the YAML-backed tax data provider.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Config files carry
//! annual figures; the loader scales them to the requested period type.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{FilingStatus, TaxJurisdiction};
use crate::providers::{IncomeTaxFormula, NamedRatedTax, RatedTax, TaxBracket, TaxDefinition};

/// Federal tax configuration from `federal.yaml`, in annual terms.
#[derive(Debug, Clone, Deserialize)]
pub struct FederalConfig {
    /// The tax year the configuration describes.
    pub year: i32,
    /// Social Security (OASDI) tax rate.
    pub social_security_rate: Decimal,
    /// Annual Social Security wage base.
    pub social_security_wage_base: Decimal,
    /// Medicare tax rate.
    pub medicare_rate: Decimal,
    /// Annual wage threshold for Additional Medicare.
    pub additional_medicare_threshold: Decimal,
    /// Additional Medicare tax rate.
    pub additional_medicare_rate: Decimal,
    /// FUTA tax rate (net of the standard state credit).
    pub futa_rate: Decimal,
    /// Annual FUTA wage base.
    pub futa_wage_base: Decimal,
    /// Annual taxable-income reduction per withholding allowance.
    pub allowance_amount: Decimal,
    /// Annual wage addback for non-resident aliens.
    pub nonresident_alien_addback: Decimal,
    /// Annual withholding bracket tables per filing status.
    pub brackets: HashMap<FilingStatus, Vec<TaxBracket>>,
}

/// One state's tax configuration, in annual terms.
#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    /// How the state computes income tax (annual brackets where applicable).
    pub income_tax: IncomeTaxFormula,
    /// Whether pre-tax deductions reduce state taxable wages.
    pub pre_tax_deductions_reduce_wages: bool,
    /// State disability insurance (employee share), if levied.
    #[serde(default)]
    pub sdi: Option<RatedTax>,
    /// State unemployment insurance (employee share), if levied.
    #[serde(default)]
    pub employee_sui: Option<RatedTax>,
    /// Paid family leave contribution, if levied.
    #[serde(default)]
    pub paid_family_leave: Option<RatedTax>,
    /// State unemployment (SUTA) tax rate, employer side.
    pub suta_rate: Decimal,
    /// Annual SUTA wage base.
    pub suta_wage_base: Decimal,
    /// State-specific additional employer taxes (annual wage bases).
    #[serde(default)]
    pub additional_employer_taxes: Vec<NamedRatedTax>,
}

/// State configuration file structure (`states.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct StatesConfig {
    /// Map of two-letter state code to state configuration.
    pub states: HashMap<String, StateConfig>,
}

/// One reciprocity agreement for an ordered (home, work) state pair.
#[derive(Debug, Clone, Deserialize)]
pub struct AgreementConfig {
    /// The home state of the pair.
    pub home: String,
    /// The work state of the pair.
    pub work: String,
    /// Free-form details about the agreement.
    #[serde(default)]
    pub details: Option<String>,
}

/// Reciprocity configuration file structure (`reciprocity.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct ReciprocityConfig {
    /// Every agreement pair. Bilateral agreements appear once per direction.
    pub agreements: Vec<AgreementConfig>,
}

/// One known location in the directory.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationConfig {
    /// The location code (e.g., "US-PA-PHL").
    pub code: String,
    /// Two-letter state code.
    pub state: String,
    /// City name, matched case-insensitively during address resolution.
    pub city: String,
    /// ZIP codes covered by this location.
    #[serde(default)]
    pub zips: Vec<String>,
    /// Taxing jurisdictions tied to this location.
    #[serde(default)]
    pub jurisdictions: Vec<TaxJurisdiction>,
}

/// Local tax configuration file structure (`locals.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct LocalsConfig {
    /// The location directory.
    pub locations: Vec<LocationConfig>,
    /// Effective-dated tax definitions per jurisdiction id.
    #[serde(default)]
    pub rates: HashMap<String, Vec<TaxDefinition>>,
}
