//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type: a YAML-backed
//! implementation of all four collaborator interfaces, suitable for
//! tests, benchmarks, and deployments that ship their tax data as files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calculation::round_to_cents;
use crate::error::{EngineError, EngineResult};
use crate::models::{Address, LocationInfo, PeriodType};
use crate::providers::{
    FederalFormulas, IncomeTaxFormula, LocationService, NamedRatedTax, RatedTax, ReciprocityRule,
    ReciprocityService, StateFormulas, TaxBracket, TaxDefinition, TaxFormulasService,
    TaxRateService,
};

use super::types::{
    FederalConfig, LocalsConfig, LocationConfig, ReciprocityConfig, StateConfig, StatesConfig,
};

/// Loads tax configuration from YAML and serves it through the
/// collaborator interfaces.
///
/// Config files carry annual figures; formula requests scale bracket
/// bounds, base taxes, and wage caps down to the requested period type
/// (rates are dimensionless and pass through). The Social Security wage
/// base stays annual because it is compared against year-to-date wages.
///
/// # Directory Structure
///
/// ```text
/// config/us2025/
/// ├── federal.yaml      # annual brackets per filing status, FICA/FUTA
/// ├── states.yaml       # per-state annual tables and capability formulas
/// ├── reciprocity.yaml  # ordered (home, work) agreement pairs
/// └── locals.yaml       # location directory + per-jurisdiction rates
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_tax_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/us2025").unwrap();
/// assert_eq!(loader.year(), 2025);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    federal: FederalConfig,
    states: HashMap<String, StateConfig>,
    agreements: HashMap<(String, String), Option<String>>,
    locations: HashMap<String, LocationConfig>,
    local_rates: HashMap<String, Vec<TaxDefinition>>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/us2025")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if any
    /// required file is missing or contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let federal = Self::load_yaml::<FederalConfig>(&path.join("federal.yaml"))?;
        let states_config = Self::load_yaml::<StatesConfig>(&path.join("states.yaml"))?;
        let reciprocity = Self::load_yaml::<ReciprocityConfig>(&path.join("reciprocity.yaml"))?;
        let locals = Self::load_yaml::<LocalsConfig>(&path.join("locals.yaml"))?;

        let agreements = reciprocity
            .agreements
            .into_iter()
            .map(|a| ((a.home, a.work), a.details))
            .collect();
        let locations = locals
            .locations
            .into_iter()
            .map(|location| (location.code.clone(), location))
            .collect();

        Ok(Self {
            federal,
            states: states_config.states,
            agreements,
            locations,
            local_rates: locals.rates,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the tax year this configuration describes.
    pub fn year(&self) -> i32 {
        self.federal.year
    }

    /// Scales an annual monetary amount down to one pay period.
    fn scale_amount(amount: Decimal, periods_per_year: u32) -> Decimal {
        round_to_cents(amount / Decimal::from(periods_per_year))
    }

    /// Scales an annual bracket table down to one pay period.
    fn scale_brackets(brackets: &[TaxBracket], periods_per_year: u32) -> Vec<TaxBracket> {
        brackets
            .iter()
            .map(|bracket| TaxBracket {
                over: Self::scale_amount(bracket.over, periods_per_year),
                up_to: bracket
                    .up_to
                    .map(|bound| Self::scale_amount(bound, periods_per_year)),
                rate: bracket.rate,
                base_tax: Self::scale_amount(bracket.base_tax, periods_per_year),
            })
            .collect()
    }

    fn scale_income_tax(formula: &IncomeTaxFormula, periods_per_year: u32) -> IncomeTaxFormula {
        match formula {
            IncomeTaxFormula::None => IncomeTaxFormula::None,
            IncomeTaxFormula::Flat { rate } => IncomeTaxFormula::Flat { rate: *rate },
            IncomeTaxFormula::Brackets { brackets } => IncomeTaxFormula::Brackets {
                brackets: Self::scale_brackets(brackets, periods_per_year),
            },
        }
    }

    fn scale_rated(tax: &Option<RatedTax>, periods_per_year: u32) -> Option<RatedTax> {
        tax.as_ref().map(|t| RatedTax {
            rate: t.rate,
            wage_base: t
                .wage_base
                .map(|base| Self::scale_amount(base, periods_per_year)),
        })
    }
}

#[async_trait]
impl LocationService for ConfigLoader {
    async fn validate_location(&self, address: &Address) -> EngineResult<LocationInfo> {
        self.locations
            .values()
            .find(|location| {
                location.state.eq_ignore_ascii_case(&address.state)
                    && (location.zips.iter().any(|zip| zip == &address.zip)
                        || location.city.eq_ignore_ascii_case(&address.city))
            })
            .map(|location| LocationInfo {
                state: location.state.clone(),
                tax_jurisdictions: location.jurisdictions.clone(),
            })
            .ok_or_else(|| EngineError::LocationNotFound {
                reference: address.display_line(),
            })
    }

    async fn location_by_code(&self, code: &str) -> EngineResult<LocationInfo> {
        self.locations
            .get(code)
            .map(|location| LocationInfo {
                state: location.state.clone(),
                tax_jurisdictions: location.jurisdictions.clone(),
            })
            .ok_or_else(|| EngineError::LocationNotFound {
                reference: code.to_string(),
            })
    }
}

#[async_trait]
impl ReciprocityService for ConfigLoader {
    async fn reciprocity_rule(
        &self,
        home_state: &str,
        work_state: &str,
    ) -> EngineResult<ReciprocityRule> {
        let key = (home_state.to_string(), work_state.to_string());
        match self.agreements.get(&key) {
            Some(details) => Ok(ReciprocityRule {
                has_agreement: true,
                details: details.clone(),
            }),
            None => Ok(ReciprocityRule::none()),
        }
    }
}

#[async_trait]
impl TaxFormulasService for ConfigLoader {
    async fn federal_formulas(&self, period_type: PeriodType) -> EngineResult<FederalFormulas> {
        let periods = period_type.periods_per_year();
        let brackets = self
            .federal
            .brackets
            .iter()
            .map(|(status, table)| (*status, Self::scale_brackets(table, periods)))
            .collect();

        Ok(FederalFormulas {
            period_type,
            brackets,
            allowance_amount: Self::scale_amount(self.federal.allowance_amount, periods),
            nonresident_alien_addback: Self::scale_amount(
                self.federal.nonresident_alien_addback,
                periods,
            ),
            social_security_rate: self.federal.social_security_rate,
            // Annual: compared against year-to-date wages, never scaled.
            social_security_wage_base: self.federal.social_security_wage_base,
            medicare_rate: self.federal.medicare_rate,
            additional_medicare_threshold: Self::scale_amount(
                self.federal.additional_medicare_threshold,
                periods,
            ),
            additional_medicare_rate: self.federal.additional_medicare_rate,
            futa_rate: self.federal.futa_rate,
            futa_wage_base: Self::scale_amount(self.federal.futa_wage_base, periods),
        })
    }

    async fn state_formulas(
        &self,
        state: &str,
        period_type: PeriodType,
    ) -> EngineResult<StateFormulas> {
        let periods = period_type.periods_per_year();
        let config = self
            .states
            .get(state)
            .ok_or_else(|| EngineError::FormulasNotFound {
                jurisdiction: state.to_string(),
                period_type: period_type.as_str().to_string(),
            })?;

        Ok(StateFormulas {
            state: state.to_string(),
            period_type,
            income_tax: Self::scale_income_tax(&config.income_tax, periods),
            pre_tax_deductions_reduce_wages: config.pre_tax_deductions_reduce_wages,
            sdi: Self::scale_rated(&config.sdi, periods),
            employee_sui: Self::scale_rated(&config.employee_sui, periods),
            paid_family_leave: Self::scale_rated(&config.paid_family_leave, periods),
            suta_rate: config.suta_rate,
            suta_wage_base: Self::scale_amount(config.suta_wage_base, periods),
            additional_employer_taxes: config
                .additional_employer_taxes
                .iter()
                .map(|tax| NamedRatedTax {
                    name: tax.name.clone(),
                    rate: tax.rate,
                    wage_base: tax.wage_base.map(|base| Self::scale_amount(base, periods)),
                })
                .collect(),
        })
    }
}

#[async_trait]
impl TaxRateService for ConfigLoader {
    async fn local_tax_rates(
        &self,
        jurisdiction_id: &str,
        as_of: NaiveDate,
    ) -> EngineResult<Vec<TaxDefinition>> {
        let Some(definitions) = self.local_rates.get(jurisdiction_id) else {
            return Ok(Vec::new());
        };

        // Keep only the most recent definition per tax type that is in
        // force as of the requested date.
        let mut latest: HashMap<&str, &TaxDefinition> = HashMap::new();
        for definition in definitions.iter().filter(|d| d.effective_date <= as_of) {
            match latest.get(definition.tax_type.as_str()) {
                Some(existing) if existing.effective_date >= definition.effective_date => {}
                _ => {
                    latest.insert(definition.tax_type.as_str(), definition);
                }
            }
        }

        let mut result: Vec<TaxDefinition> = latest.into_values().cloned().collect();
        result.sort_by(|a, b| a.tax_type.cmp(&b.tax_type));
        Ok(result)
    }

    async fn social_security_wage_base(&self) -> EngineResult<Decimal> {
        Ok(self.federal.social_security_wage_base)
    }
}
