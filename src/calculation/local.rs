//! Local tax resolution.
//!
//! Merges work-location jurisdictions with residence-based home-location
//! jurisdictions, filters each jurisdiction's effective-dated tax
//! definitions by wage eligibility, and computes the applicable amounts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{JurisdictionSummary, LocalTax, LocationInfo, TaxJurisdiction};
use crate::providers::{LocalTaxRate, TaxDefinition, TaxRateService};

use super::rounding::round_to_cents;

/// Computes the amount of one local tax definition against gross pay.
///
/// Returns `None` when the pay run falls outside the definition's wage
/// eligibility bounds.
fn local_tax_amount(definition: &TaxDefinition, gross_pay: Decimal) -> Option<Decimal> {
    if let Some(minimum) = definition.minimum_wage {
        if gross_pay < minimum {
            return None;
        }
    }
    if let Some(maximum) = definition.maximum_wage {
        if gross_pay > maximum {
            return None;
        }
    }
    let amount = match definition.rate {
        LocalTaxRate::Percentage(rate) => rate * gross_pay,
        LocalTaxRate::FlatAmount(amount) => amount,
    };
    Some(round_to_cents(amount))
}

/// Merges work and home jurisdictions into the candidate list.
///
/// All non-state work jurisdictions apply; home jurisdictions join only
/// when flagged residence-based, deduplicated by jurisdiction id (the
/// work-side entry wins).
fn candidate_jurisdictions<'a>(
    work: &'a LocationInfo,
    home: &'a LocationInfo,
) -> Vec<&'a TaxJurisdiction> {
    let mut candidates: Vec<&TaxJurisdiction> = work.local_jurisdictions().collect();
    for jurisdiction in home.local_jurisdictions() {
        if jurisdiction.residence_based
            && !candidates
                .iter()
                .any(|c| c.jurisdiction_id == jurisdiction.jurisdiction_id)
        {
            candidates.push(jurisdiction);
        }
    }
    candidates
}

/// Resolves and computes every applicable local tax for a pay run.
///
/// One [`LocalTax`] entry is produced per jurisdiction with at least one
/// non-zero tax; jurisdictions whose taxes all filter out or compute to
/// zero are omitted entirely. Rates are fetched as of the pay date.
pub async fn resolve_local_taxes(
    work: &LocationInfo,
    home: &LocationInfo,
    gross_pay: Decimal,
    pay_date: NaiveDate,
    rates: &dyn TaxRateService,
) -> EngineResult<Vec<LocalTax>> {
    let mut results = Vec::new();

    for jurisdiction in candidate_jurisdictions(work, home) {
        let definitions = rates
            .local_tax_rates(&jurisdiction.jurisdiction_id, pay_date)
            .await?;

        let mut taxes = BTreeMap::new();
        for definition in &definitions {
            if let Some(amount) = local_tax_amount(definition, gross_pay) {
                if amount > Decimal::ZERO {
                    taxes.insert(definition.tax_type.clone(), amount);
                }
            }
        }

        if !taxes.is_empty() {
            results.push(LocalTax {
                jurisdiction: JurisdictionSummary {
                    name: jurisdiction.jurisdiction_name.clone(),
                    jurisdiction_type: jurisdiction.jurisdiction_type,
                    code: jurisdiction.jurisdiction_code.clone(),
                },
                taxes,
            });
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JurisdictionType;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn pay_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()
    }

    struct StubRates {
        rates: HashMap<String, Vec<TaxDefinition>>,
    }

    #[async_trait]
    impl TaxRateService for StubRates {
        async fn local_tax_rates(
            &self,
            jurisdiction_id: &str,
            _as_of: NaiveDate,
        ) -> EngineResult<Vec<TaxDefinition>> {
            Ok(self.rates.get(jurisdiction_id).cloned().unwrap_or_default())
        }

        async fn social_security_wage_base(&self) -> EngineResult<Decimal> {
            Ok(dec("176100"))
        }
    }

    fn jurisdiction(
        id: &str,
        name: &str,
        kind: JurisdictionType,
        residence_based: bool,
    ) -> TaxJurisdiction {
        TaxJurisdiction {
            jurisdiction_id: id.to_string(),
            jurisdiction_name: name.to_string(),
            jurisdiction_type: kind,
            jurisdiction_code: format!("{}-code", id),
            residence_based,
        }
    }

    fn percentage_definition(tax_type: &str, rate: &str) -> TaxDefinition {
        TaxDefinition {
            tax_type: tax_type.to_string(),
            rate: LocalTaxRate::Percentage(dec(rate)),
            minimum_wage: None,
            maximum_wage: None,
            effective_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        }
    }

    fn location(state: &str, jurisdictions: Vec<TaxJurisdiction>) -> LocationInfo {
        LocationInfo {
            state: state.to_string(),
            tax_jurisdictions: jurisdictions,
        }
    }

    #[tokio::test]
    async fn test_work_jurisdiction_taxes_computed() {
        let work = location(
            "PA",
            vec![jurisdiction(
                "PA-PHL-CITY",
                "Philadelphia",
                JurisdictionType::City,
                false,
            )],
        );
        let home = location("PA", vec![]);

        let mut rates = HashMap::new();
        rates.insert(
            "PA-PHL-CITY".to_string(),
            vec![percentage_definition("city_wage_tax", "0.0375")],
        );
        let service = StubRates { rates };

        let result = resolve_local_taxes(&work, &home, dec("2000"), pay_date(), &service)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].jurisdiction.name, "Philadelphia");
        assert_eq!(result[0].taxes["city_wage_tax"], dec("75.00"));
    }

    #[tokio::test]
    async fn test_residence_based_home_jurisdiction_included() {
        let work = location("PA", vec![]);
        let home = location(
            "OH",
            vec![
                jurisdiction("OH-CLE-CITY", "Cleveland", JurisdictionType::City, true),
                jurisdiction("OH-CUY-CTY", "Cuyahoga County", JurisdictionType::County, false),
            ],
        );

        let mut rates = HashMap::new();
        rates.insert(
            "OH-CLE-CITY".to_string(),
            vec![percentage_definition("municipal_income_tax", "0.025")],
        );
        rates.insert(
            "OH-CUY-CTY".to_string(),
            vec![percentage_definition("county_tax", "0.01")],
        );
        let service = StubRates { rates };

        let result = resolve_local_taxes(&work, &home, dec("2000"), pay_date(), &service)
            .await
            .unwrap();

        // Only the residence-based home jurisdiction applies
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].jurisdiction.name, "Cleveland");
        assert_eq!(result[0].taxes["municipal_income_tax"], dec("50.00"));
    }

    #[tokio::test]
    async fn test_shared_jurisdiction_reported_once() {
        let shared = jurisdiction("PA-PHL-CITY", "Philadelphia", JurisdictionType::City, true);
        let work = location("PA", vec![shared.clone()]);
        let home = location("PA", vec![shared]);

        let mut rates = HashMap::new();
        rates.insert(
            "PA-PHL-CITY".to_string(),
            vec![percentage_definition("city_wage_tax", "0.0375")],
        );
        let service = StubRates { rates };

        let result = resolve_local_taxes(&work, &home, dec("2000"), pay_date(), &service)
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_wage_below_minimum_filters_tax() {
        let work = location(
            "KY",
            vec![jurisdiction(
                "KY-LOU-CITY",
                "Louisville",
                JurisdictionType::City,
                false,
            )],
        );
        let home = location("KY", vec![]);

        let mut definition = percentage_definition("occupational_tax", "0.0145");
        definition.minimum_wage = Some(dec("500"));

        let mut rates = HashMap::new();
        rates.insert("KY-LOU-CITY".to_string(), vec![definition]);
        let service = StubRates { rates };

        let result = resolve_local_taxes(&work, &home, dec("400"), pay_date(), &service)
            .await
            .unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_wage_above_maximum_filters_tax() {
        let work = location(
            "KY",
            vec![jurisdiction(
                "KY-LOU-CITY",
                "Louisville",
                JurisdictionType::City,
                false,
            )],
        );
        let home = location("KY", vec![]);

        let mut definition = percentage_definition("occupational_tax", "0.0145");
        definition.maximum_wage = Some(dec("5000"));

        let mut rates = HashMap::new();
        rates.insert("KY-LOU-CITY".to_string(), vec![definition]);
        let service = StubRates { rates };

        let result = resolve_local_taxes(&work, &home, dec("6000"), pay_date(), &service)
            .await
            .unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_multiple_simultaneous_local_taxes() {
        let work = location(
            "PA",
            vec![
                jurisdiction("PA-PHL-CITY", "Philadelphia", JurisdictionType::City, false),
                jurisdiction(
                    "PA-PHL-SD",
                    "Philadelphia School District",
                    JurisdictionType::School,
                    false,
                ),
            ],
        );
        let home = location("PA", vec![]);

        let mut rates = HashMap::new();
        rates.insert(
            "PA-PHL-CITY".to_string(),
            vec![percentage_definition("city_wage_tax", "0.0375")],
        );
        rates.insert(
            "PA-PHL-SD".to_string(),
            vec![percentage_definition("school_district_tax", "0.005")],
        );
        let service = StubRates { rates };

        let result = resolve_local_taxes(&work, &home, dec("2000"), pay_date(), &service)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].taxes["city_wage_tax"], dec("75.00"));
        assert_eq!(result[1].taxes["school_district_tax"], dec("10.00"));
    }

    #[tokio::test]
    async fn test_flat_amount_definition() {
        let work = location(
            "CO",
            vec![jurisdiction(
                "CO-DEN-CITY",
                "Denver",
                JurisdictionType::City,
                false,
            )],
        );
        let home = location("CO", vec![]);

        let definition = TaxDefinition {
            tax_type: "occupational_privilege_tax".to_string(),
            rate: LocalTaxRate::FlatAmount(dec("5.75")),
            minimum_wage: Some(dec("500")),
            maximum_wage: None,
            effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };

        let mut rates = HashMap::new();
        rates.insert("CO-DEN-CITY".to_string(), vec![definition]);
        let service = StubRates { rates };

        let result = resolve_local_taxes(&work, &home, dec("2000"), pay_date(), &service)
            .await
            .unwrap();

        assert_eq!(result[0].taxes["occupational_privilege_tax"], dec("5.75"));
    }

    #[tokio::test]
    async fn test_zero_amount_taxes_are_dropped() {
        let work = location(
            "PA",
            vec![jurisdiction(
                "PA-PHL-CITY",
                "Philadelphia",
                JurisdictionType::City,
                false,
            )],
        );
        let home = location("PA", vec![]);

        let mut rates = HashMap::new();
        rates.insert(
            "PA-PHL-CITY".to_string(),
            vec![percentage_definition("city_wage_tax", "0")],
        );
        let service = StubRates { rates };

        let result = resolve_local_taxes(&work, &home, dec("2000"), pay_date(), &service)
            .await
            .unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_no_jurisdictions_yields_empty_result() {
        let work = location("TX", vec![]);
        let home = location("TX", vec![]);
        let service = StubRates {
            rates: HashMap::new(),
        };

        let result = resolve_local_taxes(&work, &home, dec("2000"), pay_date(), &service)
            .await
            .unwrap();

        assert!(result.is_empty());
    }
}
