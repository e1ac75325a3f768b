//! Gross-to-net orchestration.
//!
//! [`PayrollTaxEngine`] sequences the leaf calculators over the external
//! collaborator lookups: validate input, resolve locations, compute
//! federal, state, local, and employer taxes, then reduce gross pay to
//! net pay. Batch and multistate variants fan out over the same
//! single-employee pipeline.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    EmployerTaxInput, FederalTaxInput, StateTaxInput, calculate_employer_taxes,
    calculate_federal_taxes, calculate_state_taxes, resolve_local_taxes,
    resolve_withholding_state, taxable_wage,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BatchResult, CalculationResult, Deductions, Earnings, Employee, EmployeeOutcome,
    GrossToNetSummary, LocationInfo, LocationRef, LocationTaxes, MultistateResult, PayPeriod,
    PeriodType, ReciprocitySummary,
};
use crate::providers::{
    LocationService, ReciprocityService, StateFormulas, TaxFormulasService, TaxRateService,
};

/// Default bound on concurrent per-employee calculations in a batch.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;

/// A single-employee gross-to-net calculation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The employee to calculate taxes for.
    pub employee: Employee,
    /// The pay period being processed.
    pub pay_period: PayPeriod,
    /// Earnings for the period.
    pub earnings: Earnings,
    /// Pre- and post-tax deductions for the period.
    #[serde(default)]
    pub deductions: Deductions,
}

impl CalculationRequest {
    /// Validates all required fields before any computation begins.
    pub fn validate(&self) -> EngineResult<()> {
        self.employee.validate()?;
        self.pay_period.validate()?;
        self.earnings.validate()?;
        self.deductions.validate()
    }
}

/// One employee's entry in a batch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEmployee {
    /// The employee to calculate taxes for.
    pub employee: Employee,
    /// Earnings for the period.
    pub earnings: Earnings,
    /// Pre- and post-tax deductions for the period.
    #[serde(default)]
    pub deductions: Deductions,
}

/// A batch calculation request: many employees, one shared pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRequest {
    /// The pay period shared by every employee in the batch.
    pub pay_period: PayPeriod,
    /// The employees to process.
    pub employees: Vec<BatchEmployee>,
}

/// An earnings slice tied to one work location of a multistate request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLocationEarnings {
    /// The work location for this slice.
    pub location: LocationRef,
    /// The earnings attributable to this location.
    pub earnings: Earnings,
}

/// A multistate calculation request: one employee whose earnings are
/// split across several work locations within one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultistateRequest {
    /// The employee to calculate taxes for. The home location is a hard
    /// precondition; the employee's own work location is ignored in
    /// favor of the per-slice locations.
    pub employee: Employee,
    /// The pay period being processed.
    pub pay_period: PayPeriod,
    /// The per-location earnings slices.
    pub work_locations: Vec<WorkLocationEarnings>,
}

impl MultistateRequest {
    /// Validates the request, including the home-location precondition.
    pub fn validate(&self) -> EngineResult<()> {
        if self.employee.id.is_empty() {
            return Err(EngineError::Validation {
                field: "employee.id".to_string(),
                message: "employee id must not be empty".to_string(),
            });
        }
        self.employee.home.validate("employee.home")?;
        self.pay_period.validate()?;
        if self.work_locations.is_empty() {
            return Err(EngineError::Validation {
                field: "work_locations".to_string(),
                message: "at least one work location is required".to_string(),
            });
        }
        for (index, slice) in self.work_locations.iter().enumerate() {
            slice
                .location
                .validate(&format!("work_locations[{}].location", index))?;
            slice.earnings.validate()?;
        }
        Ok(())
    }
}

/// The gross-to-net payroll tax engine.
///
/// Holds shared handles to the four external collaborators and is cheap
/// to clone; batch fan-out clones the engine into each worker task.
///
/// # Example
///
/// ```no_run
/// use payroll_tax_engine::config::ConfigLoader;
/// use payroll_tax_engine::engine::PayrollTaxEngine;
/// use std::sync::Arc;
///
/// let loader = Arc::new(ConfigLoader::load("./config/us2025").unwrap());
/// let engine = PayrollTaxEngine::new(
///     loader.clone(),
///     loader.clone(),
///     loader.clone(),
///     loader,
/// );
/// ```
#[derive(Clone)]
pub struct PayrollTaxEngine {
    locations: Arc<dyn LocationService>,
    reciprocity: Arc<dyn ReciprocityService>,
    formulas: Arc<dyn TaxFormulasService>,
    rates: Arc<dyn TaxRateService>,
    batch_concurrency: usize,
}

impl PayrollTaxEngine {
    /// Creates an engine over the four collaborator services.
    pub fn new(
        locations: Arc<dyn LocationService>,
        reciprocity: Arc<dyn ReciprocityService>,
        formulas: Arc<dyn TaxFormulasService>,
        rates: Arc<dyn TaxRateService>,
    ) -> Self {
        Self {
            locations,
            reciprocity,
            formulas,
            rates,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }

    /// Overrides the bound on concurrent per-employee batch calculations.
    pub fn with_batch_concurrency(mut self, batch_concurrency: usize) -> Self {
        self.batch_concurrency = batch_concurrency.max(1);
        self
    }

    /// Resolves a location reference through the location service.
    ///
    /// A pre-resolved code skips address validation entirely.
    async fn resolve_location(&self, location: &LocationRef) -> EngineResult<LocationInfo> {
        if let Some(code) = &location.code {
            self.locations.location_by_code(code).await
        } else if let Some(address) = &location.address {
            self.locations.validate_location(address).await
        } else {
            Err(EngineError::Validation {
                field: "location".to_string(),
                message: "location requires an address or a location code".to_string(),
            })
        }
    }

    /// Computes gross-to-net taxes for a single employee.
    ///
    /// Validation happens before any external lookup; the first error
    /// encountered afterwards is propagated with the failing stage named
    /// in its context.
    pub async fn calculate_taxes(
        &self,
        request: &CalculationRequest,
    ) -> EngineResult<CalculationResult> {
        let correlation_id = Uuid::new_v4();
        let start = Instant::now();
        request.validate()?;

        let employee = &request.employee;
        let period_type = request.pay_period.period_type;

        // Home and work resolution are independent lookups.
        let (home, work) = tokio::join!(
            self.resolve_location(&employee.home),
            self.resolve_location(&employee.work),
        );
        let (home, work) = (home?, work?);

        let gross_pay = request.earnings.gross_pay();
        let pre_tax_deductions = request.deductions.pre_tax.amount();
        let post_tax_deductions = request.deductions.post_tax.amount();
        let mut federal_taxable_income = gross_pay - pre_tax_deductions;
        if federal_taxable_income < Decimal::ZERO {
            federal_taxable_income = Decimal::ZERO;
        }

        let federal_formulas = self.formulas.federal_formulas(period_type).await?;
        let federal = calculate_federal_taxes(
            &FederalTaxInput {
                taxable_income: federal_taxable_income,
                filing_status: employee.filing_status,
                allowances: employee.federal_allowances,
                additional_withholding: employee.additional_withholding,
                nonresident_alien: employee.nonresident_alien,
                ytd_social_security_wages: employee.ytd_social_security_wages,
            },
            &federal_formulas,
        )?;

        let resolution = resolve_withholding_state(
            &home.state,
            &work.state,
            None,
            self.reciprocity.as_ref(),
        )
        .await?;
        let state_formulas = self
            .formulas
            .state_formulas(&resolution.state_code, period_type)
            .await?;
        let state = calculate_state_taxes(
            &StateTaxInput {
                gross_pay,
                pre_tax_deductions,
                additional_withholding: employee.state_additional_withholding,
            },
            &state_formulas,
        );

        let local = resolve_local_taxes(
            &work,
            &home,
            gross_pay,
            request.pay_period.pay_date,
            self.rates.as_ref(),
        )
        .await?;

        // Employer taxes always follow the work state, even when
        // reciprocity moved employee withholding to the home state.
        let work_state_formulas = self
            .work_state_formulas(&state_formulas, &work.state, period_type)
            .await?;
        let social_security_wages = taxable_wage(
            federal_taxable_income,
            employee.ytd_social_security_wages,
            federal_formulas.social_security_wage_base,
        );
        let employer = calculate_employer_taxes(
            &EmployerTaxInput {
                gross_pay,
                social_security_wages,
                medicare_wages: federal_taxable_income,
            },
            &federal_formulas,
            &work_state_formulas,
        );

        let local_total: Decimal = local.iter().map(|tax| tax.total()).sum();
        let total_taxes = federal.total() + state.total() + local_total;
        let net_pay = gross_pay - pre_tax_deductions - total_taxes - post_tax_deductions;

        info!(
            correlation_id = %correlation_id,
            employee_id = %employee.id,
            withholding_state = %state.state_code,
            gross_pay = %gross_pay,
            net_pay = %net_pay,
            duration_us = start.elapsed().as_micros() as u64,
            "Calculation completed"
        );

        Ok(CalculationResult {
            calculation_id: correlation_id,
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            employee_id: employee.id.clone(),
            pay_period: request.pay_period.clone(),
            federal,
            state,
            local,
            employer,
            total_taxes,
            net_pay,
            summary: GrossToNetSummary {
                gross_pay,
                pre_tax_deductions,
                federal_taxable_income,
                total_taxes,
                post_tax_deductions,
                net_pay,
            },
        })
    }

    /// Reuses the withholding-state formulas for the employer side when
    /// they already cover the work state, fetching fresh ones otherwise.
    async fn work_state_formulas(
        &self,
        withholding_formulas: &StateFormulas,
        work_state: &str,
        period_type: PeriodType,
    ) -> EngineResult<StateFormulas> {
        if withholding_formulas.state == work_state {
            Ok(withholding_formulas.clone())
        } else {
            self.formulas.state_formulas(work_state, period_type).await
        }
    }

    /// Computes taxes for a batch of employees sharing one pay period.
    ///
    /// Per-employee calculations run concurrently under a bounded worker
    /// pool; a failing employee yields an error record in its input
    /// position rather than aborting the batch.
    pub async fn calculate_batch_taxes(&self, request: &BatchRequest) -> EngineResult<BatchResult> {
        let batch_id = Uuid::new_v4();
        request.pay_period.validate()?;

        info!(
            batch_id = %batch_id,
            total_employees = request.employees.len(),
            "Processing batch calculation"
        );

        let semaphore = Arc::new(Semaphore::new(self.batch_concurrency));
        let mut handles = Vec::with_capacity(request.employees.len());
        for entry in &request.employees {
            let engine = self.clone();
            let semaphore = semaphore.clone();
            let calc_request = CalculationRequest {
                employee: entry.employee.clone(),
                pay_period: request.pay_period.clone(),
                earnings: entry.earnings.clone(),
                deductions: entry.deductions.clone(),
            };
            let employee_id = entry.employee.id.clone();
            handles.push((
                employee_id,
                tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.ok();
                    let employee_id = calc_request.employee.id.clone();
                    match engine.calculate_taxes(&calc_request).await {
                        Ok(result) => EmployeeOutcome::Success {
                            result: Box::new(result),
                        },
                        Err(err) => {
                            warn!(
                                employee_id = %employee_id,
                                error = %err,
                                "Employee calculation failed within batch"
                            );
                            EmployeeOutcome::Error {
                                employee_id,
                                code: err.code().to_string(),
                                message: err.to_string(),
                            }
                        }
                    }
                }),
            ));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (employee_id, handle) in handles {
            match handle.await {
                Ok(outcome) => results.push(outcome),
                Err(join_error) => results.push(EmployeeOutcome::Error {
                    employee_id,
                    code: "CALCULATION_ERROR".to_string(),
                    message: format!("calculation task failed: {}", join_error),
                }),
            }
        }

        Ok(BatchResult {
            batch_id,
            timestamp: Utc::now(),
            total_employees: request.employees.len(),
            results,
        })
    }

    /// Computes taxes for one employee whose earnings span several work
    /// locations in one pay period.
    ///
    /// Federal taxes are computed once on the combined earnings (federal
    /// tax is not state-scoped); each location's earnings slice gets its
    /// own state and local computation with reciprocity resolved against
    /// the home state.
    pub async fn calculate_multistate_taxes(
        &self,
        request: &MultistateRequest,
    ) -> EngineResult<MultistateResult> {
        let calculation_id = Uuid::new_v4();
        request.validate()?;

        let employee = &request.employee;
        let period_type = request.pay_period.period_type;
        let home = self.resolve_location(&employee.home).await?;

        let total_earnings: Decimal = request
            .work_locations
            .iter()
            .map(|slice| slice.earnings.gross_pay())
            .sum();

        let federal_formulas = self.formulas.federal_formulas(period_type).await?;
        let federal = calculate_federal_taxes(
            &FederalTaxInput {
                taxable_income: total_earnings,
                filing_status: employee.filing_status,
                allowances: employee.federal_allowances,
                additional_withholding: employee.additional_withholding,
                nonresident_alien: employee.nonresident_alien,
                ytd_social_security_wages: employee.ytd_social_security_wages,
            },
            &federal_formulas,
        )?;

        let mut locations = Vec::with_capacity(request.work_locations.len());
        let mut reciprocity_rules: Vec<ReciprocitySummary> = Vec::new();
        for slice in &request.work_locations {
            let work = self.resolve_location(&slice.location).await?;
            let slice_gross = slice.earnings.gross_pay();

            let resolution = resolve_withholding_state(
                &home.state,
                &work.state,
                None,
                self.reciprocity.as_ref(),
            )
            .await?;
            let state_formulas = self
                .formulas
                .state_formulas(&resolution.state_code, period_type)
                .await?;
            let state = calculate_state_taxes(
                &StateTaxInput {
                    gross_pay: slice_gross,
                    pre_tax_deductions: Decimal::ZERO,
                    additional_withholding: Decimal::ZERO,
                },
                &state_formulas,
            );
            let local = resolve_local_taxes(
                &work,
                &home,
                slice_gross,
                request.pay_period.pay_date,
                self.rates.as_ref(),
            )
            .await?;

            // Same-state slices carry no rule; cross-state rules are
            // aggregated once per state pair.
            if let Some(rule) = &resolution.rule {
                let already_recorded = reciprocity_rules
                    .iter()
                    .any(|r| r.home_state == home.state && r.work_state == work.state);
                if !already_recorded {
                    reciprocity_rules.push(ReciprocitySummary {
                        home_state: home.state.clone(),
                        work_state: work.state.clone(),
                        has_agreement: rule.has_agreement,
                        details: rule.details.clone(),
                    });
                }
            }

            locations.push(LocationTaxes {
                work_state: work.state.clone(),
                earnings: slice_gross,
                state,
                local,
                reciprocity_applied: resolution.reciprocity_applied,
            });
        }

        let state_and_local_total: Decimal = locations
            .iter()
            .map(|location| {
                location.state.total()
                    + location
                        .local
                        .iter()
                        .map(|tax| tax.total())
                        .sum::<Decimal>()
            })
            .sum();
        let total_taxes = federal.total() + state_and_local_total;

        info!(
            calculation_id = %calculation_id,
            employee_id = %employee.id,
            locations = locations.len(),
            total_earnings = %total_earnings,
            "Multistate calculation completed"
        );

        Ok(MultistateResult {
            calculation_id,
            timestamp: Utc::now(),
            employee_id: employee.id.clone(),
            pay_period: request.pay_period.clone(),
            total_earnings,
            federal,
            locations,
            reciprocity_rules,
            total_taxes,
        })
    }
}
