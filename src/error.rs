//! Error types for the payroll tax calculation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during tax calculation.

use thiserror::Error;

/// The main error type for the payroll tax calculation engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_tax_engine::error::EngineError;
///
/// let error = EngineError::LocationNotFound {
///     reference: "US-XX-UNKNOWN".to_string(),
/// };
/// assert_eq!(error.to_string(), "Location not found: US-XX-UNKNOWN");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A required input field was missing or malformed.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A location reference (address or code) could not be resolved.
    #[error("Location not found: {reference}")]
    LocationNotFound {
        /// The address or location code that could not be resolved.
        reference: String,
    },

    /// No tax formulas exist for the given jurisdiction and period type.
    #[error("Tax formulas not found for jurisdiction '{jurisdiction}' ({period_type})")]
    FormulasNotFound {
        /// The jurisdiction (state code or "federal") that was queried.
        jurisdiction: String,
        /// The pay period type the formulas were requested for.
        period_type: String,
    },

    /// A formula bundle was resolved but is missing a required field.
    #[error("Incomplete tax formulas for '{jurisdiction}': {detail}")]
    MissingFormula {
        /// The jurisdiction whose formula bundle is incomplete.
        jurisdiction: String,
        /// A description of the missing piece.
        detail: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An unexpected failure occurred during a calculation stage.
    #[error("Calculation error in {stage} stage: {message}")]
    Calculation {
        /// The stage that failed (federal, state, local, employer).
        stage: String,
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Returns a stable machine-readable code for this error.
    ///
    /// Callers embedding engine errors into batch result records or API
    /// payloads use these codes for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Validation { .. } => "VALIDATION_ERROR",
            EngineError::LocationNotFound { .. } => "LOCATION_NOT_FOUND",
            EngineError::FormulasNotFound { .. } => "FORMULAS_NOT_FOUND",
            EngineError::MissingFormula { .. } => "MISSING_FORMULA",
            EngineError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            EngineError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            EngineError::Calculation { .. } => "CALCULATION_ERROR",
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = EngineError::Validation {
            field: "pay_period.end_date".to_string(),
            message: "end date precedes start date".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid field 'pay_period.end_date': end date precedes start date"
        );
    }

    #[test]
    fn test_location_not_found_displays_reference() {
        let error = EngineError::LocationNotFound {
            reference: "123 Nowhere Ln, Springfield".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Location not found: 123 Nowhere Ln, Springfield"
        );
    }

    #[test]
    fn test_formulas_not_found_displays_jurisdiction_and_period() {
        let error = EngineError::FormulasNotFound {
            jurisdiction: "NY".to_string(),
            period_type: "biweekly".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Tax formulas not found for jurisdiction 'NY' (biweekly)"
        );
    }

    #[test]
    fn test_missing_formula_displays_detail() {
        let error = EngineError::MissingFormula {
            jurisdiction: "federal".to_string(),
            detail: "no bracket table for filing status 'single'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Incomplete tax formulas for 'federal': no bracket table for filing status 'single'"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_calculation_error_displays_stage() {
        let error = EngineError::Calculation {
            stage: "federal".to_string(),
            message: "negative taxable income".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Calculation error in federal stage: negative taxable income"
        );
    }

    #[test]
    fn test_error_codes_are_stable() {
        let error = EngineError::Validation {
            field: "earnings".to_string(),
            message: "missing".to_string(),
        };
        assert_eq!(error.code(), "VALIDATION_ERROR");

        let error = EngineError::LocationNotFound {
            reference: "x".to_string(),
        };
        assert_eq!(error.code(), "LOCATION_NOT_FOUND");

        let error = EngineError::Calculation {
            stage: "local".to_string(),
            message: "x".to_string(),
        };
        assert_eq!(error.code(), "CALCULATION_ERROR");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_location_not_found() -> EngineResult<()> {
            Err(EngineError::LocationNotFound {
                reference: "test".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_location_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
