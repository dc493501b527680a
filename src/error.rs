//! Error types for the Bonus Allocation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while building a cohort,
//! loading policy configuration, or running an allocation.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the Bonus Allocation Engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use bonus_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
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

    /// Configuration parsed but holds values the engine cannot use.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the offending value.
        message: String,
    },

    /// A performance rating fell outside the 0-200% domain.
    #[error("Invalid rating for employee '{employee_id}': {value} (must be between 0 and 200)")]
    InvalidRating {
        /// The employee whose rating was rejected.
        employee_id: String,
        /// The rejected rating value.
        value: Decimal,
    },

    /// An allocation parameter was out of range.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// A description of what made the parameter invalid.
        message: String,
    },

    /// An employee record was invalid or contained inconsistent data.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/policy.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/policy.yaml"
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
    fn test_invalid_rating_displays_employee_and_value() {
        let error = EngineError::InvalidRating {
            employee_id: "EMP101".to_string(),
            value: Decimal::from_str("250").unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid rating for employee 'EMP101': 250 (must be between 0 and 200)"
        );
    }

    #[test]
    fn test_invalid_parameter_displays_name_and_message() {
        let error = EngineError::InvalidParameter {
            name: "upside_exponent".to_string(),
            message: "must be greater than 0".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'upside_exponent': must be greater than 0"
        );
    }

    #[test]
    fn test_invalid_employee_displays_field_and_message() {
        let error = EngineError::InvalidEmployee {
            field: "id".to_string(),
            message: "must not be empty".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid employee field 'id': must not be empty"
        );
    }

    #[test]
    fn test_calculation_error_displays_message() {
        let error = EngineError::CalculationError {
            message: "multiplier is not finite".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Calculation error: multiplier is not finite"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_config() -> EngineResult<()> {
            Err(EngineError::InvalidConfig {
                message: "test".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_config()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
