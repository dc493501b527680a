//! Request types for the Bonus Allocation Engine API.
//!
//! This module defines the JSON request structures for the calculation,
//! calibration and settings endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{AllocationParameters, EmployeeRecord};

/// Request body for the `/bonus-calculation` endpoint.
///
/// Exponents left out of the request fall back to the policy defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusCalculationRequest {
    /// Raw employee records, rated or not.
    pub employees: Vec<EmployeeRecord>,
    /// Optional override of the upside curve exponent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upside_exponent: Option<Decimal>,
    /// Optional override of the downside curve exponent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downside_exponent: Option<Decimal>,
}

impl BonusCalculationRequest {
    /// Resolves the curve exponents for this request against the defaults.
    pub fn parameters(&self, defaults: AllocationParameters) -> EngineResult<AllocationParameters> {
        AllocationParameters::new(
            self.upside_exponent.unwrap_or(defaults.upside_exponent),
            self.downside_exponent.unwrap_or(defaults.downside_exponent),
        )
    }
}

/// Request body for the `/calibration` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationRequest {
    /// Raw employee records, rated or not.
    pub employees: Vec<EmployeeRecord>,
}

/// Request body for `PUT /settings/budget-override`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetOverrideRequest {
    /// Signed adjustment to the bonus pool in USD.
    pub budget_override_usd: Decimal,
}
