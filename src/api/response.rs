//! Response types for the Bonus Allocation Engine API.
//!
//! This module defines the success bodies of each endpoint together with the
//! error response structures and the mapping from [`EngineError`].

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{
    Allocation, AllocationParameters, CalibrationBucket, JobRatingAverage, RatingBandCount,
    TeamCalibration, TeamComparison, TeamRatingAverage,
};

/// Response body for the `/bonus-calculation` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusCalculationResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that produced this response.
    pub engine_version: String,
    /// The curve exponents used.
    pub parameters: AllocationParameters,
    /// The budget override in effect for this calculation.
    pub budget_override_usd: Decimal,
    /// Records that carried a rating.
    pub rated_count: usize,
    /// Records skipped for lack of a rating.
    pub unrated_count: usize,
    /// The org-level allocation, results sorted by final bonus descending.
    pub allocation: Allocation,
    /// Team-level allocations keyed by team id (multi-team cohorts only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<BTreeMap<String, Allocation>>,
    /// Org versus team comparisons (multi-team cohorts only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparisons: Option<Vec<TeamComparison>>,
    /// Processing time in microseconds.
    pub duration_us: u64,
}

/// Response body for the `/calibration` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationResponse {
    /// Number of rated employees analysed.
    pub total_rated: usize,
    /// Org-level calibration buckets in display order.
    pub buckets: Vec<CalibrationBucket>,
    /// Per-team calibration (multi-team cohorts only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<TeamCalibration>>,
    /// Rating histogram.
    pub histogram: Vec<RatingBandCount>,
    /// Mean rating per team.
    pub team_averages: Vec<TeamRatingAverage>,
    /// Mean rating per job profile.
    pub job_averages: Vec<JobRatingAverage>,
}

/// Response body for the budget override settings endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetOverrideResponse {
    /// The current signed adjustment to the bonus pool in USD.
    pub budget_override_usd: Decimal,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a missing content type error response.
    pub fn missing_content_type() -> Self {
        Self::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates a 400 response for a request body problem.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidConfig { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Invalid configuration", message),
            },
            EngineError::InvalidRating { employee_id, value } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_RATING",
                    format!("Invalid rating for employee '{}': {}", employee_id, value),
                    "Ratings must be between 0 and 200 percent",
                ),
            },
            EngineError::InvalidParameter { name, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_PARAMETER",
                    format!("Invalid parameter '{}': {}", name, message),
                    "Curve exponents must be greater than 0 and at most 10",
                ),
            },
            EngineError::InvalidEmployee { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_EMPLOYEE",
                    format!("Invalid employee field '{}': {}", field, message),
                    "The employee data contains invalid information",
                ),
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}
