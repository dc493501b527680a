//! HTTP API module for the Bonus Allocation Engine.
//!
//! This module provides the REST API endpoints for bonus calculation,
//! calibration analysis and the budget override setting.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{BonusCalculationRequest, BudgetOverrideRequest, CalibrationRequest};
pub use response::{ApiError, BonusCalculationResponse, BudgetOverrideResponse, CalibrationResponse};
pub use state::AppState;
