//! HTTP request handlers for the Bonus Allocation Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    build_cohort, calibrate, calibrate_teams, group_by_team, job_rating_averages,
    rating_histogram, reconcile, team_rating_averages,
};
use crate::config::ConfigLoader;
use crate::error::EngineError;

use super::request::{BonusCalculationRequest, BudgetOverrideRequest, CalibrationRequest};
use super::response::{
    ApiError, ApiErrorResponse, BonusCalculationResponse, BudgetOverrideResponse,
    CalibrationResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/bonus-calculation", post(bonus_calculation_handler))
        .route("/calibration", post(calibration_handler))
        .route(
            "/settings/budget-override",
            get(get_budget_override_handler).put(put_budget_override_handler),
        )
        .with_state(state)
}

/// Handler for POST /bonus-calculation.
///
/// Builds the rated cohort, reconciles org and team allocations and returns
/// the org allocation sorted by final bonus.
async fn bonus_calculation_handler(
    State(state): State<AppState>,
    payload: Result<Json<BonusCalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing bonus calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let budget_override_usd = state.budget_override().await;

    match perform_bonus_calculation(&request, state.config(), budget_override_usd) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                rated_count = result.rated_count,
                unrated_count = result.unrated_count,
                total_pool_usd = %result.allocation.summary.total_pool_usd,
                budget_override_usd = %budget_override_usd,
                duration_us = result.duration_us,
                "Bonus calculation completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => engine_error_response(err, correlation_id, "Bonus calculation failed"),
    }
}

/// Runs the engine for one calculation request.
fn perform_bonus_calculation(
    request: &BonusCalculationRequest,
    config: &ConfigLoader,
    budget_override_usd: Decimal,
) -> Result<BonusCalculationResponse, EngineError> {
    let start_time = Instant::now();

    let parameters = request.parameters(config.allocation_defaults())?;
    let cohort = build_cohort(&request.employees)?;
    let reconciliation = reconcile(&cohort.employees, &parameters, budget_override_usd)?;

    let mut allocation = reconciliation.org;
    allocation.sort_by_final_bonus_desc();

    let (teams, comparisons) = if reconciliation.multi_team {
        let mut teams = reconciliation.teams;
        for team in teams.values_mut() {
            team.sort_by_final_bonus_desc();
        }
        (Some(teams), Some(reconciliation.comparisons))
    } else {
        (None, None)
    };

    let duration_us = start_time.elapsed().as_micros() as u64;

    Ok(BonusCalculationResponse {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        parameters,
        budget_override_usd,
        rated_count: cohort.employees.len(),
        unrated_count: cohort.unrated_count,
        allocation,
        teams,
        comparisons,
        duration_us,
    })
}

/// Handler for POST /calibration.
async fn calibration_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalibrationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calibration request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    match perform_calibration(&request, state.config()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                total_rated = result.total_rated,
                team_count = result.team_averages.len(),
                "Calibration completed successfully"
            );
            json_response(StatusCode::OK, result)
        }
        Err(err) => engine_error_response(err, correlation_id, "Calibration failed"),
    }
}

fn perform_calibration(
    request: &CalibrationRequest,
    config: &ConfigLoader,
) -> Result<CalibrationResponse, EngineError> {
    let policy = config.calibration_policy();
    let cohort = build_cohort(&request.employees)?;
    let employees = &cohort.employees;

    let teams = if group_by_team(employees).len() > 1 {
        Some(calibrate_teams(employees, policy)?)
    } else {
        None
    };

    Ok(CalibrationResponse {
        total_rated: employees.len(),
        buckets: calibrate(employees, policy),
        teams,
        histogram: rating_histogram(employees),
        team_averages: team_rating_averages(employees),
        job_averages: job_rating_averages(employees),
    })
}

/// Handler for GET /settings/budget-override.
async fn get_budget_override_handler(State(state): State<AppState>) -> Response {
    let budget_override_usd = state.budget_override().await;
    json_response(StatusCode::OK, BudgetOverrideResponse { budget_override_usd })
}

/// Handler for PUT /settings/budget-override.
async fn put_budget_override_handler(
    State(state): State<AppState>,
    payload: Result<Json<BudgetOverrideRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    state.set_budget_override(request.budget_override_usd).await;
    info!(
        correlation_id = %correlation_id,
        budget_override_usd = %request.budget_override_usd,
        "Budget override updated"
    );

    json_response(
        StatusCode::OK,
        BudgetOverrideResponse {
            budget_override_usd: request.budget_override_usd,
        },
    )
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's message, e.g. the missing field name
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::validation_error(body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            warn!(correlation_id = %correlation_id, "Missing JSON content type");
            ApiError::missing_content_type()
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    let api_error = ApiErrorResponse::bad_request(error);
    json_response(api_error.status, api_error.error)
}

fn engine_error_response(err: EngineError, correlation_id: Uuid, context: &str) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "{}", context
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}
