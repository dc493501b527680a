//! Performance multiplier calculation.
//!
//! The multiplier is a split power curve: `(rating / 100) ^ downside` below
//! target and `(rating / 100) ^ upside` at or above it. Both halves pass
//! through `(100, 1.0)`, so the curve is continuous for any exponent pair.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{EngineError, EngineResult};
use crate::models::{AllocationParameters, AuditStep, RatedEmployee};

/// Returns the performance multiplier for a rating.
///
/// Callers are expected to pass ratings already validated to [0, 200]. A
/// result that cannot be represented (NaN or overflow) is reported as a
/// [`EngineError::CalculationError`].
///
/// # Examples
///
/// ```
/// use bonus_engine::calculation::performance_multiplier;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let upside = Decimal::from_str("1.35").unwrap();
/// let downside = Decimal::from_str("1.9").unwrap();
///
/// let at_target = performance_multiplier(Decimal::from(100), upside, downside).unwrap();
/// assert_eq!(at_target, Decimal::ONE);
/// ```
pub fn performance_multiplier(
    rating_percent: Decimal,
    upside_exponent: Decimal,
    downside_exponent: Decimal,
) -> EngineResult<Decimal> {
    let exponent = if rating_percent < Decimal::ONE_HUNDRED {
        downside_exponent
    } else {
        upside_exponent
    };

    let ratio = to_f64(rating_percent / Decimal::ONE_HUNDRED)?;
    let exponent = to_f64(exponent)?;
    let multiplier = ratio.powf(exponent);

    Decimal::try_from(multiplier).map_err(|_| EngineError::CalculationError {
        message: format!(
            "performance multiplier for rating {} is not representable: {}",
            rating_percent, multiplier
        ),
    })
}

fn to_f64(value: Decimal) -> EngineResult<f64> {
    value.to_f64().ok_or_else(|| EngineError::CalculationError {
        message: format!("cannot convert {} to a floating point value", value),
    })
}

/// The multiplier and raw share for one employee, with its audit step.
#[derive(Debug, Clone)]
pub struct MultiplierResult {
    /// The performance multiplier.
    pub multiplier: Decimal,
    /// `bonus_target_usd * multiplier`.
    pub raw_share: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Applies the performance curve to an employee's bonus target.
pub fn apply_performance_multiplier(
    employee: &RatedEmployee,
    params: &AllocationParameters,
    step_number: u32,
) -> EngineResult<MultiplierResult> {
    let multiplier = performance_multiplier(
        employee.rating_percent,
        params.upside_exponent,
        params.downside_exponent,
    )?;
    let raw_share = employee
        .bonus_target_usd
        .checked_mul(multiplier)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!(
                "raw share overflow for employee '{}': {} x {}",
                employee.id, employee.bonus_target_usd, multiplier
            ),
        })?;

    let (side, exponent) = if employee.rating_percent < Decimal::ONE_HUNDRED {
        ("downside", params.downside_exponent)
    } else {
        ("upside", params.upside_exponent)
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "performance_multiplier".to_string(),
        rule_name: "Performance Multiplier".to_string(),
        input: serde_json::json!({
            "employee_id": employee.id,
            "rating_percent": employee.rating_percent.normalize().to_string(),
            "bonus_target_usd": employee.bonus_target_usd.normalize().to_string(),
            "curve": side,
            "exponent": exponent.normalize().to_string()
        }),
        output: serde_json::json!({
            "performance_multiplier": multiplier.normalize().to_string(),
            "raw_share": raw_share.normalize().to_string()
        }),
        reasoning: format!(
            "({} / 100) ^ {} = {}; ${} x {} = ${}",
            employee.rating_percent.normalize(),
            exponent.normalize(),
            multiplier.round_dp(4),
            employee.bonus_target_usd.normalize(),
            multiplier.round_dp(4),
            raw_share.round_dp(2)
        ),
    };

    Ok(MultiplierResult {
        multiplier,
        raw_share,
        audit_step,
    })
}
