//! Calibration distribution analysis.
//!
//! Compares the observed share of a rated cohort in each rating band with the
//! suggested range from the calibration policy.

use rust_decimal::{Decimal, MathematicalOps};
use tracing::debug;

use crate::config::CalibrationPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{BucketId, CalibrationBucket, CalibrationStatus, RatedEmployee, TeamCalibration};

use super::cohort::group_by_team;

/// Buckets a rated cohort into the four calibration bands.
///
/// Always returns the four buckets in display order. With no rated employees
/// every observed percentage is zero.
///
/// # Examples
///
/// ```
/// use bonus_engine::calculation::calibrate;
/// use bonus_engine::config::CalibrationPolicy;
/// use bonus_engine::models::{BucketId, CalibrationStatus, RatedEmployee};
/// use rust_decimal::Decimal;
///
/// let team: Vec<RatedEmployee> = [130, 100, 100, 100, 100, 100, 100, 100, 85, 50]
///     .iter()
///     .enumerate()
///     .map(|(i, r)| RatedEmployee::new(format!("e{}", i), "", Decimal::from(*r), Decimal::ONE))
///     .collect();
///
/// let buckets = calibrate(&team, &CalibrationPolicy::default());
/// assert_eq!(buckets[0].bucket_id, BucketId::Above120);
/// assert_eq!(buckets[1].observed_percent, Decimal::from(70));
/// assert_eq!(buckets[1].status, CalibrationStatus::Good);
/// ```
pub fn calibrate(employees: &[RatedEmployee], policy: &CalibrationPolicy) -> Vec<CalibrationBucket> {
    let cohort: Vec<&RatedEmployee> = employees.iter().collect();
    calibrate_cohort(&cohort, policy)
}

fn calibrate_cohort(
    employees: &[&RatedEmployee],
    policy: &CalibrationPolicy,
) -> Vec<CalibrationBucket> {
    let mut counts = [0usize; 4];
    for employee in employees {
        counts[BucketId::for_rating(employee.rating_percent).index()] += 1;
    }

    let total = employees.len();
    BucketId::ALL
        .iter()
        .map(|bucket_id| bucket(*bucket_id, counts[bucket_id.index()], total, policy))
        .collect()
}

fn bucket(
    bucket_id: BucketId,
    count: usize,
    total: usize,
    policy: &CalibrationPolicy,
) -> CalibrationBucket {
    let observed_percent = if total == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(count) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp(1)
    };

    let range = policy.range_for(bucket_id);
    let delta = if observed_percent < range.suggested_min {
        observed_percent - range.suggested_min
    } else if observed_percent > range.suggested_max {
        observed_percent - range.suggested_max
    } else {
        Decimal::ZERO
    };

    let within_range = range.contains(observed_percent);
    let status = if within_range {
        CalibrationStatus::Good
    } else if delta.abs() <= policy.warning_tolerance {
        CalibrationStatus::Warning
    } else {
        CalibrationStatus::Alert
    };

    CalibrationBucket {
        bucket_id,
        count,
        observed_percent,
        suggested_min_percent: range.suggested_min,
        suggested_max_percent: range.suggested_max,
        within_range,
        delta,
        status,
    }
}

/// Health of a set of buckets from the number outside their range.
pub fn calibration_health(off_range_count: usize) -> CalibrationStatus {
    match off_range_count {
        0 => CalibrationStatus::Good,
        1 | 2 => CalibrationStatus::Warning,
        _ => CalibrationStatus::Alert,
    }
}

/// Calibrates each team separately, ordered by team id.
///
/// Mean rating and population standard deviation are rounded to two decimal
/// places.
pub fn calibrate_teams(
    employees: &[RatedEmployee],
    policy: &CalibrationPolicy,
) -> EngineResult<Vec<TeamCalibration>> {
    let mut teams = Vec::new();

    for (team_id, members) in group_by_team(employees) {
        let buckets = calibrate_cohort(&members, policy);
        let off_range_count = buckets.iter().filter(|b| !b.within_range).count();
        let (mean_rating, rating_std_dev) = rating_stats(&members)?;

        teams.push(TeamCalibration {
            team_id: team_id.to_string(),
            rated_count: members.len(),
            buckets,
            off_range_count,
            calibration_health: calibration_health(off_range_count),
            mean_rating,
            rating_std_dev,
        });
    }

    debug!(team_count = teams.len(), "Calibrated teams");

    Ok(teams)
}

/// Mean and population standard deviation of ratings, both to two places.
fn rating_stats(employees: &[&RatedEmployee]) -> EngineResult<(Decimal, Decimal)> {
    if employees.is_empty() {
        return Ok((Decimal::ZERO, Decimal::ZERO));
    }

    let n = Decimal::from(employees.len());
    let mean = employees.iter().map(|e| e.rating_percent).sum::<Decimal>() / n;
    let variance = employees
        .iter()
        .map(|e| {
            let d = e.rating_percent - mean;
            d * d
        })
        .sum::<Decimal>()
        / n;

    let std_dev = variance.sqrt().ok_or_else(|| EngineError::CalculationError {
        message: format!("cannot take square root of rating variance {}", variance),
    })?;

    Ok((mean.round_dp(2), std_dev.round_dp(2)))
}
