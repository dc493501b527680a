//! Bonus allocation against a fixed budget pool.
//!
//! Each included employee earns a raw share (`bonus target x performance
//! multiplier`). A single normalization factor rescales every raw share so
//! the final bonuses sum to the pool exactly: individual payouts move with
//! performance while the total stays budget-neutral.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Allocation, AllocationParameters, AllocationResult, AllocationSummary, AuditStep, AuditTrace,
    AuditWarning, RatedEmployee,
};

use super::performance_multiplier::apply_performance_multiplier;

/// Warning code for an employee excluded for having no positive bonus target.
pub const WARNING_NO_BONUS_TARGET: &str = "NO_BONUS_TARGET";

/// Warning code for a pool pushed below zero by the budget override.
pub const WARNING_NEGATIVE_POOL: &str = "NEGATIVE_POOL";

/// Warning code for a cohort whose raw shares sum to zero.
pub const WARNING_ZERO_RAW_SHARES: &str = "ZERO_RAW_SHARES";

/// Allocates the bonus pool across a cohort.
///
/// The pool is the sum of included bonus targets plus `budget_override_usd`.
/// Employees with a bonus target of zero or less are skipped and counted in
/// `excluded_no_target_count`. Whenever total raw shares are positive, the
/// final bonuses sum to the pool. Negative pools are not clamped.
///
/// Results keep input order; sorting is left to the caller.
///
/// # Examples
///
/// ```
/// use bonus_engine::calculation::allocate;
/// use bonus_engine::models::{AllocationParameters, RatedEmployee};
/// use rust_decimal::Decimal;
///
/// let team = vec![
///     RatedEmployee::new("a", "", Decimal::from(100), Decimal::from(10000)),
///     RatedEmployee::new("b", "", Decimal::from(100), Decimal::from(10000)),
///     RatedEmployee::new("c", "", Decimal::from(100), Decimal::from(10000)),
/// ];
///
/// let allocation = allocate(&team, &AllocationParameters::default(), Decimal::from(-3000))?;
/// assert_eq!(allocation.summary.total_pool_usd, Decimal::from(27000));
/// assert_eq!(allocation.summary.normalization_factor, Decimal::new(9, 1));
/// assert_eq!(allocation.results[0].final_bonus_usd, Decimal::from(9000));
/// # Ok::<(), bonus_engine::error::EngineError>(())
/// ```
pub fn allocate(
    employees: &[RatedEmployee],
    params: &AllocationParameters,
    budget_override_usd: Decimal,
) -> EngineResult<Allocation> {
    let cohort: Vec<&RatedEmployee> = employees.iter().collect();
    allocate_cohort(&cohort, params, budget_override_usd)
}

/// Allocation over borrowed employees, shared with team-level runs.
pub(crate) fn allocate_cohort(
    employees: &[&RatedEmployee],
    params: &AllocationParameters,
    budget_override_usd: Decimal,
) -> EngineResult<Allocation> {
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    let (included, excluded): (Vec<&RatedEmployee>, Vec<&RatedEmployee>) = employees
        .iter()
        .copied()
        .partition(|e| e.has_bonus_target());

    for employee in &excluded {
        warnings.push(AuditWarning {
            code: WARNING_NO_BONUS_TARGET.to_string(),
            message: format!(
                "Employee '{}' has no positive bonus target and was excluded from allocation",
                employee.id
            ),
            severity: "low".to_string(),
        });
    }

    // Pool
    let base_pool_usd = checked_sum(included.iter().map(|e| e.bonus_target_usd), "bonus pool")?;
    let total_pool_usd = base_pool_usd
        .checked_add(budget_override_usd)
        .ok_or_else(|| overflow("bonus pool with override"))?;
    steps.push(pool_step(
        step_number,
        included.len(),
        excluded.len(),
        base_pool_usd,
        budget_override_usd,
        total_pool_usd,
    ));
    step_number += 1;

    // Raw shares
    let mut shares: Vec<(&RatedEmployee, Decimal, Decimal)> = Vec::with_capacity(included.len());
    for &employee in &included {
        let result = apply_performance_multiplier(employee, params, step_number)?;
        steps.push(result.audit_step);
        step_number += 1;
        shares.push((employee, result.multiplier, result.raw_share));
    }
    let total_raw_shares_usd = checked_sum(shares.iter().map(|(_, _, raw)| *raw), "raw shares")?;

    // Normalization
    let normalization_factor = if total_raw_shares_usd > Decimal::ZERO {
        total_pool_usd
            .checked_div(total_raw_shares_usd)
            .ok_or_else(|| EngineError::CalculationError {
                message: format!(
                    "normalization overflow: pool {} over raw shares {}",
                    total_pool_usd, total_raw_shares_usd
                ),
            })?
    } else {
        Decimal::ZERO
    };
    steps.push(normalization_step(
        step_number,
        total_pool_usd,
        total_raw_shares_usd,
        normalization_factor,
    ));

    if !included.is_empty() && total_raw_shares_usd.is_zero() {
        warnings.push(AuditWarning {
            code: WARNING_ZERO_RAW_SHARES.to_string(),
            message: "All raw shares are zero; no bonus could be allocated".to_string(),
            severity: "medium".to_string(),
        });
    }
    if total_pool_usd < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: WARNING_NEGATIVE_POOL.to_string(),
            message: format!(
                "Budget override of ${} leaves a negative pool of ${}",
                budget_override_usd.normalize(),
                total_pool_usd.normalize()
            ),
            severity: "high".to_string(),
        });
    }

    let results = shares
        .into_iter()
        .map(|(employee, multiplier, raw_share)| {
            let final_bonus_usd = raw_share
                .checked_mul(normalization_factor)
                .ok_or_else(|| overflow("final bonus"))?;
            let bonus_percent_of_target = final_bonus_usd
                .checked_div(employee.bonus_target_usd)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .ok_or_else(|| overflow("bonus percent of target"))?;
            Ok(AllocationResult {
                employee_id: employee.id.clone(),
                team_id: employee.team_id.clone(),
                rating_percent: employee.rating_percent,
                bonus_target_usd: employee.bonus_target_usd,
                base_pay_usd: employee.base_pay_usd,
                performance_multiplier: multiplier,
                raw_share,
                final_bonus_usd,
                bonus_percent_of_target,
            })
        })
        .collect::<EngineResult<Vec<AllocationResult>>>()?;

    let total_allocated_usd =
        checked_sum(results.iter().map(|r| r.final_bonus_usd), "allocated total")?;
    let fully_funded_count = results.iter().filter(|r| r.is_fully_funded()).count();

    debug!(
        included = included.len(),
        excluded = excluded.len(),
        total_pool_usd = %total_pool_usd,
        normalization_factor = %normalization_factor,
        total_allocated_usd = %total_allocated_usd,
        fully_funded = fully_funded_count,
        "Allocated bonus pool"
    );

    Ok(Allocation {
        results,
        summary: AllocationSummary {
            included_count: included.len(),
            base_pool_usd,
            budget_override_usd,
            total_pool_usd,
            total_raw_shares_usd,
            normalization_factor,
            total_allocated_usd,
            excluded_no_target_count: excluded.len(),
        },
        audit_trace: AuditTrace { steps, warnings },
    })
}

/// Sums amounts, failing instead of panicking when the total leaves the
/// `Decimal` range.
fn checked_sum(values: impl IntoIterator<Item = Decimal>, what: &str) -> EngineResult<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
        .ok_or_else(|| overflow(what))
}

fn overflow(what: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("{} overflowed the decimal range", what),
    }
}

fn pool_step(
    step_number: u32,
    included: usize,
    excluded: usize,
    base_pool_usd: Decimal,
    budget_override_usd: Decimal,
    total_pool_usd: Decimal,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "bonus_pool".to_string(),
        rule_name: "Bonus Pool".to_string(),
        input: serde_json::json!({
            "included_count": included,
            "excluded_no_target_count": excluded,
            "budget_override_usd": budget_override_usd.normalize().to_string()
        }),
        output: serde_json::json!({
            "base_pool_usd": base_pool_usd.normalize().to_string(),
            "total_pool_usd": total_pool_usd.normalize().to_string()
        }),
        reasoning: format!(
            "${} in bonus targets + ${} override = ${}",
            base_pool_usd.normalize(),
            budget_override_usd.normalize(),
            total_pool_usd.normalize()
        ),
    }
}

fn normalization_step(
    step_number: u32,
    total_pool_usd: Decimal,
    total_raw_shares_usd: Decimal,
    normalization_factor: Decimal,
) -> AuditStep {
    let reasoning = if total_raw_shares_usd > Decimal::ZERO {
        format!(
            "${} / ${} raw shares = {} per share",
            total_pool_usd.normalize(),
            total_raw_shares_usd.round_dp(2),
            normalization_factor.round_dp(6)
        )
    } else {
        "No raw shares to normalize - value per share is 0".to_string()
    };

    AuditStep {
        step_number,
        rule_id: "normalization".to_string(),
        rule_name: "Pool Normalization".to_string(),
        input: serde_json::json!({
            "total_pool_usd": total_pool_usd.normalize().to_string(),
            "total_raw_shares_usd": total_raw_shares_usd.normalize().to_string()
        }),
        output: serde_json::json!({
            "normalization_factor": normalization_factor.normalize().to_string()
        }),
        reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::prelude::ToPrimitive;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn employee(id: &str, rating: &str, target: &str) -> RatedEmployee {
        RatedEmployee::new(id, "", dec(rating), dec(target))
    }

    fn params() -> AllocationParameters {
        AllocationParameters::default()
    }

    fn assert_close(actual: Decimal, expected: f64, tolerance: f64) {
        let actual = actual.to_f64().unwrap();
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} +/- {}, got {}",
            expected,
            tolerance,
            actual
        );
    }

    /// Even cohort at target: factor 1, everyone paid exactly target.
    #[test]
    fn test_even_cohort_pays_target() {
        let team = vec![
            employee("a", "100", "10000"),
            employee("b", "100", "10000"),
            employee("c", "100", "10000"),
        ];

        let allocation = allocate(&team, &params(), Decimal::ZERO).unwrap();

        assert_eq!(allocation.summary.normalization_factor, Decimal::ONE);
        assert_eq!(allocation.summary.total_pool_usd, dec("30000"));
        for result in &allocation.results {
            assert_eq!(result.final_bonus_usd, dec("10000"));
            assert_eq!(result.bonus_percent_of_target, dec("100"));
        }
    }

    /// Mixed performance: the pool is redistributed, not grown.
    #[test]
    fn test_mixed_performance_redistributes_pool() {
        let team = vec![employee("high", "150", "10000"), employee("low", "50", "10000")];

        let allocation = allocate(&team, &params(), Decimal::ZERO).unwrap();

        let high_m = 1.5f64.powf(1.35);
        let low_m = 0.5f64.powf(1.9);
        let total_raw = 10000.0 * (high_m + low_m);
        let factor = 20000.0 / total_raw;

        let high = allocation.result_for("high").unwrap();
        let low = allocation.result_for("low").unwrap();
        assert_close(high.performance_multiplier, high_m, 1e-9);
        assert_close(low.performance_multiplier, low_m, 1e-9);
        assert_close(allocation.summary.total_raw_shares_usd, total_raw, 1e-6);
        assert_close(allocation.summary.normalization_factor, factor, 1e-9);
        assert_close(high.final_bonus_usd, 10000.0 * high_m * factor, 1e-4);
        assert_close(low.final_bonus_usd, 10000.0 * low_m * factor, 1e-4);
        assert_close(allocation.summary.total_allocated_usd, 20000.0, 1e-6);
    }

    #[test]
    fn test_negative_override_scales_everyone_down() {
        let team = vec![
            employee("a", "100", "10000"),
            employee("b", "100", "10000"),
            employee("c", "100", "10000"),
        ];

        let allocation = allocate(&team, &params(), dec("-3000")).unwrap();

        assert_eq!(allocation.summary.base_pool_usd, dec("30000"));
        assert_eq!(allocation.summary.total_pool_usd, dec("27000"));
        assert_eq!(allocation.summary.normalization_factor, dec("0.9"));
        for result in &allocation.results {
            assert_eq!(result.final_bonus_usd, dec("9000"));
        }
        assert_eq!(allocation.summary.total_allocated_usd, dec("27000"));
    }

    #[test]
    fn test_positive_override_grows_pool() {
        let team = vec![employee("a", "100", "10000"), employee("b", "100", "30000")];

        let allocation = allocate(&team, &params(), dec("4000")).unwrap();

        assert_eq!(allocation.summary.total_pool_usd, dec("44000"));
        assert_eq!(allocation.summary.normalization_factor, dec("1.1"));
        assert_eq!(allocation.result_for("a").unwrap().final_bonus_usd, dec("11000"));
        assert_eq!(allocation.result_for("b").unwrap().final_bonus_usd, dec("33000"));
    }

    #[test]
    fn test_employees_without_target_are_excluded_and_counted() {
        let team = vec![
            employee("a", "120", "10000"),
            employee("zero", "150", "0"),
            employee("neg", "150", "-100"),
        ];

        let allocation = allocate(&team, &params(), Decimal::ZERO).unwrap();

        assert_eq!(allocation.results.len(), 1);
        assert_eq!(allocation.summary.excluded_no_target_count, 2);
        assert_eq!(allocation.summary.included_count, 1);
        assert_eq!(allocation.summary.base_pool_usd, dec("10000"));
        assert!(allocation.result_for("zero").is_none());
        assert_eq!(
            allocation
                .audit_trace
                .warnings
                .iter()
                .filter(|w| w.code == WARNING_NO_BONUS_TARGET)
                .count(),
            2
        );
        // A lone employee gets the whole pool regardless of rating.
        assert_eq!(allocation.results[0].final_bonus_usd, dec("10000"));
    }

    #[test]
    fn test_empty_cohort_is_valid_and_empty() {
        let allocation = allocate(&[], &params(), Decimal::ZERO).unwrap();

        assert!(allocation.results.is_empty());
        assert_eq!(allocation.summary.normalization_factor, Decimal::ZERO);
        assert_eq!(allocation.summary.total_allocated_usd, Decimal::ZERO);
        assert_eq!(allocation.summary.total_pool_usd, Decimal::ZERO);
        assert!(!allocation.audit_trace.has_warning(WARNING_ZERO_RAW_SHARES));
    }

    #[test]
    fn test_all_zero_ratings_give_zero_factor() {
        let team = vec![employee("a", "0", "10000"), employee("b", "0", "5000")];

        let allocation = allocate(&team, &params(), Decimal::ZERO).unwrap();

        assert_eq!(allocation.summary.total_raw_shares_usd, Decimal::ZERO);
        assert_eq!(allocation.summary.normalization_factor, Decimal::ZERO);
        assert_eq!(allocation.summary.total_allocated_usd, Decimal::ZERO);
        assert!(allocation.results.iter().all(|r| r.final_bonus_usd.is_zero()));
        assert!(allocation.audit_trace.has_warning(WARNING_ZERO_RAW_SHARES));
    }

    #[test]
    fn test_negative_pool_is_not_clamped() {
        let team = vec![employee("a", "100", "10000"), employee("b", "100", "10000")];

        let allocation = allocate(&team, &params(), dec("-30000")).unwrap();

        assert_eq!(allocation.summary.total_pool_usd, dec("-10000"));
        assert_eq!(allocation.result_for("a").unwrap().final_bonus_usd, dec("-5000"));
        assert_eq!(allocation.summary.total_allocated_usd, dec("-10000"));
        assert!(allocation.audit_trace.has_warning(WARNING_NEGATIVE_POOL));
    }

    #[test]
    fn test_identical_ratings_fund_same_percent_of_target() {
        let team = vec![
            employee("small", "130", "2500"),
            employee("medium", "130", "11000"),
            employee("large", "130", "44000"),
        ];

        let allocation = allocate(&team, &params(), dec("1234.56")).unwrap();

        let first = allocation.results[0].bonus_percent_of_target;
        for result in &allocation.results {
            assert_close(result.bonus_percent_of_target, first.to_f64().unwrap(), 1e-9);
        }
    }

    #[test]
    fn test_results_keep_input_order_and_echo_inputs() {
        let team = vec![
            employee("low", "60", "5000").with_base_pay(dec("90000")),
            employee("high", "180", "5000"),
        ];

        let allocation = allocate(&team, &params(), Decimal::ZERO).unwrap();

        assert_eq!(allocation.results[0].employee_id, "low");
        assert_eq!(allocation.results[0].base_pay_usd, dec("90000"));
        assert_eq!(allocation.results[0].rating_percent, dec("60"));
        assert_eq!(allocation.results[1].employee_id, "high");
    }

    #[test]
    fn test_audit_trace_records_pool_multipliers_and_normalization() {
        let team = vec![employee("a", "100", "10000"), employee("b", "80", "10000")];

        let allocation = allocate(&team, &params(), Decimal::ZERO).unwrap();
        let steps = &allocation.audit_trace.steps;

        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].rule_id, "bonus_pool");
        assert_eq!(steps[1].rule_id, "performance_multiplier");
        assert_eq!(steps[2].rule_id, "performance_multiplier");
        assert_eq!(steps[3].rule_id, "normalization");
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
        assert_eq!(steps[0].output["base_pool_usd"].as_str().unwrap(), "20000");
    }

    #[test]
    fn test_overflowing_targets_return_calculation_error() {
        let team = vec![
            employee("a", "100", "50000000000000000000000000000"),
            employee("b", "100", "50000000000000000000000000000"),
        ];

        let err = allocate(&team, &params(), Decimal::ZERO).unwrap_err();
        assert!(matches!(err, EngineError::CalculationError { .. }));
    }

    #[test]
    fn test_override_pushing_pool_out_of_range_is_calculation_error() {
        let team = vec![employee("a", "100", "70000000000000000000000000000")];

        let err = allocate(&team, &params(), Decimal::MAX).unwrap_err();
        assert!(matches!(err, EngineError::CalculationError { .. }));
    }

    #[test]
    fn test_overflowing_raw_share_is_calculation_error() {
        let team = vec![employee("a", "200", "60000000000000000000000000000")];

        let err = allocate(&team, &params(), Decimal::ZERO).unwrap_err();
        assert!(matches!(err, EngineError::CalculationError { .. }));
    }

    fn cohort_strategy() -> impl Strategy<Value = Vec<RatedEmployee>> {
        prop::collection::vec((0u32..=2000, 0i64..=100_000), 1..40).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (rating_tenths, target))| {
                    RatedEmployee::new(
                        format!("emp_{}", i),
                        "",
                        Decimal::new(rating_tenths as i64, 1),
                        Decimal::from(target),
                    )
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_pool_is_exactly_exhausted(
            team in cohort_strategy(),
            override_usd in -50_000i64..=50_000,
        ) {
            let allocation = allocate(&team, &params(), Decimal::from(override_usd)).unwrap();
            let summary = &allocation.summary;

            if summary.total_raw_shares_usd > Decimal::ZERO {
                let pool = summary.total_pool_usd.to_f64().unwrap();
                let allocated = summary.total_allocated_usd.to_f64().unwrap();
                prop_assert!((pool - allocated).abs() <= 1e-6 * pool.abs().max(1.0));
            } else {
                prop_assert_eq!(summary.total_allocated_usd, Decimal::ZERO);
            }
        }

        #[test]
        fn prop_each_no_target_employee_counted_once(team in cohort_strategy()) {
            let allocation = allocate(&team, &params(), Decimal::ZERO).unwrap();
            let without_target = team.iter().filter(|e| e.bonus_target_usd.is_zero()).count();

            prop_assert_eq!(allocation.summary.excluded_no_target_count, without_target);
            prop_assert_eq!(allocation.results.len(), team.len() - without_target);
            prop_assert!(allocation
                .results
                .iter()
                .all(|r| r.bonus_target_usd > Decimal::ZERO));
            let raw: Decimal = allocation.results.iter().map(|r| r.raw_share).sum();
            prop_assert_eq!(raw, allocation.summary.total_raw_shares_usd);
        }
    }
}
