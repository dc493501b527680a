//! Multi-team reconciliation.
//!
//! Runs the allocation once over the whole org and once per team, then
//! reports how much each team gains or loses from org-wide normalization.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Allocation, AllocationParameters, RatedEmployee, Reconciliation, TeamComparison};

use super::allocation::{allocate, allocate_cohort};
use super::cohort::group_by_team;

/// Reconciles org-level and team-level allocations.
///
/// Only the org-level run receives `budget_override_usd`. With a single team
/// the org allocation stands in for the team allocation and the comparison
/// shows zero impact.
pub fn reconcile(
    employees: &[RatedEmployee],
    params: &AllocationParameters,
    budget_override_usd: Decimal,
) -> EngineResult<Reconciliation> {
    let org = allocate(employees, params, budget_override_usd)?;
    let by_team = group_by_team(employees);
    let multi_team = by_team.len() > 1;

    let mut teams: BTreeMap<String, Allocation> = BTreeMap::new();
    let mut comparisons = Vec::with_capacity(by_team.len());

    for (team_id, members) in &by_team {
        let team_allocation = if multi_team {
            allocate_cohort(members, params, Decimal::ZERO)?
        } else {
            org.clone()
        };

        comparisons.push(compare(team_id, members.len(), &org, &team_allocation)?);
        teams.insert((*team_id).to_string(), team_allocation);
    }

    debug!(
        multi_team,
        team_count = teams.len(),
        "Reconciled org and team allocations"
    );

    Ok(Reconciliation {
        multi_team,
        org,
        teams,
        comparisons,
    })
}

fn compare(
    team_id: &str,
    employee_count: usize,
    org: &Allocation,
    team: &Allocation,
) -> EngineResult<TeamComparison> {
    let team_pool_usd = team.summary.total_pool_usd;
    let team_allocated_usd = team.summary.total_allocated_usd;
    let org_allocated_usd = org.allocated_to_team(team_id);
    let budget_impact_usd = org_allocated_usd
        .checked_sub(team_allocated_usd)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("budget impact for team '{}' overflowed", team_id),
        })?;

    // Zero team pool reports zero impact.
    let impact_percent = budget_impact_usd
        .checked_div(team_pool_usd)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO);

    Ok(TeamComparison {
        team_id: team_id.to_string(),
        employee_count,
        team_pool_usd,
        team_allocated_usd,
        org_allocated_usd,
        budget_impact_usd,
        impact_percent,
        team_normalization_factor: team.summary.normalization_factor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn employee(id: &str, team: &str, rating: &str, target: &str) -> RatedEmployee {
        RatedEmployee::new(id, team, dec(rating), dec(target))
    }

    fn params() -> AllocationParameters {
        AllocationParameters::default()
    }

    fn two_teams() -> Vec<RatedEmployee> {
        vec![
            employee("p1", "Platform", "150", "10000"),
            employee("p2", "Platform", "140", "10000"),
            employee("f1", "Frontend", "70", "10000"),
            employee("f2", "Frontend", "100", "10000"),
        ]
    }

    #[test]
    fn test_single_team_is_pass_through() {
        let team = vec![
            employee("a", "Platform", "150", "10000"),
            employee("b", "Platform", "50", "10000"),
        ];

        let reconciliation = reconcile(&team, &params(), dec("500")).unwrap();

        assert!(!reconciliation.multi_team);
        assert_eq!(reconciliation.teams.len(), 1);
        assert_eq!(reconciliation.teams["Platform"], reconciliation.org);

        let comparison = reconciliation.comparison_for("Platform").unwrap();
        assert_eq!(comparison.budget_impact_usd, Decimal::ZERO);
        assert_eq!(comparison.impact_percent, Decimal::ZERO);
        assert_eq!(comparison.employee_count, 2);
    }

    #[test]
    fn test_empty_cohort_has_no_teams() {
        let reconciliation = reconcile(&[], &params(), Decimal::ZERO).unwrap();

        assert!(!reconciliation.multi_team);
        assert!(reconciliation.teams.is_empty());
        assert!(reconciliation.comparisons.is_empty());
        assert!(reconciliation.org.results.is_empty());
    }

    #[test]
    fn test_strong_team_gains_under_org_normalization() {
        let reconciliation = reconcile(&two_teams(), &params(), Decimal::ZERO).unwrap();

        assert!(reconciliation.multi_team);
        let platform = reconciliation.comparison_for("Platform").unwrap();
        let frontend = reconciliation.comparison_for("Frontend").unwrap();

        // Standalone, each team just spends its own pool.
        assert_eq!(platform.team_pool_usd, dec("20000"));
        assert!((platform.team_allocated_usd - dec("20000")).abs() < dec("0.000001"));

        assert!(platform.budget_impact_usd > Decimal::ZERO);
        assert!(frontend.budget_impact_usd < Decimal::ZERO);

        // Impacts net out when there is no override.
        let net = platform.budget_impact_usd + frontend.budget_impact_usd;
        assert!(net.abs() < dec("0.000001"), "net impact {}", net);
    }

    #[test]
    fn test_override_only_applies_to_org_run() {
        let reconciliation = reconcile(&two_teams(), &params(), dec("-4000")).unwrap();

        assert_eq!(reconciliation.org.summary.total_pool_usd, dec("36000"));
        for allocation in reconciliation.teams.values() {
            assert_eq!(allocation.summary.budget_override_usd, Decimal::ZERO);
            assert_eq!(allocation.summary.total_pool_usd, dec("20000"));
        }
    }

    #[test]
    fn test_impact_percent_is_relative_to_team_pool() {
        let reconciliation = reconcile(&two_teams(), &params(), Decimal::ZERO).unwrap();
        let platform = reconciliation.comparison_for("Platform").unwrap();

        let expected = platform.budget_impact_usd / platform.team_pool_usd * Decimal::ONE_HUNDRED;
        assert_eq!(platform.impact_percent, expected);
    }

    #[test]
    fn test_team_without_targets_has_zero_impact_percent() {
        let team = vec![
            employee("a", "Platform", "120", "10000"),
            employee("b", "Interns", "120", "0"),
        ];

        let reconciliation = reconcile(&team, &params(), Decimal::ZERO).unwrap();
        let interns = reconciliation.comparison_for("Interns").unwrap();

        assert_eq!(interns.team_pool_usd, Decimal::ZERO);
        assert_eq!(interns.impact_percent, Decimal::ZERO);
        assert_eq!(interns.employee_count, 1);
    }

    #[test]
    fn test_comparisons_ordered_by_team_id() {
        let reconciliation = reconcile(&two_teams(), &params(), Decimal::ZERO).unwrap();
        let ids: Vec<&str> = reconciliation
            .comparisons
            .iter()
            .map(|c| c.team_id.as_str())
            .collect();
        assert_eq!(ids, vec!["Frontend", "Platform"]);
    }

    proptest! {
        #[test]
        fn prop_single_team_reconciliation_matches_org(
            rows in prop::collection::vec((0u32..=200, 1i64..=50_000), 1..25),
            override_usd in -10_000i64..=10_000,
        ) {
            let team: Vec<RatedEmployee> = rows
                .into_iter()
                .enumerate()
                .map(|(i, (rating, target))| {
                    RatedEmployee::new(
                        format!("emp_{}", i),
                        "Solo",
                        Decimal::from(rating),
                        Decimal::from(target),
                    )
                })
                .collect();

            let reconciliation = reconcile(&team, &params(), Decimal::from(override_usd)).unwrap();

            prop_assert!(!reconciliation.multi_team);
            prop_assert_eq!(&reconciliation.teams["Solo"], &reconciliation.org);
            let comparison = reconciliation.comparison_for("Solo").unwrap();
            prop_assert_eq!(comparison.budget_impact_usd, Decimal::ZERO);
        }
    }
}
