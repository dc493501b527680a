//! Multi-team reconciliation models.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Allocation;

/// How one team fares under org-wide normalization versus standalone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamComparison {
    /// The team.
    pub team_id: String,
    /// Rated employees in the team, including those without a target.
    pub employee_count: usize,
    /// The team-level total pool (no override applied).
    pub team_pool_usd: Decimal,
    /// Total allocated by the team-level run.
    pub team_allocated_usd: Decimal,
    /// Sum of org-level final bonuses for the team's employees.
    pub org_allocated_usd: Decimal,
    /// `org_allocated_usd - team_allocated_usd`. Positive means the team
    /// receives more under org-wide normalization.
    pub budget_impact_usd: Decimal,
    /// Budget impact as a percentage of the team pool, zero for an empty pool.
    pub impact_percent: Decimal,
    /// The team-level normalization factor.
    pub team_normalization_factor: Decimal,
}

/// Org-level and team-level allocations for one cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// True when the cohort spans more than one team.
    pub multi_team: bool,
    /// The org-wide run, which carries the budget override.
    pub org: Allocation,
    /// Team-level runs keyed by team id.
    pub teams: BTreeMap<String, Allocation>,
    /// Per-team comparisons ordered by team id.
    pub comparisons: Vec<TeamComparison>,
}

impl Reconciliation {
    /// Returns the comparison for a team.
    pub fn comparison_for(&self, team_id: &str) -> Option<&TeamComparison> {
        self.comparisons.iter().find(|c| c.team_id == team_id)
    }
}
