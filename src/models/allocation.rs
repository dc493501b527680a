//! Allocation result models for the Bonus Allocation Engine.
//!
//! This module contains the [`Allocation`] type and its associated structures
//! that capture all outputs of an allocation run: per-employee results, the
//! cohort summary, and the audit trace.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The allocation outcome for a single employee.
///
/// # Example
///
/// ```
/// use bonus_engine::models::AllocationResult;
/// use rust_decimal::Decimal;
///
/// let result = AllocationResult {
///     employee_id: "EMP101".to_string(),
///     team_id: "Platform".to_string(),
///     rating_percent: Decimal::from(100),
///     bonus_target_usd: Decimal::from(10000),
///     base_pay_usd: Decimal::ZERO,
///     performance_multiplier: Decimal::ONE,
///     raw_share: Decimal::from(10000),
///     final_bonus_usd: Decimal::from(10000),
///     bonus_percent_of_target: Decimal::from(100),
/// };
/// assert!(result.is_fully_funded());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// The employee this result belongs to.
    pub employee_id: String,
    /// The employee's team.
    pub team_id: String,
    /// Echoed rating.
    pub rating_percent: Decimal,
    /// Echoed bonus target in USD.
    pub bonus_target_usd: Decimal,
    /// Echoed base pay in USD.
    pub base_pay_usd: Decimal,
    /// Split-curve multiplier for the rating.
    pub performance_multiplier: Decimal,
    /// Bonus target scaled by the multiplier, before normalization.
    pub raw_share: Decimal,
    /// Final payout after normalization against the pool.
    pub final_bonus_usd: Decimal,
    /// Final payout as a percentage of target (100 = fully funded).
    pub bonus_percent_of_target: Decimal,
}

impl AllocationResult {
    /// Returns true if the payout is at or above the bonus target.
    pub fn is_fully_funded(&self) -> bool {
        self.final_bonus_usd >= self.bonus_target_usd
    }
}

/// Cohort-level aggregates for one allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSummary {
    /// Number of employees that took part in share computation.
    pub included_count: usize,
    /// Sum of bonus targets over included employees.
    pub base_pool_usd: Decimal,
    /// The signed adjustment applied to the base pool.
    pub budget_override_usd: Decimal,
    /// Base pool plus override.
    pub total_pool_usd: Decimal,
    /// Sum of raw shares.
    pub total_raw_shares_usd: Decimal,
    /// Value per share: total pool divided by total raw shares, or zero.
    pub normalization_factor: Decimal,
    /// Sum of final bonuses.
    pub total_allocated_usd: Decimal,
    /// Employees skipped for having no positive bonus target.
    pub excluded_no_target_count: usize,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag conditions the engine allows but a caller may want to
/// surface, such as a negative pool after a large override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

/// The audit trace for an allocation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// All calculation steps in order.
    pub steps: Vec<AuditStep>,
    /// Warnings raised during the run.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Returns true if a warning with the given code was raised.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

/// The full output of one allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Per-employee results for included employees, in input order.
    pub results: Vec<AllocationResult>,
    /// Cohort aggregates.
    pub summary: AllocationSummary,
    /// Audit trace of the run.
    pub audit_trace: AuditTrace,
}

impl Allocation {
    /// Looks up the result for an employee.
    pub fn result_for(&self, employee_id: &str) -> Option<&AllocationResult> {
        self.results.iter().find(|r| r.employee_id == employee_id)
    }

    /// Sums final bonuses for the given team's employees.
    pub fn allocated_to_team(&self, team_id: &str) -> Decimal {
        self.results
            .iter()
            .filter(|r| r.team_id == team_id)
            .map(|r| r.final_bonus_usd)
            .sum()
    }

    /// Sorts results by final bonus, largest first.
    pub fn sort_by_final_bonus_desc(&mut self) {
        self.results
            .sort_by(|a, b| b.final_bonus_usd.cmp(&a.final_bonus_usd));
    }
}
