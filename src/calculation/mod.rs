//! Calculation logic for the Bonus Allocation Engine.
//!
//! This module contains the pure engine functions: cohort building with
//! currency fallback, the split performance curve, budget-neutral
//! allocation, multi-team reconciliation, calibration against the policy
//! ranges, and rating distribution analytics.

mod allocation;
mod calibration;
mod cohort;
mod currency_fallback;
mod performance_multiplier;
mod rating_distribution;
mod reconciliation;

pub use allocation::{
    WARNING_NEGATIVE_POOL, WARNING_NO_BONUS_TARGET, WARNING_ZERO_RAW_SHARES, allocate,
};
pub use calibration::{calibrate, calibrate_teams, calibration_health};
pub use cohort::{Cohort, MAX_RATING_PERCENT, build_cohort, group_by_team, to_rated_employee};
pub use currency_fallback::resolve_usd;
pub use performance_multiplier::{
    MultiplierResult, apply_performance_multiplier, performance_multiplier,
};
pub use rating_distribution::{job_rating_averages, rating_histogram, team_rating_averages};
pub use reconciliation::reconcile;
