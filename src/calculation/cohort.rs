//! Building the rated cohort from upstream employee records.
//!
//! This is the boundary where loosely-shaped records become
//! [`RatedEmployee`]s: unrated records are dropped, ratings are range-checked,
//! and monetary fields go through the currency fallback.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeRecord, RatedEmployee, UNKNOWN_JOB_PROFILE};

use super::currency_fallback::resolve_usd;

/// Highest rating accepted, in percent of target.
pub const MAX_RATING_PERCENT: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

/// The rated employees of one calculation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cohort {
    /// Rated employees in input order.
    pub employees: Vec<RatedEmployee>,
    /// Records skipped because they carried no rating.
    pub unrated_count: usize,
}

impl Cohort {
    /// Total number of records seen, rated or not.
    pub fn total_records(&self) -> usize {
        self.employees.len() + self.unrated_count
    }
}

/// Converts one record, returning `None` for an unrated record.
///
/// # Examples
///
/// ```
/// use bonus_engine::calculation::to_rated_employee;
/// use bonus_engine::models::EmployeeRecord;
/// use rust_decimal::Decimal;
///
/// let mut record = EmployeeRecord::new("EMP401");
/// record.rating_percent = Some(Decimal::from(115));
/// record.bonus_target_local = Some(Decimal::from(12600));
/// record.bonus_target_usd = Some(Decimal::from(15949));
///
/// let employee = to_rated_employee(&record).unwrap().unwrap();
/// assert_eq!(employee.bonus_target_usd, Decimal::from(15949));
/// ```
pub fn to_rated_employee(record: &EmployeeRecord) -> EngineResult<Option<RatedEmployee>> {
    let id = record.id.trim();
    if id.is_empty() {
        return Err(EngineError::InvalidEmployee {
            field: "id".to_string(),
            message: "must not be empty".to_string(),
        });
    }

    let Some(rating_percent) = record.rating_percent else {
        return Ok(None);
    };

    if rating_percent < Decimal::ZERO || rating_percent > MAX_RATING_PERCENT {
        return Err(EngineError::InvalidRating {
            employee_id: id.to_string(),
            value: rating_percent,
        });
    }

    Ok(Some(RatedEmployee {
        id: id.to_string(),
        rating_percent,
        bonus_target_usd: resolve_usd(record.bonus_target_local, record.bonus_target_usd),
        base_pay_usd: resolve_usd(record.base_pay_local, record.base_pay_usd),
        team_id: record
            .team
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        job_profile: record
            .job_profile
            .as_deref()
            .map(str::trim)
            .filter(|profile| !profile.is_empty())
            .unwrap_or(UNKNOWN_JOB_PROFILE)
            .to_string(),
    }))
}

/// Builds the rated cohort from a batch of records.
///
/// Fails on the first record with an empty or duplicate id, or with a rating
/// outside [0, 200].
pub fn build_cohort(records: &[EmployeeRecord]) -> EngineResult<Cohort> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut cohort = Cohort::default();

    for record in records {
        if !seen.insert(record.id.trim()) {
            return Err(EngineError::InvalidEmployee {
                field: "id".to_string(),
                message: format!("duplicate employee id '{}'", record.id.trim()),
            });
        }

        match to_rated_employee(record)? {
            Some(employee) => cohort.employees.push(employee),
            None => cohort.unrated_count += 1,
        }
    }

    debug!(
        rated = cohort.employees.len(),
        unrated = cohort.unrated_count,
        "Built rated cohort"
    );

    Ok(cohort)
}

/// Groups employees by team id, ordered by team id.
pub fn group_by_team(employees: &[RatedEmployee]) -> BTreeMap<&str, Vec<&RatedEmployee>> {
    let mut teams: BTreeMap<&str, Vec<&RatedEmployee>> = BTreeMap::new();
    for employee in employees {
        teams
            .entry(employee.team_id.as_str())
            .or_default()
            .push(employee);
    }
    teams
}
