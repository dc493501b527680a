//! Rating distribution analytics: a coarse histogram and average ratings per
//! team and per job profile.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{JobRatingAverage, RatedEmployee, RatingBandCount, TeamRatingAverage};

use super::cohort::group_by_team;

/// Histogram bands as `(label, inclusive upper bound)`. The last band takes
/// everything above the previous bound.
const RATING_BANDS: [(&str, i64); 5] = [
    ("0-50%", 50),
    ("51-80%", 80),
    ("81-100%", 100),
    ("101-130%", 130),
    ("131-200%", 200),
];

/// Counts ratings per histogram band, in band order.
pub fn rating_histogram(employees: &[RatedEmployee]) -> Vec<RatingBandCount> {
    let mut counts = [0usize; RATING_BANDS.len()];
    for employee in employees {
        let band = RATING_BANDS
            .iter()
            .position(|(_, upper)| employee.rating_percent <= Decimal::from(*upper))
            .unwrap_or(RATING_BANDS.len() - 1);
        counts[band] += 1;
    }

    RATING_BANDS
        .iter()
        .zip(counts)
        .map(|((label, _), count)| RatingBandCount {
            label: label.to_string(),
            count,
        })
        .collect()
}

/// Mean rating per team to one decimal place, ordered by team id.
pub fn team_rating_averages(employees: &[RatedEmployee]) -> Vec<TeamRatingAverage> {
    group_by_team(employees)
        .into_iter()
        .map(|(team_id, members)| TeamRatingAverage {
            team_id: team_id.to_string(),
            rated_count: members.len(),
            average_rating: average_rating(&members),
        })
        .collect()
}

/// Mean rating per job profile to one decimal place, ordered by profile.
pub fn job_rating_averages(employees: &[RatedEmployee]) -> Vec<JobRatingAverage> {
    let mut profiles: BTreeMap<&str, Vec<&RatedEmployee>> = BTreeMap::new();
    for employee in employees {
        profiles
            .entry(employee.job_profile.as_str())
            .or_default()
            .push(employee);
    }

    profiles
        .into_iter()
        .map(|(job_profile, members)| JobRatingAverage {
            job_profile: job_profile.to_string(),
            rated_count: members.len(),
            average_rating: average_rating(&members),
        })
        .collect()
}

// Ratings are bounded to [0, 200], so the sum cannot overflow.
fn average_rating(members: &[&RatedEmployee]) -> Decimal {
    if members.is_empty() {
        return Decimal::ZERO;
    }
    let total: Decimal = members.iter().map(|e| e.rating_percent).sum();
    (total / Decimal::from(members.len())).round_dp(1)
}
