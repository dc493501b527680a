//! Calibration and rating-distribution models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One of the four fixed calibration bands, in display order.
///
/// # Example
///
/// ```
/// use bonus_engine::models::BucketId;
/// use rust_decimal::Decimal;
///
/// assert_eq!(BucketId::for_rating(Decimal::from(121)), BucketId::Above120);
/// assert_eq!(BucketId::for_rating(Decimal::from(120)), BucketId::From90To120);
/// assert_eq!(BucketId::From90To120.as_str(), "90_to_120");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BucketId {
    /// Rating strictly above 120.
    #[serde(rename = "above_120")]
    Above120,
    /// Rating from 90 to 120 inclusive.
    #[serde(rename = "90_to_120")]
    From90To120,
    /// Rating from 60 (inclusive) to 90 (exclusive).
    #[serde(rename = "60_to_90")]
    From60To90,
    /// Rating below 60.
    #[serde(rename = "below_60")]
    Below60,
}

impl BucketId {
    /// All buckets in display order.
    pub const ALL: [BucketId; 4] = [
        BucketId::Above120,
        BucketId::From90To120,
        BucketId::From60To90,
        BucketId::Below60,
    ];

    /// Returns the bucket a rating falls into.
    pub fn for_rating(rating_percent: Decimal) -> Self {
        if rating_percent > Decimal::from(120) {
            BucketId::Above120
        } else if rating_percent >= Decimal::from(90) {
            BucketId::From90To120
        } else if rating_percent >= Decimal::from(60) {
            BucketId::From60To90
        } else {
            BucketId::Below60
        }
    }

    /// Returns the wire name of the bucket.
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketId::Above120 => "above_120",
            BucketId::From90To120 => "90_to_120",
            BucketId::From60To90 => "60_to_90",
            BucketId::Below60 => "below_60",
        }
    }

    /// Position of the bucket in [`BucketId::ALL`].
    pub fn index(&self) -> usize {
        match self {
            BucketId::Above120 => 0,
            BucketId::From90To120 => 1,
            BucketId::From60To90 => 2,
            BucketId::Below60 => 3,
        }
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Traffic-light status for a bucket or a team rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationStatus {
    /// Inside the suggested range (or no off-range buckets).
    Good,
    /// Slightly outside the range.
    Warning,
    /// Significantly outside the range.
    Alert,
}

/// Observed share of a rated cohort in one calibration band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationBucket {
    /// The band.
    pub bucket_id: BucketId,
    /// Employees rated into this band.
    pub count: usize,
    /// `count / total_rated * 100`, rounded to one decimal place.
    pub observed_percent: Decimal,
    /// Lower bound of the suggested share.
    pub suggested_min_percent: Decimal,
    /// Upper bound of the suggested share.
    pub suggested_max_percent: Decimal,
    /// True when the observed share lies inside the suggested range.
    pub within_range: bool,
    /// Signed distance to the nearest range boundary, zero when inside.
    pub delta: Decimal,
    /// Traffic-light status.
    pub status: CalibrationStatus,
}

/// Per-team calibration rollup used in multi-team mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCalibration {
    /// The team.
    pub team_id: String,
    /// Rated employees in the team.
    pub rated_count: usize,
    /// The team's four buckets.
    pub buckets: Vec<CalibrationBucket>,
    /// Buckets whose observed share is outside the suggested range.
    pub off_range_count: usize,
    /// Good with no off-range buckets, warning with 1-2, alert with 3+.
    pub calibration_health: CalibrationStatus,
    /// Mean rating.
    pub mean_rating: Decimal,
    /// Population standard deviation of ratings.
    pub rating_std_dev: Decimal,
}

/// One band of the rating histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingBandCount {
    /// Band label, e.g. "81-100%".
    pub label: String,
    /// Employees rated into the band.
    pub count: usize,
}

/// Average rating for a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRatingAverage {
    /// The team.
    pub team_id: String,
    /// Rated employees in the team.
    pub rated_count: usize,
    /// Mean rating rounded to one decimal place.
    pub average_rating: Decimal,
}

/// Average rating for a job profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRatingAverage {
    /// The job profile.
    pub job_profile: String,
    /// Rated employees holding the profile.
    pub rated_count: usize,
    /// Mean rating rounded to one decimal place.
    pub average_rating: Decimal,
}
