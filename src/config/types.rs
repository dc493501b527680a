//! Configuration types for bonus allocation policy.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the `policy.yaml` configuration file.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AllocationParameters, BucketId};

/// Suggested share of the rated cohort for one calibration band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedRange {
    /// Lower bound, in percent of rated employees.
    pub suggested_min: Decimal,
    /// Upper bound, in percent of rated employees.
    pub suggested_max: Decimal,
}

impl SuggestedRange {
    /// Creates a range from whole-percent bounds.
    pub fn new(suggested_min: i64, suggested_max: i64) -> Self {
        Self {
            suggested_min: Decimal::from(suggested_min),
            suggested_max: Decimal::from(suggested_max),
        }
    }

    /// Returns true if `percent` lies inside the range (bounds inclusive).
    pub fn contains(&self, percent: Decimal) -> bool {
        self.suggested_min <= percent && percent <= self.suggested_max
    }
}

/// Suggested ranges for the four calibration bands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRanges {
    /// Ratings above 120.
    #[serde(rename = "above_120")]
    pub above_120: SuggestedRange,
    /// Ratings from 90 to 120.
    #[serde(rename = "90_to_120")]
    pub from_90_to_120: SuggestedRange,
    /// Ratings from 60 to below 90.
    #[serde(rename = "60_to_90")]
    pub from_60_to_90: SuggestedRange,
    /// Ratings below 60.
    #[serde(rename = "below_60")]
    pub below_60: SuggestedRange,
}

/// Calibration policy: suggested ranges and the warning tolerance.
///
/// # Example
///
/// ```
/// use bonus_engine::config::CalibrationPolicy;
/// use bonus_engine::models::BucketId;
/// use rust_decimal::Decimal;
///
/// let policy = CalibrationPolicy::default();
/// let range = policy.range_for(BucketId::From90To120);
/// assert_eq!(range.suggested_min, Decimal::from(60));
/// assert_eq!(range.suggested_max, Decimal::from(80));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalibrationPolicy {
    /// Largest absolute delta still reported as a warning rather than an alert.
    pub warning_tolerance: Decimal,
    /// Suggested ranges per band.
    pub ranges: BucketRanges,
}

impl CalibrationPolicy {
    /// Returns the suggested range for a bucket.
    pub fn range_for(&self, bucket: BucketId) -> &SuggestedRange {
        match bucket {
            BucketId::Above120 => &self.ranges.above_120,
            BucketId::From90To120 => &self.ranges.from_90_to_120,
            BucketId::From60To90 => &self.ranges.from_60_to_90,
            BucketId::Below60 => &self.ranges.below_60,
        }
    }

    /// Checks that every range is ordered and within 0-100%.
    pub fn validate(&self) -> EngineResult<()> {
        if self.warning_tolerance < Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "calibration.warning_tolerance must not be negative, got {}",
                    self.warning_tolerance
                ),
            });
        }
        for bucket in BucketId::ALL {
            let range = self.range_for(bucket);
            let hundred = Decimal::ONE_HUNDRED;
            if range.suggested_min < Decimal::ZERO
                || range.suggested_max > hundred
                || range.suggested_min > range.suggested_max
            {
                return Err(EngineError::InvalidConfig {
                    message: format!(
                        "calibration range for {} must satisfy 0 <= min <= max <= 100, got {}-{}",
                        bucket, range.suggested_min, range.suggested_max
                    ),
                });
            }
        }
        Ok(())
    }
}

impl Default for CalibrationPolicy {
    fn default() -> Self {
        Self {
            warning_tolerance: Decimal::from(10),
            ranges: BucketRanges {
                above_120: SuggestedRange::new(10, 20),
                from_90_to_120: SuggestedRange::new(60, 80),
                from_60_to_90: SuggestedRange::new(5, 15),
                below_60: SuggestedRange::new(2, 5),
            },
        }
    }
}

/// The complete policy configuration loaded from `policy.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Human-readable policy name.
    pub name: String,
    /// Policy version or effective period.
    pub version: String,
    /// Default curve exponents.
    pub allocation: AllocationParameters,
    /// Calibration policy.
    pub calibration: CalibrationPolicy,
}

impl PolicyConfig {
    /// Validates exponents and calibration ranges.
    pub fn validate(&self) -> EngineResult<()> {
        self.allocation
            .validate()
            .map_err(|e| EngineError::InvalidConfig {
                message: format!("allocation: {}", e),
            })?;
        self.calibration.validate()
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            name: "Default performance bonus policy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            allocation: AllocationParameters::default(),
            calibration: CalibrationPolicy::default(),
        }
    }
}
