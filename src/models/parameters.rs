//! Allocation parameters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest exponent accepted for either side of the curve.
///
/// At a rating of 200% this bounds the multiplier at 2^10.
pub const MAX_EXPONENT: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Default exponent applied to ratings at or above 100%.
pub const DEFAULT_UPSIDE_EXPONENT: Decimal = Decimal::from_parts(135, 0, 0, false, 2);

/// Default exponent applied to ratings below 100%.
pub const DEFAULT_DOWNSIDE_EXPONENT: Decimal = Decimal::from_parts(19, 0, 0, false, 1);

/// Exponents for the split performance curve.
///
/// # Example
///
/// ```
/// use bonus_engine::models::AllocationParameters;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let params = AllocationParameters::new(
///     Decimal::from_str("1.35").unwrap(),
///     Decimal::from_str("1.9").unwrap(),
/// )?;
/// assert_eq!(params, AllocationParameters::default());
/// # Ok::<(), bonus_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationParameters {
    /// Exponent applied when the rating is at or above 100%.
    pub upside_exponent: Decimal,
    /// Exponent applied when the rating is below 100%.
    pub downside_exponent: Decimal,
}

impl AllocationParameters {
    /// Creates validated parameters. Both exponents must lie in (0, 10].
    pub fn new(upside_exponent: Decimal, downside_exponent: Decimal) -> EngineResult<Self> {
        validate_exponent("upside_exponent", upside_exponent)?;
        validate_exponent("downside_exponent", downside_exponent)?;
        Ok(Self {
            upside_exponent,
            downside_exponent,
        })
    }

    /// Re-checks parameters built without [`AllocationParameters::new`],
    /// e.g. after deserialization.
    pub fn validate(&self) -> EngineResult<()> {
        validate_exponent("upside_exponent", self.upside_exponent)?;
        validate_exponent("downside_exponent", self.downside_exponent)
    }
}

impl Default for AllocationParameters {
    fn default() -> Self {
        Self {
            upside_exponent: DEFAULT_UPSIDE_EXPONENT,
            downside_exponent: DEFAULT_DOWNSIDE_EXPONENT,
        }
    }
}

fn validate_exponent(name: &str, value: Decimal) -> EngineResult<()> {
    if value <= Decimal::ZERO {
        return Err(EngineError::InvalidParameter {
            name: name.to_string(),
            message: format!("must be greater than 0, got {}", value),
        });
    }
    if value > MAX_EXPONENT {
        return Err(EngineError::InvalidParameter {
            name: name.to_string(),
            message: format!("must not exceed {}, got {}", MAX_EXPONENT, value),
        });
    }
    Ok(())
}
