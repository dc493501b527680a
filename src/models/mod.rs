//! Core data models for the Bonus Allocation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod allocation;
mod calibration;
mod employee;
mod parameters;
mod reconciliation;

pub use allocation::{
    Allocation, AllocationResult, AllocationSummary, AuditStep, AuditTrace, AuditWarning,
};
pub use calibration::{
    BucketId, CalibrationBucket, CalibrationStatus, JobRatingAverage, RatingBandCount,
    TeamCalibration, TeamRatingAverage,
};
pub use employee::{EmployeeRecord, RatedEmployee, UNKNOWN_JOB_PROFILE};
pub use parameters::{
    AllocationParameters, DEFAULT_DOWNSIDE_EXPONENT, DEFAULT_UPSIDE_EXPONENT, MAX_EXPONENT,
};
pub use reconciliation::{Reconciliation, TeamComparison};
