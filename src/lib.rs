//! Bonus Allocation Engine
//!
//! This crate distributes a fixed performance bonus pool across a rated
//! cohort, reconciles org-wide against team-level allocation, and checks the
//! rating distribution against calibration targets.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
