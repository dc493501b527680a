//! Configuration loading and management for the Bonus Allocation Engine.
//!
//! This module loads the bonus policy from YAML: the default exponents of
//! the performance curve and the calibration policy constants.
//!
//! # Example
//!
//! ```no_run
//! use bonus_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Loaded policy: {}", config.policy().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{BucketRanges, CalibrationPolicy, PolicyConfig, SuggestedRange};
