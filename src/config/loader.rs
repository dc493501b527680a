//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading bonus policy
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::AllocationParameters;

use super::types::{CalibrationPolicy, PolicyConfig};

/// Loads and provides access to the bonus policy configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// └── policy.yaml   # Curve exponents and calibration policy
/// ```
///
/// # Example
///
/// ```no_run
/// use bonus_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Policy: {}", loader.policy().name);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: PolicyConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `policy.yaml` is missing, is not valid YAML, or
    /// holds out-of-range exponents or calibration ranges.
    ///
    /// ```no_run
    /// use bonus_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/default")?;
    /// # Ok::<(), bonus_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let policy_path = path.as_ref().join("policy.yaml");
        let config = Self::load_yaml::<PolicyConfig>(&policy_path)?;
        config.validate()?;
        Ok(Self { config })
    }

    /// Wraps an already-built policy after validating it.
    pub fn from_policy(config: PolicyConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying policy configuration.
    pub fn policy(&self) -> &PolicyConfig {
        &self.config
    }

    /// Returns the default curve exponents.
    pub fn allocation_defaults(&self) -> AllocationParameters {
        self.config.allocation
    }

    /// Returns the calibration policy.
    pub fn calibration_policy(&self) -> &CalibrationPolicy {
        &self.config.calibration
    }
}
