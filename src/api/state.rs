//! Application state for the Bonus Allocation Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// Holds the loaded bonus policy and the budget override setting. The
/// override is the only mutable shared value; handlers read it once per
/// request and pass it to the engine explicitly.
#[derive(Clone)]
pub struct AppState {
    /// The loaded bonus policy.
    config: Arc<ConfigLoader>,
    /// Signed adjustment to the bonus pool in USD.
    budget_override: Arc<RwLock<Decimal>>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader
    /// and a zero budget override.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
            budget_override: Arc::new(RwLock::new(Decimal::ZERO)),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the current budget override.
    pub async fn budget_override(&self) -> Decimal {
        *self.budget_override.read().await
    }

    /// Replaces the budget override.
    pub async fn set_budget_override(&self, value: Decimal) {
        *self.budget_override.write().await = value;
    }
}
