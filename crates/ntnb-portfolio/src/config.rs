//! Configuration for portfolio pricing.

use serde::{Deserialize, Serialize};

use ntnb_pricing::PricingConfig;

use crate::error::{BatchResult, PortfolioError};

/// Configuration for portfolio pricing.
///
/// Carries the engine settings applied to every position and controls
/// parallelism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    /// Engine settings shared by all positions.
    pub pricing: PricingConfig,

    /// Enable parallel processing (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum position count to trigger parallel processing.
    pub parallel_threshold: usize,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            parallel: true,
            parallel_threshold: 32,
        }
    }
}

impl PortfolioConfig {
    /// Creates a new config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config that always prices sequentially.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the engine settings.
    #[must_use]
    pub fn with_pricing(mut self, pricing: PricingConfig) -> Self {
        self.pricing = pricing;
        self
    }

    /// Sets whether to use parallel processing.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if parallel processing should be used for the given count.
    #[must_use]
    pub fn should_parallelize(&self, count: usize) -> bool {
        cfg!(feature = "parallel") && self.parallel && count >= self.parallel_threshold
    }

    /// Checks the embedded engine settings.
    pub fn validate(&self) -> BatchResult<()> {
        self.pricing
            .validate()
            .map_err(|e| PortfolioError::invalid_config(e.to_string()))
    }
}
