//! Configuration parameters for the order-splitting optimizer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hard item ceiling. The per-subset offer table holds `2^n` slots, so this
/// bounds both its memory and the size of the partition search.
pub const MAX_SUPPORTED_ITEMS: usize = 20;

/// Configuration settings for the optimizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Largest number of distinct items accepted in a single order
    pub max_order_items: usize,
    /// Shipping price charged per meter between vendor and destination
    pub shipping_rate_per_meter: f64,
    /// Upper bound for each call to the distance service
    pub distance_timeout: Duration,
    /// Lower bound of the deterministic fallback shipping estimate
    pub fallback_min_cost: f64,
    /// Upper bound of the deterministic fallback shipping estimate
    pub fallback_max_cost: f64,
    /// Skip multi-item subsets no single vendor can supply during the search
    pub prune_unsourceable: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_order_items: 10,
            shipping_rate_per_meter: 0.0005,
            distance_timeout: Duration::from_millis(1000),
            fallback_min_cost: 5.0,
            fallback_max_cost: 25.0,
            prune_unsourceable: true,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the maximum number of distinct items per order.
    ///
    /// Values above [`MAX_SUPPORTED_ITEMS`] are clamped.
    pub fn with_max_order_items(mut self, max: usize) -> Self {
        self.max_order_items = max.min(MAX_SUPPORTED_ITEMS);
        self
    }

    /// Set the shipping rate per meter.
    pub fn with_shipping_rate_per_meter(mut self, rate: f64) -> Self {
        self.shipping_rate_per_meter = rate;
        self
    }

    /// Set the timeout applied to each external distance lookup.
    pub fn with_distance_timeout(mut self, timeout: Duration) -> Self {
        self.distance_timeout = timeout;
        self
    }

    /// Set the range used by the fallback shipping estimate.
    pub fn with_fallback_range(mut self, min: f64, max: f64) -> Self {
        self.fallback_min_cost = min.min(max);
        self.fallback_max_cost = max.max(min);
        self
    }

    /// Enable or disable pruning of unsourceable multi-item subsets.
    pub fn with_prune_unsourceable(mut self, prune: bool) -> Self {
        self.prune_unsourceable = prune;
        self
    }

    /// The effective item ceiling.
    pub fn item_limit(&self) -> usize {
        self.max_order_items.min(MAX_SUPPORTED_ITEMS)
    }
}
