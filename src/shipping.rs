//! Shipping cost resolution with per-vendor memoization.
//!
//! A route moves through three states for a given vendor: absent from the
//! vendor's cache, in flight while the distance service is consulted, and
//! finally cached as either a measured or a fallback quote. Cached quotes
//! are never invalidated.

use crate::config::Config;
use crate::distance::DistanceService;
use crate::error::DistanceError;
use crate::utils::round_cents;
use crate::vendor::Vendor;
use futures::future::join_all;
use log::{debug, warn};
use rustc_hash::FxHasher;
use serde::Serialize;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

/// Unordered pair of location keys. `(a, b)` and `(b, a)` are the same route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    low: String,
    high: String,
}

impl RouteKey {
    pub fn new(from: &str, to: &str) -> Self {
        let (low, high) = if from <= to { (from, to) } else { (to, from) };
        RouteKey {
            low: low.to_string(),
            high: high.to_string(),
        }
    }

    pub fn endpoints(&self) -> (&str, &str) {
        (&self.low, &self.high)
    }
}

/// Where a shipping quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    /// Priced from a distance reported by the distance service
    Measured,
    /// Deterministic estimate used when no distance was available
    Fallback,
}

/// A resolved shipping price for one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingQuote {
    pub cost: f64,
    /// Distance in meters, known only for measured quotes
    pub distance_meters: Option<f64>,
    pub source: QuoteSource,
}

impl ShippingQuote {
    pub fn is_fallback(&self) -> bool {
        self.source == QuoteSource::Fallback
    }
}

/// Resolves shipping costs between vendors and destinations.
pub struct ShippingResolver {
    distance: Arc<dyn DistanceService>,
    rate_per_meter: f64,
    timeout: Duration,
    fallback_min_cost: f64,
    fallback_max_cost: f64,
}

impl ShippingResolver {
    /// Create a resolver using the pricing parameters of `config`.
    pub fn new(config: &Config, distance: Arc<dyn DistanceService>) -> Self {
        ShippingResolver {
            distance,
            rate_per_meter: config.shipping_rate_per_meter,
            timeout: config.distance_timeout,
            fallback_min_cost: config.fallback_min_cost,
            fallback_max_cost: config.fallback_max_cost,
        }
    }

    /// Shipping quote from the vendor's own location to `destination`.
    pub async fn resolve(&self, vendor: &Vendor, destination: &str) -> ShippingQuote {
        self.resolve_between(vendor, &vendor.location, destination)
            .await
    }

    /// Shipping quote for `vendor` between two arbitrary locations.
    ///
    /// The lock on the vendor's cache is never held across the lookup, so
    /// concurrent lookups for the same route may both reach the distance
    /// service; the first one stored wins.
    pub async fn resolve_between(&self, vendor: &Vendor, from: &str, to: &str) -> ShippingQuote {
        let route = RouteKey::new(from, to);
        if let Some(quote) = vendor.cached_shipping(&route) {
            return quote;
        }

        let quote = match self.measure(from, to).await {
            Ok(meters) => ShippingQuote {
                cost: round_cents(meters * self.rate_per_meter),
                distance_meters: Some(meters),
                source: QuoteSource::Measured,
            },
            Err(err) => {
                warn!(
                    "shipping for {} from {:?} to {:?} falls back to an estimate: {}",
                    vendor.name, from, to, err
                );
                ShippingQuote {
                    cost: self.fallback_cost(&route),
                    distance_meters: None,
                    source: QuoteSource::Fallback,
                }
            }
        };

        debug!(
            "shipping for {} {:?} -> {:?}: {:.2} ({:?})",
            vendor.name, from, to, quote.cost, quote.source
        );
        vendor.cache_shipping(route, quote)
    }

    /// Resolve shipping to `destination` for several vendors at once.
    ///
    /// Each vendor guards its own cache, so the lookups run concurrently.
    /// Quotes are returned in the order of `vendors`.
    pub async fn quote_vendors(&self, vendors: &[&Vendor], destination: &str) -> Vec<ShippingQuote> {
        join_all(
            vendors
                .iter()
                .map(|vendor| self.resolve(vendor, destination)),
        )
        .await
    }

    /// Deterministic pseudo-cost for a route, within the fallback range.
    pub fn fallback_cost(&self, route: &RouteKey) -> f64 {
        let mut hasher = FxHasher::default();
        route.hash(&mut hasher);
        let hash = hasher.finish();

        let span_cents = ((self.fallback_max_cost - self.fallback_min_cost) * 100.0)
            .round()
            .max(0.0) as u64;
        let offset_cents = hash % (span_cents + 1);

        round_cents(self.fallback_min_cost + offset_cents as f64 / 100.0)
    }

    /// Run one distance service call under the configured timeout.
    async fn bounded<T, F>(&self, call: F) -> Result<T, DistanceError>
    where
        F: Future<Output = Result<T, DistanceError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or(Err(DistanceError::Timeout(self.timeout)))
    }

    async fn measure(&self, from: &str, to: &str) -> Result<f64, DistanceError> {
        let (origin, destination) = futures::try_join!(
            self.bounded(self.distance.geocode(from)),
            self.bounded(self.distance.geocode(to))
        )?;
        let meters = self
            .bounded(self.distance.estimate_distance(origin, destination))
            .await?;

        if !meters.is_finite() || meters < 0.0 {
            return Err(DistanceError::InvalidDistance(meters));
        }
        Ok(meters)
    }
}
