//! Outbound distance capability used to price shipping.

use crate::error::DistanceError;
use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordinates { lat, lng }
    }

    /// Great-circle distance in meters (haversine).
    pub fn haversine_distance(&self, other: &Coordinates) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng - self.lng).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
    }
}

/// Geocoding and distance estimation between location keys.
///
/// Every error is an ordinary outcome for callers; the shipping resolver
/// falls back to an estimate instead of failing the order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DistanceService: Send + Sync {
    /// Resolve a postal code or other location key to coordinates.
    async fn geocode(&self, location: &str) -> Result<Coordinates, DistanceError>;

    /// Travel distance in meters between two points.
    async fn estimate_distance(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<f64, DistanceError>;
}

/// A distance service that is never available.
///
/// Stands in for a mapping service without credentials; every shipping
/// quote becomes a fallback estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableDistance;

#[async_trait]
impl DistanceService for UnavailableDistance {
    async fn geocode(&self, _location: &str) -> Result<Coordinates, DistanceError> {
        Err(DistanceError::Unavailable("no distance service configured".to_string()))
    }

    async fn estimate_distance(
        &self,
        _origin: Coordinates,
        _destination: Coordinates,
    ) -> Result<f64, DistanceError> {
        Err(DistanceError::Unavailable("no distance service configured".to_string()))
    }
}

/// Offline distance service backed by a table of known locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationTable {
    locations: FxHashMap<String, Coordinates>,
}

impl LocationTable {
    pub fn new() -> Self {
        LocationTable::default()
    }

    /// Add or replace a location.
    pub fn with_location(mut self, key: impl Into<String>, coordinates: Coordinates) -> Self {
        self.locations.insert(key.into(), coordinates);
        self
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Load a `{ "key": { "lat": .., "lng": .. } }` table from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[async_trait]
impl DistanceService for LocationTable {
    async fn geocode(&self, location: &str) -> Result<Coordinates, DistanceError> {
        self.locations
            .get(location)
            .copied()
            .ok_or_else(|| DistanceError::UnknownLocation(location.to_string()))
    }

    async fn estimate_distance(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<f64, DistanceError> {
        Ok(origin.haversine_distance(&destination))
    }
}
