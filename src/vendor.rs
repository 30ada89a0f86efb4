//! Vendors, their inventory index and their shipping cache.

use crate::shipping::{RouteKey, ShippingQuote};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// One drug a vendor sells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub drug: String,
    #[serde(alias = "cost")]
    pub unit_price: f64,
}

impl InventoryItem {
    pub fn new(drug: impl Into<String>, unit_price: f64) -> Self {
        InventoryItem {
            drug: drug.into(),
            unit_price,
        }
    }
}

/// Wire shape of a vendor snapshot.
#[derive(Debug, Deserialize)]
struct VendorRecord {
    #[serde(alias = "pharmacy")]
    name: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    inventory: Vec<InventoryItem>,
}

impl From<VendorRecord> for Vendor {
    fn from(record: VendorRecord) -> Self {
        Vendor::new(record.name, record.location, record.inventory)
    }
}

/// A vendor with a read-only inventory snapshot.
///
/// The shipping cache is the only mutable part. It is owned by the vendor
/// and guarded by its own lock, so orders sharing the same vendors never
/// contend on a global map.
#[derive(Debug, Deserialize)]
#[serde(from = "VendorRecord")]
pub struct Vendor {
    pub name: String,
    pub location: String,
    inventory: Vec<InventoryItem>,
    index: FxHashMap<String, usize>,
    shipping_cache: Mutex<FxHashMap<RouteKey, ShippingQuote>>,
}

impl Vendor {
    /// Create a vendor. Repeated drugs keep their first listing.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        inventory: Vec<InventoryItem>,
    ) -> Self {
        let mut index = FxHashMap::default();
        let mut deduped = Vec::with_capacity(inventory.len());

        for item in inventory {
            if !index.contains_key(&item.drug) {
                index.insert(item.drug.clone(), deduped.len());
                deduped.push(item);
            }
        }

        Vendor {
            name: name.into(),
            location: location.into(),
            inventory: deduped,
            index,
            shipping_cache: Mutex::new(FxHashMap::default()),
        }
    }

    /// The deduplicated inventory in listing order.
    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    /// O(1) lookup of a drug in this vendor's inventory.
    pub fn find_drug(&self, drug: &str) -> Option<&InventoryItem> {
        self.index.get(drug).map(|&i| &self.inventory[i])
    }

    pub fn is_drug_in_stock(&self, drug: &str) -> bool {
        self.index.contains_key(drug)
    }

    /// Price of `quantity` units of `drug`, if stocked.
    pub fn estimate_item_cost(&self, drug: &str, quantity: u32) -> Option<f64> {
        self.find_drug(drug)
            .map(|item| item.unit_price * f64::from(quantity))
    }

    /// Previously resolved shipping quote for a route.
    pub fn cached_shipping(&self, route: &RouteKey) -> Option<ShippingQuote> {
        self.shipping_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(route)
            .cloned()
    }

    /// Store a quote unless another lookup for the same route won the race.
    /// Returns the quote that ends up cached.
    pub fn cache_shipping(&self, route: RouteKey, quote: ShippingQuote) -> ShippingQuote {
        self.shipping_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(route)
            .or_insert(quote)
            .clone()
    }

    /// Number of routes with a cached quote.
    pub fn cached_route_count(&self) -> usize {
        self.shipping_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Load a list of vendor snapshots from a JSON file.
    pub fn load_all<P: AsRef<Path>>(path: P) -> io::Result<Vec<Vendor>> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
