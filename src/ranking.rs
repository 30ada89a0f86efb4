//! Per-drug vendor ranking with amortized shipping.
//!
//! One grid belongs to one order. For every ordered drug it lists each
//! vendor's price as if that vendor shipped only that drug, then works out
//! how many drugs would have to share the vendor's shipping before it
//! becomes the cheapest source.

use crate::options::OrderOptions;
use crate::order::OrderItem;
use crate::utils::round_cents;
use itertools::Itertools;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

/// One vendor's standing for one drug.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub drug: String,
    pub vendor: String,
    pub unit_cost: f64,
    pub subtotal: f64,
    pub shipping: f64,
    pub order_total: f64,
    /// Smallest number of order lines sharing this vendor's shipping at
    /// which it still matches the cheapest single-drug total
    pub cheapest_when: Option<usize>,
}

/// Vendor rankings for each drug of one order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VendorRankingGrid {
    grid: BTreeMap<String, Vec<RankingEntry>>,
}

impl VendorRankingGrid {
    pub fn new() -> Self {
        VendorRankingGrid::default()
    }

    /// Build the grid from the single-drug offers of an order.
    pub fn from_options(options: &OrderOptions) -> Self {
        let mut grid = VendorRankingGrid::new();
        for (index, item) in options.catalog().items().iter().enumerate() {
            for offer in options.singleton_offers(index) {
                let (Some(vendor), Some(line)) = (&offer.vendor, offer.items.first()) else {
                    continue;
                };
                grid.add_entry(item, vendor, line.unit_price, offer.shipping);
            }
        }
        grid
    }

    /// Record one vendor's price for an ordered drug.
    pub fn add_entry(&mut self, item: &OrderItem, vendor: &str, unit_cost: f64, shipping: f64) {
        let subtotal = round_cents(unit_cost * f64::from(item.quantity));
        self.grid
            .entry(item.drug.clone())
            .or_default()
            .push(RankingEntry {
                drug: item.drug.clone(),
                vendor: vendor.to_string(),
                unit_cost,
                subtotal,
                shipping,
                order_total: round_cents(subtotal + shipping),
                cheapest_when: None,
            });
    }

    /// Sort every drug's vendors by total and compute `cheapest_when`.
    ///
    /// The amortized total grows as fewer lines share shipping, so counting
    /// down from `order_size` the first failure is final.
    pub fn rank(&mut self, order_size: usize) {
        for (drug, entries) in self.grid.iter_mut() {
            entries.sort_by(|a, b| a.order_total.total_cmp(&b.order_total));

            let Some(baseline) = entries.first().map(|entry| entry.order_total) else {
                continue;
            };

            for entry in entries.iter_mut() {
                entry.cheapest_when = None;
                for shared in (1..=order_size.max(1)).rev() {
                    let amortized = round_cents(entry.shipping / shared as f64 + entry.subtotal);
                    if amortized > baseline {
                        break;
                    }
                    entry.cheapest_when = Some(shared);
                }
            }

            debug!(
                "{}: {}",
                drug,
                entries
                    .iter()
                    .map(|entry| format!(
                        "{} {:.2} (cheapest when {:?})",
                        entry.vendor, entry.order_total, entry.cheapest_when
                    ))
                    .join(", ")
            );
        }
    }

    /// Ranked entries for a drug.
    pub fn entries(&self, drug: &str) -> &[RankingEntry] {
        self.grid.get(drug).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The vendor with the lowest single-drug total.
    pub fn cheapest(&self, drug: &str) -> Option<&RankingEntry> {
        self.entries(drug).first()
    }

    /// Drugs with at least one entry, in lexical order.
    pub fn drugs(&self) -> impl Iterator<Item = &str> {
        self.grid.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }
}
