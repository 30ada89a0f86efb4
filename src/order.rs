//! Orders and their line items.

use crate::error::OrderError;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// A single drug line on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub drug: String,
    pub quantity: u32,
    /// Number of the order owning this line
    #[serde(default)]
    pub order: u64,
}

impl OrderItem {
    /// Create a new line item.
    pub fn new(drug: impl Into<String>, quantity: u32, order: u64) -> Self {
        OrderItem {
            drug: drug.into(),
            quantity,
            order,
        }
    }
}

/// A customer request for drugs shipped to one destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_number: u64,
    pub items: Vec<OrderItem>,
    /// Postal code or other location key understood by the distance service
    pub destination: String,
}

/// How repeated drug lines are handled before an order is optimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`OrderError::DuplicateItem`].
    #[default]
    Reject,
    /// Merge repeated lines by adding their quantities.
    SumQuantities,
    /// Keep the first line for each drug and drop the rest.
    KeepFirst,
}

impl Order {
    /// Create a new order. Each item is stamped with the order number.
    pub fn new(order_number: u64, items: Vec<OrderItem>, destination: impl Into<String>) -> Self {
        let items = items
            .into_iter()
            .map(|item| OrderItem {
                order: order_number,
                ..item
            })
            .collect();

        Order {
            order_number,
            items,
            destination: destination.into(),
        }
    }

    /// Number of distinct drug lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Look up the line for a drug.
    pub fn find_item(&self, drug: &str) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.drug == drug)
    }

    /// Check that the order can be handed to the optimizer.
    pub fn validate(&self, max_items: usize) -> Result<(), OrderError> {
        if self.items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let mut seen = FxHashSet::default();
        for item in &self.items {
            if item.quantity == 0 {
                return Err(OrderError::InvalidQuantity {
                    drug: item.drug.clone(),
                });
            }
            if !seen.insert(item.drug.as_str()) {
                return Err(OrderError::DuplicateItem {
                    drug: item.drug.clone(),
                });
            }
        }

        if self.items.len() > max_items {
            return Err(OrderError::TooManyItems {
                count: self.items.len(),
                max: max_items,
            });
        }

        Ok(())
    }

    /// Resolve repeated drug lines according to `policy`.
    ///
    /// Line order follows the first occurrence of each drug.
    pub fn merge_duplicates(mut self, policy: DuplicatePolicy) -> Result<Order, OrderError> {
        let mut positions: FxHashMap<String, usize> = FxHashMap::default();
        let mut merged: Vec<OrderItem> = Vec::with_capacity(self.items.len());

        for item in self.items.drain(..) {
            match positions.get(&item.drug) {
                None => {
                    positions.insert(item.drug.clone(), merged.len());
                    merged.push(item);
                }
                Some(&index) => match policy {
                    DuplicatePolicy::Reject => {
                        return Err(OrderError::DuplicateItem { drug: item.drug });
                    }
                    DuplicatePolicy::SumQuantities => {
                        merged[index].quantity = merged[index].quantity.saturating_add(item.quantity);
                    }
                    DuplicatePolicy::KeepFirst => {}
                },
            }
        }

        self.items = merged;
        Ok(self)
    }

    /// Load one order or a list of orders from a JSON file.
    pub fn load_all<P: AsRef<Path>>(path: P) -> io::Result<Vec<Order>> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(Order),
            Many(Vec<Order>),
        }

        let reader = BufReader::new(File::open(path)?);
        let orders = match serde_json::from_reader(reader)? {
            OneOrMany::One(order) => vec![order],
            OneOrMany::Many(orders) => orders,
        };

        Ok(orders
            .into_iter()
            .map(|order| Order::new(order.order_number, order.items, order.destination))
            .collect())
    }
}
