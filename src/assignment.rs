//! Costed vendor offers and the final order assignment.

use crate::subset::SubsetKey;
use serde::Serialize;
use std::fmt;

/// One drug line inside a vendor offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComboItem {
    pub drug: String,
    pub order: u64,
    pub quantity: u32,
    pub unit_price: f64,
}

/// One vendor's costed offer for one subset of the order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderCombo {
    /// Supplying vendor, `None` when nobody can supply the subset
    pub vendor: Option<String>,
    #[serde(skip)]
    pub subset: SubsetKey,
    pub items: Vec<ComboItem>,
    pub subtotal: f64,
    pub shipping: f64,
    pub total: f64,
}

impl OrderCombo {
    /// Placeholder offer for a subset no vendor can supply.
    ///
    /// It carries a single line naming the whole subset, so it only accounts
    /// for a full subset when that subset is one item.
    pub fn unsourceable(subset: SubsetKey, label: impl Into<String>, order: u64) -> Self {
        OrderCombo {
            vendor: None,
            subset,
            items: vec![ComboItem {
                drug: label.into(),
                order,
                quantity: 0,
                unit_price: 0.0,
            }],
            subtotal: 0.0,
            shipping: 0.0,
            total: 0.0,
        }
    }

    pub fn is_sourced(&self) -> bool {
        self.vendor.is_some()
    }

    /// Number of order lines this offer accounts for.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// The chosen split of an order across vendors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub order_number: u64,
    pub grand_total: f64,
    pub orders: Vec<OrderCombo>,
}

impl Assignment {
    /// Offers that could not be sourced.
    pub fn unsourced(&self) -> impl Iterator<Item = &OrderCombo> {
        self.orders.iter().filter(|combo| !combo.is_sourced())
    }

    pub fn is_fully_sourced(&self) -> bool {
        self.orders.iter().all(OrderCombo::is_sourced)
    }

    /// Total order lines covered by the selected offers.
    pub fn covered_item_count(&self) -> usize {
        self.orders.iter().map(OrderCombo::item_count).sum()
    }

    /// Number of distinct vendors shipping part of the order.
    pub fn vendor_count(&self) -> usize {
        let mut vendors: Vec<&str> = self
            .orders
            .iter()
            .filter_map(|combo| combo.vendor.as_deref())
            .collect();
        vendors.sort_unstable();
        vendors.dedup();
        vendors.len()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Assignment for order {}:", self.order_number)?;
        writeln!(f, "  Grand Total: {:.2}", self.grand_total)?;
        writeln!(f, "  Shipments: {}", self.orders.len())?;

        for combo in &self.orders {
            match &combo.vendor {
                Some(vendor) => writeln!(
                    f,
                    "  {}: items {:.2} + shipping {:.2} = {:.2}",
                    vendor, combo.subtotal, combo.shipping, combo.total
                )?,
                None => writeln!(f, "  UNSOURCED")?,
            }
            for item in &combo.items {
                writeln!(
                    f,
                    "    {} x{} @ {:.2}",
                    item.drug, item.quantity, item.unit_price
                )?;
            }
        }

        Ok(())
    }
}
