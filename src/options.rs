//! Vendor feasibility and pricing for every subset of an order.

use crate::assignment::{ComboItem, OrderCombo};
use crate::shipping::ShippingQuote;
use crate::subset::{OrderCatalog, SubsetKey};
use crate::utils::round_cents;
use crate::vendor::Vendor;
use log::debug;

/// What one vendor can supply from the order.
struct VendorStock<'a> {
    vendor: &'a Vendor,
    stocked: SubsetKey,
    unit_prices: Vec<Option<f64>>,
    shipping: f64,
}

impl<'a> VendorStock<'a> {
    fn new(vendor: &'a Vendor, catalog: &OrderCatalog, shipping: f64) -> Self {
        let unit_prices: Vec<Option<f64>> = catalog
            .items()
            .iter()
            .map(|item| vendor.find_drug(&item.drug).map(|stock| stock.unit_price))
            .collect();

        let stocked = unit_prices
            .iter()
            .enumerate()
            .filter(|(_, price)| price.is_some())
            .fold(SubsetKey::default(), |key, (index, _)| {
                key.union(SubsetKey::singleton(index))
            });

        VendorStock {
            vendor,
            stocked,
            unit_prices,
            shipping,
        }
    }

    /// Price this vendor's offer for a subset, if it stocks all of it.
    fn offer(&self, key: SubsetKey, catalog: &OrderCatalog) -> Option<OrderCombo> {
        if !key.is_subset_of(self.stocked) {
            return None;
        }

        let mut items = Vec::with_capacity(key.len());
        let mut subtotal = 0.0;

        for index in key.indices() {
            let ordered = catalog.item(index)?;
            let unit_price = self.unit_prices.get(index).copied().flatten()?;
            subtotal += unit_price * f64::from(ordered.quantity);
            items.push(ComboItem {
                drug: ordered.drug.clone(),
                order: catalog.order_number(),
                quantity: ordered.quantity,
                unit_price,
            });
        }

        let subtotal = round_cents(subtotal);
        Some(OrderCombo {
            vendor: Some(self.vendor.name.clone()),
            subset: key,
            items,
            subtotal,
            shipping: self.shipping,
            total: round_cents(subtotal + self.shipping),
        })
    }
}

/// Costed vendor offers for every non-empty subset of an order.
///
/// Every subset has at least one offer: when no vendor can supply it the
/// list holds a single unsourceable placeholder.
#[derive(Debug, Clone)]
pub struct OrderOptions {
    catalog: OrderCatalog,
    /// Offers indexed by subset bits; slot 0 (the empty set) is unused
    offers: Vec<Vec<OrderCombo>>,
    best: Vec<usize>,
}

impl OrderOptions {
    /// Price every subset of `catalog` against `vendors`.
    ///
    /// `shipping[i]` is the shipping quote of `vendors[i]` to the order's
    /// destination.
    pub fn build(catalog: OrderCatalog, vendors: &[&Vendor], shipping: &[ShippingQuote]) -> Self {
        debug_assert_eq!(vendors.len(), shipping.len());

        let stocks: Vec<VendorStock<'_>> = vendors
            .iter()
            .zip(shipping)
            .map(|(&vendor, quote)| VendorStock::new(vendor, &catalog, quote.cost))
            .collect();

        let slots = catalog.full_key().bits() as usize + 1;
        let mut offers = Vec::with_capacity(slots);
        let mut best = Vec::with_capacity(slots);
        offers.push(Vec::new());
        best.push(0);

        for key in catalog.subsets() {
            let mut feasible: Vec<OrderCombo> = stocks
                .iter()
                .filter_map(|stock| stock.offer(key, &catalog))
                .collect();

            if feasible.is_empty() {
                debug!("no vendor can supply [{}]", catalog.label(key));
                feasible.push(OrderCombo::unsourceable(
                    key,
                    catalog.label(key),
                    catalog.order_number(),
                ));
            }

            best.push(cheapest_index(&feasible));
            offers.push(feasible);
        }

        OrderOptions {
            catalog,
            offers,
            best,
        }
    }

    pub fn catalog(&self) -> &OrderCatalog {
        &self.catalog
    }

    /// Number of priced subsets (2^n - 1).
    pub fn subset_count(&self) -> usize {
        self.offers.len() - 1
    }

    /// Every offer for a subset, in vendor order.
    ///
    /// Panics if `key` is empty or not a subset of this order.
    pub fn offers(&self, key: SubsetKey) -> &[OrderCombo] {
        assert!(!key.is_empty(), "the empty subset has no offers");
        &self.offers[key.bits() as usize]
    }

    /// The cheapest offer for a subset. Ties go to the earlier vendor.
    ///
    /// Panics if `key` is empty or not a subset of this order.
    pub fn best(&self, key: SubsetKey) -> &OrderCombo {
        let index = key.bits() as usize;
        &self.offers(key)[self.best[index]]
    }

    /// Whether at least one vendor stocks every item of the subset.
    pub fn is_sourceable(&self, key: SubsetKey) -> bool {
        self.best(key).is_sourced()
    }

    /// Offers for the single item at `index`.
    pub fn singleton_offers(&self, index: usize) -> &[OrderCombo] {
        self.offers(SubsetKey::singleton(index))
    }
}

fn cheapest_index(offers: &[OrderCombo]) -> usize {
    let mut cheapest = 0;
    for (i, offer) in offers.iter().enumerate().skip(1) {
        if offer.total < offers[cheapest].total {
            cheapest = i;
        }
    }
    cheapest
}
