//! Canonical subsets of an order's items.

use crate::config::MAX_SUPPORTED_ITEMS;
use crate::order::{Order, OrderItem};
use itertools::Itertools;
use std::fmt;

/// Width of the bitmask behind a [`SubsetKey`].
const KEY_BITS: usize = u64::BITS as usize;

/// A non-empty set of order items, as a bitmask over canonical item indices.
///
/// Two subsets with the same members always have the same key, whatever
/// order the members were discovered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SubsetKey(u64);

impl SubsetKey {
    pub fn from_bits(bits: u64) -> Self {
        SubsetKey(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    /// The subset holding only item `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit in the key.
    pub fn singleton(index: usize) -> Self {
        assert!(index < KEY_BITS, "item index {} out of range", index);
        SubsetKey(1u64 << index)
    }

    /// The subset holding all of the first `n` items.
    ///
    /// # Panics
    ///
    /// Panics if `n` items do not fit in the key.
    pub fn full(n: usize) -> Self {
        assert!(n < KEY_BITS, "{} items do not fit in a subset key", n);
        SubsetKey((1u64 << n) - 1)
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, index: usize) -> bool {
        index < KEY_BITS && self.0 & (1u64 << index) != 0
    }

    pub fn is_disjoint(self, other: SubsetKey) -> bool {
        self.0 & other.0 == 0
    }

    pub fn is_subset_of(self, other: SubsetKey) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn union(self, other: SubsetKey) -> SubsetKey {
        SubsetKey(self.0 | other.0)
    }

    /// Smallest member index.
    pub fn lowest_index(self) -> Option<usize> {
        (self.0 != 0).then(|| self.0.trailing_zeros() as usize)
    }

    /// Member indices in ascending order.
    pub fn indices(self) -> impl Iterator<Item = usize> {
        let bits = self.0;
        (0..KEY_BITS).filter(move |&i| bits & (1u64 << i) != 0)
    }
}

impl fmt::Display for SubsetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.indices().join(","))
    }
}

/// All non-empty subsets of `n` items, in ascending bitmask order.
pub fn enumerate_subsets(n: usize) -> impl Iterator<Item = SubsetKey> {
    let n = n.min(MAX_SUPPORTED_ITEMS);
    (1..=SubsetKey::full(n).bits()).map(SubsetKey)
}

/// An order's items in canonical order.
///
/// Items are sorted by drug identifier, ignoring case, so the same set of
/// drugs always maps to the same indices.
#[derive(Debug, Clone)]
pub struct OrderCatalog {
    order_number: u64,
    items: Vec<OrderItem>,
}

impl OrderCatalog {
    pub fn new(order: &Order) -> Self {
        let items = order
            .items
            .iter()
            .cloned()
            .sorted_by(|a, b| {
                a.drug
                    .to_lowercase()
                    .cmp(&b.drug.to_lowercase())
                    .then_with(|| a.drug.cmp(&b.drug))
            })
            .collect();

        OrderCatalog {
            order_number: order.order_number,
            items,
        }
    }

    pub fn order_number(&self) -> u64 {
        self.order_number
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&OrderItem> {
        self.items.get(index)
    }

    /// Canonical index of a drug, by exact identifier.
    pub fn index_of(&self, drug: &str) -> Option<usize> {
        self.items.iter().position(|item| item.drug == drug)
    }

    /// Key for a set of drugs. `None` if any drug is not on the order.
    pub fn key_for(&self, drugs: &[&str]) -> Option<SubsetKey> {
        drugs.iter().try_fold(SubsetKey::default(), |key, drug| {
            self.index_of(drug)
                .map(|index| key.union(SubsetKey::singleton(index)))
        })
    }

    /// The key covering every item.
    pub fn full_key(&self) -> SubsetKey {
        SubsetKey::full(self.items.len())
    }

    /// Every non-empty subset of this order.
    pub fn subsets(&self) -> impl Iterator<Item = SubsetKey> {
        enumerate_subsets(self.items.len())
    }

    /// Drug identifiers of a subset in canonical order.
    pub fn drugs(&self, key: SubsetKey) -> impl Iterator<Item = &str> + '_ {
        key.indices()
            .filter_map(move |index| self.items.get(index))
            .map(|item| item.drug.as_str())
    }

    /// Space-delimited drug list for a subset.
    pub fn label(&self, key: SubsetKey) -> String {
        self.drugs(key).join(" ")
    }
}
