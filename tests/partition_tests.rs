//! Unit tests for the exhaustive partition search.

use order_split::options::OrderOptions;
use order_split::order::{Order, OrderItem};
use order_split::partition::{Partition, PartitionSearch};
use order_split::shipping::{QuoteSource, ShippingQuote};
use order_split::subset::{OrderCatalog, SubsetKey};
use order_split::vendor::{InventoryItem, Vendor};
use std::collections::HashSet;

/// Creates options where every vendor stocks exactly one of two drugs.
fn create_split_only_options() -> OrderOptions {
    let order = Order::new(
        1,
        vec![OrderItem::new("A", 1, 0), OrderItem::new("B", 1, 0)],
        "Z",
    );
    let x = Vendor::new("X", "x", vec![InventoryItem::new("A", 1.0)]);
    let y = Vendor::new("Y", "y", vec![InventoryItem::new("B", 1.0)]);
    let quote = ShippingQuote {
        cost: 1.0,
        distance_meters: None,
        source: QuoteSource::Measured,
    };

    OrderOptions::build(
        OrderCatalog::new(&order),
        &[&x, &y],
        &[quote.clone(), quote],
    )
}

#[test]
fn test_partition_counts_match_bell_numbers() {
    let bell = [1, 1, 2, 5, 15, 52, 203, 877];

    assert_eq!(PartitionSearch::new(0).count(), 0);
    for n in 1..bell.len() {
        assert_eq!(PartitionSearch::new(n).count(), bell[n], "n = {}", n);
    }
}

#[test]
fn test_partitions_are_exact_covers_and_unique() {
    let n = 6;
    let partitions: Vec<Partition> = PartitionSearch::new(n).collect();
    let mut seen = HashSet::new();

    for partition in &partitions {
        assert!(partition.is_exact_cover(n));
        assert_eq!(partition.covered(), SubsetKey::full(n));

        let mut canonical = partition.subsets.clone();
        canonical.sort();
        assert!(seen.insert(canonical), "duplicate partition {:?}", partition);
    }
}

#[test]
fn test_two_item_order_has_two_partitions() {
    let partitions: Vec<Partition> = PartitionSearch::new(2).collect();

    assert_eq!(
        partitions,
        vec![
            Partition {
                subsets: vec![SubsetKey::singleton(0), SubsetKey::singleton(1)],
            },
            Partition {
                subsets: vec![SubsetKey::full(2)],
            },
        ]
    );
}

#[test]
fn test_filter_keeps_single_items() {
    let partitions: Vec<Partition> = PartitionSearch::with_filter(4, |_| false).collect();

    assert_eq!(partitions.len(), 1);
    assert_eq!(partitions[0].len(), 4);
    assert!(partitions[0].subsets.iter().all(|key| key.len() == 1));
}

#[test]
fn test_search_depth_is_bounded_by_item_count() {
    let n = 5;
    for partition in PartitionSearch::new(n) {
        assert!(!partition.is_empty());
        assert!(partition.len() <= n);
    }
}

#[test]
fn test_pruning_drops_unsourceable_subsets() {
    let options = create_split_only_options();

    let pruned = PartitionSearch::for_options(&options, true);
    assert_eq!(pruned.candidate_count(), 2);
    assert_eq!(pruned.count(), 1);

    let unpruned = PartitionSearch::for_options(&options, false);
    assert_eq!(unpruned.candidate_count(), 3);
    assert_eq!(unpruned.count(), 2);
}

#[test]
fn test_is_exact_cover_detects_gaps_and_overlaps() {
    let gap = Partition {
        subsets: vec![SubsetKey::singleton(0)],
    };
    assert!(!gap.is_exact_cover(2));

    let overlap = Partition {
        subsets: vec![SubsetKey::full(2), SubsetKey::singleton(1)],
    };
    assert!(!overlap.is_exact_cover(2));

    let exact = Partition {
        subsets: vec![SubsetKey::singleton(1), SubsetKey::singleton(0)],
    };
    assert!(exact.is_exact_cover(2));
}
