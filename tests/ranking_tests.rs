//! Unit tests for the per-drug vendor ranking grid.

use order_split::options::OrderOptions;
use order_split::order::{Order, OrderItem};
use order_split::ranking::VendorRankingGrid;
use order_split::shipping::{QuoteSource, ShippingQuote};
use order_split::subset::OrderCatalog;
use order_split::utils::round_cents;
use order_split::vendor::{InventoryItem, Vendor};

/// Creates a grid for one drug with three vendors on a three-line order.
fn create_test_grid() -> VendorRankingGrid {
    let item = OrderItem::new("A", 1, 0);
    let mut grid = VendorRankingGrid::new();

    // Expensive shipping, cheap drug
    grid.add_entry(&item, "Far", 10.0, 30.0);
    // Baseline: 20 in total
    grid.add_entry(&item, "Near", 14.0, 6.0);
    grid.add_entry(&item, "Middle", 14.0, 12.0);

    grid.rank(3);
    grid
}

#[test]
fn test_entries_are_sorted_by_order_total() {
    let grid = create_test_grid();
    let totals: Vec<f64> = grid.entries("A").iter().map(|e| e.order_total).collect();

    assert_eq!(totals, vec![20.0, 26.0, 40.0]);
    assert_eq!(grid.cheapest("A").map(|e| e.vendor.as_str()), Some("Near"));
}

#[test]
fn test_cheapest_when_values() {
    let grid = create_test_grid();
    let entries = grid.entries("A");

    // Near is the cheapest even alone
    assert_eq!(entries[0].cheapest_when, Some(1));
    // Middle: 12/2 + 14 = 20 still matches, 12/1 + 14 does not
    assert_eq!(entries[1].vendor, "Middle");
    assert_eq!(entries[1].cheapest_when, Some(2));
    // Far: 30/3 + 10 = 20 matches only with all three lines
    assert_eq!(entries[2].vendor, "Far");
    assert_eq!(entries[2].cheapest_when, Some(3));
}

#[test]
fn test_cheapest_when_holds_for_every_larger_volume() {
    let grid = create_test_grid();
    let baseline = grid.cheapest("A").unwrap().order_total;

    for entry in grid.entries("A") {
        if let Some(k) = entry.cheapest_when {
            for shared in k..=3 {
                let amortized = round_cents(entry.shipping / shared as f64 + entry.subtotal);
                assert!(amortized <= baseline, "{} at {}", entry.vendor, shared);
            }
            if k > 1 {
                let below = round_cents(entry.shipping / (k - 1) as f64 + entry.subtotal);
                assert!(below > baseline);
            }
        }
    }
}

#[test]
fn test_vendor_never_competitive() {
    let item = OrderItem::new("A", 2, 0);
    let mut grid = VendorRankingGrid::new();
    grid.add_entry(&item, "Cheap", 1.0, 1.0);
    grid.add_entry(&item, "Pricey", 5.0, 1.0);
    grid.rank(4);

    let entries = grid.entries("A");
    assert_eq!(entries[0].cheapest_when, Some(1));
    assert_eq!(entries[1].subtotal, 10.0);
    assert_eq!(entries[1].cheapest_when, None);
}

#[test]
fn test_grid_from_order_options() {
    let order = Order::new(
        1,
        vec![
            OrderItem::new("A", 2, 0),
            OrderItem::new("B", 1, 0),
            OrderItem::new("C", 1, 0),
        ],
        "Z",
    );
    let x = Vendor::new(
        "X",
        "x",
        vec![InventoryItem::new("A", 5.0), InventoryItem::new("B", 3.0)],
    );
    let y = Vendor::new("Y", "y", vec![InventoryItem::new("A", 4.0)]);
    let quotes = [10.0, 1.0].map(|cost| ShippingQuote {
        cost,
        distance_meters: None,
        source: QuoteSource::Measured,
    });
    let options = OrderOptions::build(OrderCatalog::new(&order), &[&x, &y], &quotes);

    let mut grid = VendorRankingGrid::from_options(&options);
    grid.rank(options.catalog().len());

    assert_eq!(grid.drugs().collect::<Vec<_>>(), vec!["A", "B"]);

    let a = grid.entries("A");
    assert_eq!(a.len(), 2);
    assert_eq!(a[0].vendor, "Y");
    assert_eq!(a[0].order_total, 9.0);
    assert_eq!(a[0].cheapest_when, Some(1));
    assert_eq!(a[1].vendor, "X");
    assert_eq!(a[1].subtotal, 10.0);
    assert_eq!(a[1].cheapest_when, None);

    assert_eq!(grid.entries("B")[0].cheapest_when, Some(1));
    assert!(grid.entries("C").is_empty());
    assert!(grid.cheapest("C").is_none());
}
