//! Unit tests for order validation, duplicate handling and vendor snapshots.

use order_split::error::OrderError;
use order_split::order::{DuplicatePolicy, Order, OrderItem};
use order_split::vendor::{InventoryItem, Vendor};

/// Creates an order from (drug, quantity) pairs.
fn create_test_order(lines: &[(&str, u32)]) -> Order {
    let items = lines
        .iter()
        .map(|(drug, quantity)| OrderItem::new(*drug, *quantity, 0))
        .collect();
    Order::new(42, items, "10001")
}

#[test]
fn test_order_new_stamps_order_number() {
    let order = create_test_order(&[("a", 1), ("b", 2)]);

    assert!(order.items.iter().all(|item| item.order == 42));
    assert_eq!(order.item_count(), 2);
    assert_eq!(order.find_item("b").map(|item| item.quantity), Some(2));
    assert!(order.find_item("c").is_none());
}

#[test]
fn test_validate_accepts_well_formed_order() {
    let order = create_test_order(&[("a", 1), ("b", 2)]);
    assert_eq!(order.validate(10), Ok(()));
}

#[test]
fn test_validate_rejects_malformed_orders() {
    assert_eq!(create_test_order(&[]).validate(10), Err(OrderError::EmptyOrder));

    assert_eq!(
        create_test_order(&[("a", 1), ("b", 0)]).validate(10),
        Err(OrderError::InvalidQuantity {
            drug: "b".to_string()
        })
    );

    assert_eq!(
        create_test_order(&[("a", 1), ("a", 3)]).validate(10),
        Err(OrderError::DuplicateItem {
            drug: "a".to_string()
        })
    );

    assert_eq!(
        create_test_order(&[("a", 1), ("b", 1), ("c", 1)]).validate(2),
        Err(OrderError::TooManyItems { count: 3, max: 2 })
    );
}

#[test]
fn test_merge_duplicates_policies() {
    let lines = [("a", 1), ("b", 2), ("a", 3)];

    let rejected = create_test_order(&lines).merge_duplicates(DuplicatePolicy::Reject);
    assert_eq!(
        rejected,
        Err(OrderError::DuplicateItem {
            drug: "a".to_string()
        })
    );

    let summed = create_test_order(&lines)
        .merge_duplicates(DuplicatePolicy::SumQuantities)
        .unwrap();
    assert_eq!(summed.item_count(), 2);
    assert_eq!(summed.items[0].drug, "a");
    assert_eq!(summed.items[0].quantity, 4);
    assert_eq!(summed.items[1].quantity, 2);

    let kept = create_test_order(&lines)
        .merge_duplicates(DuplicatePolicy::KeepFirst)
        .unwrap();
    assert_eq!(kept.item_count(), 2);
    assert_eq!(kept.items[0].quantity, 1);
    assert_eq!(kept.validate(10), Ok(()));
}

#[test]
fn test_order_deserializes_from_json() {
    let order: Order = serde_json::from_str(
        r#"{"orderNumber": 7, "destination": "94107",
            "items": [{"drug": "advil", "quantity": 2}]}"#,
    )
    .unwrap();

    assert_eq!(order.order_number, 7);
    assert_eq!(order.destination, "94107");
    assert_eq!(order.items[0], OrderItem::new("advil", 2, 0));
}

#[test]
fn test_vendor_keeps_first_listing_of_a_drug() {
    let vendor = Vendor::new(
        "Corner",
        "10001",
        vec![
            InventoryItem::new("advil", 4.0),
            InventoryItem::new("zyrtec", 9.5),
            InventoryItem::new("advil", 1.0),
        ],
    );

    assert_eq!(vendor.inventory().len(), 2);
    assert_eq!(vendor.find_drug("advil").map(|item| item.unit_price), Some(4.0));
    assert_eq!(vendor.estimate_item_cost("zyrtec", 2), Some(19.0));
    assert_eq!(vendor.estimate_item_cost("tylenol", 1), None);
    assert!(vendor.is_drug_in_stock("zyrtec"));
    assert!(!vendor.is_drug_in_stock("zyr"));
    assert_eq!(vendor.cached_route_count(), 0);
}

#[test]
fn test_vendor_deserializes_from_snapshot() {
    let vendors: Vec<Vendor> = serde_json::from_str(
        r#"[{"pharmacy": "Corner", "location": "10001",
             "inventory": [{"drug": "advil", "cost": 4.25},
                           {"drug": "advil", "cost": 3.0}]}]"#,
    )
    .unwrap();

    assert_eq!(vendors.len(), 1);
    assert_eq!(vendors[0].name, "Corner");
    assert_eq!(vendors[0].location, "10001");
    assert_eq!(vendors[0].inventory(), &[InventoryItem::new("advil", 4.25)]);
}
