//! Embedded default reference data.
//!
//! The master lists and the routing table ship with the binary and are used
//! whenever the data directory has no persisted copy yet. The routing table
//! is static by design and never persisted.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use crate::models::{Item, Location, Order, OrderItem, OrderStatus, Supplier};

pub static LOCATIONS: Lazy<Vec<Location>> = Lazy::new(|| {
    serde_json::from_str(include_str!("seed/locations.json")).expect("embedded locations seed")
});

pub static SUPPLIERS: Lazy<Vec<Supplier>> = Lazy::new(|| {
    serde_json::from_str(include_str!("seed/suppliers.json")).expect("embedded suppliers seed")
});

pub static ITEMS: Lazy<Vec<Item>> =
    Lazy::new(|| serde_json::from_str(include_str!("seed/items.json")).expect("embedded items seed"));

/// Source id → ids of the destinations it may order from. Stores order from
/// their factory; factories order from vendors (and, for the branch factory,
/// from the head factory).
pub static ROUTE_MAP: Lazy<HashMap<String, Vec<String>>> = Lazy::new(|| {
    serde_json::from_str(include_str!("seed/route_map.json")).expect("embedded route map seed")
});

/// Sample ledger used when no order history has been persisted yet, newest
/// first like the live ledger. Dates are relative to startup so the
/// recent-duplicate check behaves the same as it does against live data.
pub fn orders() -> Vec<Order> {
    let now = Utc::now();
    vec![
        Order {
            id: "ORDER-20231205-002".to_string(),
            date: now - Duration::days(1),
            source_id: "S001".to_string(),
            destination_id: "F001".to_string(),
            items: vec![
                OrderItem {
                    item_id: "I0001".to_string(),
                    item_name: "サービスバッグ大".to_string(),
                    quantity: 100,
                    unit: "枚".to_string(),
                    price: Decimal::from(15),
                },
                OrderItem {
                    item_id: "I0006".to_string(),
                    item_name: "H型①〜⑩カラータック ピンク".to_string(),
                    quantity: 2,
                    unit: "箱".to_string(),
                    price: Decimal::from(2_500),
                },
            ],
            total_amount: Decimal::from(6_500),
            status: OrderStatus::Pending,
            desired_delivery_date: None,
            remarks: None,
        },
        Order {
            id: "ORDER-20231201-001".to_string(),
            date: now - Duration::days(5),
            source_id: "F001".to_string(),
            destination_id: "SUP006".to_string(),
            items: vec![
                OrderItem {
                    item_id: "I0049".to_string(),
                    item_name: "カーボンフィルター (エレメント４７０)".to_string(),
                    quantity: 2,
                    unit: "個".to_string(),
                    price: Decimal::from(15_000),
                },
                OrderItem {
                    item_id: "I0050".to_string(),
                    item_name: "ボイラー薬液 (イシクリーンNー６００)".to_string(),
                    quantity: 1,
                    unit: "缶".to_string(),
                    price: Decimal::from(8_000),
                },
            ],
            total_amount: Decimal::from(38_000),
            status: OrderStatus::Completed,
            desired_delivery_date: None,
            remarks: Some("午前中配送希望".to_string()),
        },
    ]
}
