//! Domain types shared by the storage layer, services and HTTP handlers.
//!
//! Master records ([`Location`], [`Supplier`], [`Item`]) are admin-editable
//! reference data. [`Order`] records are append-only once created; the line
//! items inside them carry snapshot copies of the master fields so that later
//! master edits never rewrite history.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of ordering location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    Store,
    Factory,
}

/// Kind of order destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SupplierType {
    Factory,
    Vendor,
}

/// A store or factory that can place orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_supplier_id: Option<String>,
}

/// Contact details for a supplier. Every field is optional; suppliers are
/// reached by whatever channel the master record happens to carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fax: Option<String>,
}

/// An external vendor or a factory acting as the receiving side of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub supplier_type: SupplierType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<ContactInfo>,
}

/// A catalog item that can be ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: String,
    pub category: String,
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_supplier_id: Option<String>,
}

/// One line of an order. `item_name`, `unit` and `price` are snapshots taken
/// at order time and must not follow later edits of the item master.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub item_id: String,
    pub item_name: String,
    pub quantity: i32,
    pub unit: String,
    pub price: Decimal,
}

impl OrderItem {
    /// Line total (`price × quantity`).
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order lifecycle. Only the pending → completed transition is exercised;
/// the intermediate states exist in stored data but are never entered by
/// this system.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Evaluated,
    Approved,
    Shipping,
    Completed,
}

/// A placed order. Appended to the front of the ledger at checkout and never
/// deleted; only `status` may change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: String,
    pub date: DateTime<Utc>,
    pub source_id: String,
    pub destination_id: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_delivery_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl Order {
    /// Recomputes the total from the stored line snapshots.
    pub fn computed_total(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        let line = OrderItem {
            item_id: "I0001".into(),
            item_name: "サービスバッグ大".into(),
            quantity: 100,
            unit: "枚".into(),
            price: dec!(15),
        };
        assert_eq!(line.line_total(), dec!(1500));
    }

    #[test]
    fn order_status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        let back: OrderStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(back, OrderStatus::Completed);
    }

    #[test]
    fn master_type_field_round_trips_under_type_key() {
        let loc = Location {
            id: "S001".into(),
            name: "テスト店".into(),
            location_type: LocationType::Store,
            default_supplier_id: Some("F001".into()),
        };
        let value = serde_json::to_value(&loc).unwrap();
        assert_eq!(value["type"], "store");
        let back: Location = serde_json::from_value(value).unwrap();
        assert_eq!(back, loc);
    }
}
