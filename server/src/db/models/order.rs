//! Order Model
//!
//! Orders embed immutable line-item snapshots. Item name/price/image are
//! copied from the product at order-creation time and never re-derived,
//! even if the product later changes or is deleted.

use super::serde_helpers;
use super::user::UserId;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

/// Order status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Parse a status from its wire form; `None` for anything outside the enum
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Embedded line-item snapshot, owned exclusively by its parent order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub image: String,
}

/// Order model
///
/// Stored and served under the same camelCase field names, so rows come
/// straight back as response bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    #[serde(with = "serde_helpers::record_id")]
    pub owner: UserId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: i64,
}

/// One requested line of a new order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub items: Vec<OrderLineRequest>,
    pub name_order: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(OrderStatus::parse("pending"), Some(OrderStatus::Pending));
        assert_eq!(
            OrderStatus::parse("completed"),
            Some(OrderStatus::Completed)
        );
        assert_eq!(
            OrderStatus::parse("cancelled"),
            Some(OrderStatus::Cancelled)
        );
        assert_eq!(OrderStatus::parse("shipped"), None);
        assert_eq!(OrderStatus::parse("PENDING"), None);
        assert_eq!(OrderStatus::parse(""), None);
    }

    #[test]
    fn test_order_wire_form_is_camel_case() {
        let order = Order {
            id: Some(RecordId::from_table_key("order", "abc123")),
            owner: RecordId::from_table_key("user", "u1"),
            name: "Restock".to_string(),
            description: None,
            items: vec![],
            total_amount: 10.5,
            status: OrderStatus::Pending,
            created_at: 1_700_000_000_000,
        };
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["totalAmount"], 10.5);
        assert_eq!(value["createdAt"], 1_700_000_000_000i64);
        assert!(value.get("total_amount").is_none());
        assert_eq!(value["id"], "order:abc123");
    }

    #[test]
    fn test_status_wire_form() {
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        let back: OrderStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(back, OrderStatus::Pending);
    }
}
