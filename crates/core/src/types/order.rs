//! Canonical order records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::OrderId;
use crate::types::status::OrderStatus;
use crate::types::user::Address;

/// Image shown when a line item arrived without one.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://cdn.copperleaf.shop/static/placeholder.png";

/// Name shown when a line item arrived without one.
pub const PLACEHOLDER_PRODUCT_NAME: &str = "Product";

/// A single order line, fully defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub quantity: u32,
    pub price: Decimal,
    pub name: String,
    pub image: String,
    pub color: String,
    pub size: String,
}

/// Customer identity attached to an order (admin views show this; customer
/// views show their own).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub name: String,
    pub email: String,
}

/// Canonical order record.
///
/// The normalizer guarantees every field is populated even when the raw
/// payload is missing most of them, so no view needs `Option` handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    pub shipping_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub customer: OrderCustomer,
    pub shipping_address: Address,
}

impl Order {
    /// Number of units across all lines (dashboard badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_count_sums_quantities() {
        let order = Order {
            id: OrderId::new("o-1"),
            order_number: "ORD-1".to_string(),
            status: OrderStatus::Processing,
            created_at: Utc::now(),
            items: vec![
                OrderItem {
                    id: "l-1".to_string(),
                    quantity: 2,
                    price: Decimal::ZERO,
                    name: PLACEHOLDER_PRODUCT_NAME.to_string(),
                    image: PLACEHOLDER_IMAGE_URL.to_string(),
                    color: String::new(),
                    size: String::new(),
                },
                OrderItem {
                    id: "l-2".to_string(),
                    quantity: 1,
                    price: Decimal::ZERO,
                    name: PLACEHOLDER_PRODUCT_NAME.to_string(),
                    image: PLACEHOLDER_IMAGE_URL.to_string(),
                    color: String::new(),
                    size: String::new(),
                },
            ],
            subtotal: Decimal::ZERO,
            shipping_cost: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
            customer: OrderCustomer::default(),
            shipping_address: Address::default(),
        };
        assert_eq!(order.item_count(), 3);
    }
}
