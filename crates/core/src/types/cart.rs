//! Canonical cart records and derived aggregates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// Snapshot of the product a cart item refers to, taken by the backend at
/// add-to-cart time and refreshed on fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub name: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

/// A single cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub color: String,
    pub size: String,
    pub quantity: u32,
    /// Unit price locked in when the item was added. Takes precedence over
    /// any price on the product snapshot, so later catalog price changes do
    /// not retroactively alter the cart total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Pre-discount unit price, when the backend reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductSnapshot>,
}

impl CartItem {
    /// Effective unit price for this line.
    ///
    /// Resolution order: locked item price, then the snapshot's sale price,
    /// base price, and generic price, then zero. The locked price winning
    /// over the live product price is the buyer's price protection.
    #[must_use]
    pub fn resolved_price(&self) -> Decimal {
        if let Some(price) = self.price {
            return price;
        }
        if let Some(product) = &self.product {
            if let Some(sale) = product.sale_price {
                return sale;
            }
            if let Some(base) = product.base_price {
                return base;
            }
            if let Some(generic) = product.price {
                return generic;
            }
        }
        Decimal::ZERO
    }

    /// Line total: resolved unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.resolved_price() * Decimal::from(self.quantity)
    }
}

/// Canonical cart: the ordered item list plus aggregates derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_price: Decimal,
}

impl Cart {
    /// Build a cart from an item list, deriving the aggregates.
    ///
    /// Invariants: `total_items` is the sum of item quantities and
    /// `total_price` is the sum of line totals. Every mutation to the item
    /// list must go back through this constructor (or [`Self::recompute`])
    /// before the cart is published.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self {
            items,
            total_items: 0,
            total_price: Decimal::ZERO,
        };
        cart.recompute();
        cart
    }

    /// Re-derive `total_items` and `total_price` from the current items.
    ///
    /// The quantity sum saturates: backend payloads set the per-line
    /// quantities, so the sum must not be able to panic.
    pub fn recompute(&mut self) {
        self.total_items = self
            .items
            .iter()
            .fold(0_u32, |acc, i| acc.saturating_add(i.quantity));
        self.total_price = self.items.iter().map(CartItem::line_total).sum();
    }

    /// True when the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
