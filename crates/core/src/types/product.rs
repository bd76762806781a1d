//! Canonical related-product summary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// Compact product card shown in "you may also like" rails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedProduct {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
}

impl RelatedProduct {
    /// Price a card should display: sale price when present.
    #[must_use]
    pub fn display_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }
}
