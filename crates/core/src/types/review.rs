//! Canonical product review record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::{ProductId, ReviewId};

/// A customer review for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub author: String,
    /// Star rating clamped to 0..=5 at normalization time (0 = unrated).
    pub rating: u32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
