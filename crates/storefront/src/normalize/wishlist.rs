//! Wishlist normalization: any known shape -> a set of product ids.

use std::collections::BTreeSet;

use serde_json::Value;

use copperleaf_core::ProductId;

use super::{extract_records, string_field};

const LIST_KEYS: &[&str] = &["wishlist", "items", "products", "data"];

/// Normalize a wishlist payload.
///
/// Entries are plain id strings or objects carrying a product reference;
/// anything unrecognizable is dropped (a wishlist badge with a phantom
/// count is worse than a missing entry).
#[must_use]
pub fn normalize_wishlist(payload: &Value) -> BTreeSet<ProductId> {
    extract_records(payload, LIST_KEYS)
        .iter()
        .filter_map(normalize_entry)
        .collect()
}

fn normalize_entry(raw: &Value) -> Option<ProductId> {
    match raw {
        Value::String(id) if !id.is_empty() => Some(ProductId::new(id.clone())),
        Value::Object(obj) => {
            string_field(obj, &["productId", "product_id", "id", "_id"]).map(ProductId::new)
        }
        _ => None,
    }
}
