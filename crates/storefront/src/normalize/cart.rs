//! Cart item normalization.
//!
//! Cart responses arrive either as a cart record with an `items` array, the
//! same record nested under `cart`, or (from the oldest mutation endpoints)
//! a bare item array.

use serde_json::{Map, Value};

use copperleaf_core::{CartItem, ProductId, ProductSnapshot};

use super::{decimal_field, extract_records, string_field, u32_field};

const ITEM_LIST_KEYS: &[&str] = &["items", "cartItems", "data"];

const PRODUCT_ID_KEYS: &[&str] = &["productId", "product_id", "id"];
const QUANTITY_KEYS: &[&str] = &["quantity", "qty", "count"];
const PRICE_KEYS: &[&str] = &["price", "unitPrice"];
const ORIGINAL_PRICE_KEYS: &[&str] = &["originalPrice", "compareAtPrice", "listPrice"];

const SNAPSHOT_NAME_KEYS: &[&str] = &["name", "title"];
const SNAPSHOT_IMAGE_KEYS: &[&str] = &["image", "imageUrl", "thumbnail"];

/// Normalize a cart payload into its item list.
///
/// Aggregates (`totalItems`/`totalPrice`) are deliberately *not* read from
/// the response; the cart service re-derives them locally so the published
/// invariants always hold over the item list actually shown.
#[must_use]
pub fn normalize_cart_items(payload: &Value) -> Vec<CartItem> {
    // `{cart: {...}}` envelope first; the inner record is then treated
    // exactly like a top-level one.
    let root = payload
        .get("cart")
        .filter(|v| v.is_object())
        .unwrap_or(payload);

    extract_records(root, ITEM_LIST_KEYS)
        .iter()
        .map(normalize_cart_item)
        .collect()
}

fn normalize_cart_item(raw: &Value) -> CartItem {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);
    let product = obj.get("product").and_then(Value::as_object);

    CartItem {
        product_id: resolve_product_id(obj, product),
        color: string_field(obj, &["color"]).unwrap_or_default(),
        size: string_field(obj, &["size"]).unwrap_or_default(),
        quantity: u32_field(obj, QUANTITY_KEYS).unwrap_or(1),
        // Locked price stays None when absent so the resolution ladder can
        // fall through to the product snapshot.
        price: decimal_field(obj, PRICE_KEYS),
        original_price: decimal_field(obj, ORIGINAL_PRICE_KEYS),
        product: product.map(normalize_snapshot),
    }
}

/// The product reference is a plain id string, or a nested product object,
/// depending on backend version.
fn resolve_product_id(
    obj: &Map<String, Value>,
    product: Option<&Map<String, Value>>,
) -> ProductId {
    string_field(obj, PRODUCT_ID_KEYS)
        .or_else(|| product.and_then(|p| string_field(p, &["id", "_id"])))
        .map_or_else(ProductId::synthesize, ProductId::new)
}

fn normalize_snapshot(product: &Map<String, Value>) -> ProductSnapshot {
    ProductSnapshot {
        name: string_field(product, SNAPSHOT_NAME_KEYS).unwrap_or_default(),
        image: string_field(product, SNAPSHOT_IMAGE_KEYS).unwrap_or_default(),
        sale_price: decimal_field(product, &["salePrice", "sale_price"]),
        base_price: decimal_field(product, &["basePrice", "base_price"]),
        price: decimal_field(product, &["price"]),
    }
}
