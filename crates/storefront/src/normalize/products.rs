//! Related-product normalization.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use copperleaf_core::{
    ProductId, RelatedProduct, PLACEHOLDER_IMAGE_URL, PLACEHOLDER_PRODUCT_NAME,
};

use super::{decimal_field, extract_records, string_field};

const LIST_KEYS: &[&str] = &["products", "relatedProducts", "related", "data"];

const ID_KEYS: &[&str] = &["id", "_id", "productId"];
const NAME_KEYS: &[&str] = &["name", "title"];
const IMAGE_KEYS: &[&str] = &["image", "imageUrl", "thumbnail"];
const PRICE_KEYS: &[&str] = &["price", "basePrice"];
const SALE_PRICE_KEYS: &[&str] = &["salePrice", "sale_price", "discountPrice"];

/// Normalize a related-products payload of any known shape.
#[must_use]
pub fn normalize_related_products(payload: &Value) -> Vec<RelatedProduct> {
    extract_records(payload, LIST_KEYS)
        .iter()
        .map(normalize_related_product)
        .collect()
}

fn normalize_related_product(raw: &Value) -> RelatedProduct {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    RelatedProduct {
        id: string_field(obj, ID_KEYS).map_or_else(ProductId::synthesize, ProductId::new),
        name: string_field(obj, NAME_KEYS)
            .unwrap_or_else(|| PLACEHOLDER_PRODUCT_NAME.to_string()),
        image: string_field(obj, IMAGE_KEYS)
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
        price: decimal_field(obj, PRICE_KEYS).unwrap_or(Decimal::ZERO),
        sale_price: decimal_field(obj, SALE_PRICE_KEYS),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelopes_normalize_identically() {
        let record = json!({"id": "p-1", "title": "Linen Shirt", "price": "49.50",
                            "image": "https://cdn.example.com/shirt.jpg"});
        let a = normalize_related_products(&json!([record]));
        let b = normalize_related_products(&json!({"products": [record]}));
        let c = normalize_related_products(&json!({"relatedProducts": [record]}));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a[0].name, "Linen Shirt");
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let products = normalize_related_products(&json!([{}]));
        assert_eq!(products[0].name, PLACEHOLDER_PRODUCT_NAME);
        assert_eq!(products[0].image, PLACEHOLDER_IMAGE_URL);
        assert_eq!(products[0].price, Decimal::ZERO);
        assert_eq!(products[0].sale_price, None);
    }

    #[test]
    fn display_price_prefers_sale_price() {
        let products = normalize_related_products(&json!([
            {"id": "p-1", "price": "30.00", "salePrice": "19.99"}
        ]));
        assert_eq!(products[0].display_price(), "19.99".parse().unwrap());
    }
}
