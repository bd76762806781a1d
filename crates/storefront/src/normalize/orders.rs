//! Order normalization.
//!
//! Order payloads are the worst offenders for shape drift: the admin and
//! customer endpoints return different envelopes, and line items have been
//! flat objects, `{product: {...}}` nests, or both. Every canonical field
//! lists its alternate keys below so the tolerated shapes are visible (and
//! tested) in one place.

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use copperleaf_core::{
    Address, Order, OrderCustomer, OrderId, OrderItem, OrderStatus, PLACEHOLDER_IMAGE_URL,
    PLACEHOLDER_PRODUCT_NAME,
};

use super::{datetime_field, decimal_field, extract_records, string_field, u32_field};

const LIST_KEYS: &[&str] = &["orders", "data"];

const ID_KEYS: &[&str] = &["id", "_id", "orderId"];
const ORDER_NUMBER_KEYS: &[&str] = &["orderNumber", "order_number", "number"];
const STATUS_KEYS: &[&str] = &["status", "orderStatus", "state"];
const CREATED_KEYS: &[&str] = &["createdAt", "created_at", "placedAt", "date"];
const ITEM_LIST_KEYS: &[&str] = &["items", "orderItems", "lineItems", "products"];
const SUBTOTAL_KEYS: &[&str] = &["subtotal", "sub_total", "itemsTotal"];
const SHIPPING_KEYS: &[&str] = &["shippingCost", "shipping", "shippingFee"];
const TAX_KEYS: &[&str] = &["tax", "taxAmount"];
const TOTAL_KEYS: &[&str] = &["total", "totalAmount", "grandTotal"];
const CUSTOMER_KEYS: &[&str] = &["customer", "user", "buyer"];
const SHIPPING_ADDRESS_KEYS: &[&str] = &["shippingAddress", "shipping_address", "address"];

const ITEM_ID_KEYS: &[&str] = &["id", "_id", "productId"];
const ITEM_QUANTITY_KEYS: &[&str] = &["quantity", "qty", "count"];
const ITEM_PRICE_KEYS: &[&str] = &["price", "unitPrice", "amount"];
const ITEM_NAME_KEYS: &[&str] = &["name", "title", "productName"];
const ITEM_IMAGE_KEYS: &[&str] = &["image", "imageUrl", "thumbnail"];

const STREET_KEYS: &[&str] = &["street", "address1", "line1"];
const CITY_KEYS: &[&str] = &["city", "town"];
const STATE_KEYS: &[&str] = &["state", "province", "region"];
const ZIP_KEYS: &[&str] = &["zipCode", "zip_code", "zip", "postalCode"];
const COUNTRY_KEYS: &[&str] = &["country", "countryCode"];

/// Normalize an order-list payload of any known shape.
#[must_use]
pub fn normalize_orders(payload: &Value) -> Vec<Order> {
    extract_records(payload, LIST_KEYS)
        .iter()
        .map(normalize_order)
        .collect()
}

/// Normalize a single raw order. Never fails: missing fields get defaults,
/// a missing identifier is synthesized.
#[must_use]
pub fn normalize_order(raw: &Value) -> Order {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    let id = string_field(obj, ID_KEYS).map_or_else(OrderId::synthesize, OrderId::new);
    let order_number = string_field(obj, ORDER_NUMBER_KEYS)
        .unwrap_or_else(|| synthesize_order_number(&id));
    let status = string_field(obj, STATUS_KEYS)
        .and_then(|s| OrderStatus::parse_lenient(&s))
        .unwrap_or_default();
    let created_at = datetime_field(obj, CREATED_KEYS).unwrap_or_else(Utc::now);

    let items = ITEM_LIST_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_array))
        .map(|records| records.iter().map(normalize_order_item).collect())
        .unwrap_or_default();

    Order {
        id,
        order_number,
        status,
        created_at,
        items,
        subtotal: decimal_field(obj, SUBTOTAL_KEYS).unwrap_or(Decimal::ZERO),
        shipping_cost: decimal_field(obj, SHIPPING_KEYS).unwrap_or(Decimal::ZERO),
        tax: decimal_field(obj, TAX_KEYS).unwrap_or(Decimal::ZERO),
        total: decimal_field(obj, TOTAL_KEYS).unwrap_or(Decimal::ZERO),
        customer: normalize_customer(obj),
        shipping_address: normalize_address(obj),
    }
}

fn synthesize_order_number(id: &OrderId) -> String {
    // Last 8 characters keep the number short enough for badges while still
    // correlating with the synthesized id.
    let tail: String = id
        .as_str()
        .chars()
        .rev()
        .take(8)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("ORD-{}", tail.to_uppercase())
}

fn normalize_order_item(raw: &Value) -> OrderItem {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);
    // Many backend versions nest a product snapshot; use it as a fallback
    // source for display fields and the id.
    let product = obj.get("product").and_then(Value::as_object);

    let id = string_field(obj, ITEM_ID_KEYS)
        .or_else(|| product.and_then(|p| string_field(p, &["id", "_id"])))
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let name = string_field(obj, ITEM_NAME_KEYS)
        .or_else(|| product.and_then(|p| string_field(p, ITEM_NAME_KEYS)))
        .unwrap_or_else(|| PLACEHOLDER_PRODUCT_NAME.to_string());
    let image = string_field(obj, ITEM_IMAGE_KEYS)
        .or_else(|| product.and_then(|p| string_field(p, ITEM_IMAGE_KEYS)))
        .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string());
    let price = decimal_field(obj, ITEM_PRICE_KEYS)
        .or_else(|| product.and_then(|p| decimal_field(p, ITEM_PRICE_KEYS)))
        .unwrap_or(Decimal::ZERO);

    OrderItem {
        id,
        quantity: u32_field(obj, ITEM_QUANTITY_KEYS).unwrap_or(1),
        price,
        name,
        image,
        color: string_field(obj, &["color"]).unwrap_or_default(),
        size: string_field(obj, &["size"]).unwrap_or_default(),
    }
}

fn normalize_customer(obj: &Map<String, Value>) -> OrderCustomer {
    let Some(customer) = CUSTOMER_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_object))
    else {
        return OrderCustomer::default();
    };
    OrderCustomer {
        name: string_field(customer, &["name", "fullName", "userName"]).unwrap_or_default(),
        email: string_field(customer, &["email"]).unwrap_or_default(),
    }
}

pub(super) fn normalize_address(obj: &Map<String, Value>) -> Address {
    let Some(address) = SHIPPING_ADDRESS_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_object))
    else {
        return Address::default();
    };
    Address {
        street: string_field(address, STREET_KEYS).unwrap_or_default(),
        city: string_field(address, CITY_KEYS).unwrap_or_default(),
        state: string_field(address, STATE_KEYS).unwrap_or_default(),
        zip_code: string_field(address, ZIP_KEYS).unwrap_or_default(),
        country: string_field(address, COUNTRY_KEYS).unwrap_or_default(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_record() -> Value {
        json!({
            "id": "o-1",
            "orderNumber": "ORD-1001",
            "status": "shipped",
            "createdAt": "2025-03-01T12:00:00Z",
            "items": [
                {"id": "l-1", "name": "Linen Shirt", "price": "49.50", "quantity": 2,
                 "image": "https://cdn.example.com/shirt.jpg", "color": "White", "size": "M"}
            ],
            "subtotal": "99.00",
            "shippingCost": 5,
            "tax": "8.17",
            "total": "112.17",
            "customer": {"name": "Ada Lovelace", "email": "ada@example.com"},
            "shippingAddress": {"street": "1 Elm St", "city": "Portland",
                                "state": "OR", "zipCode": "97201", "country": "US"}
        })
    }

    #[test]
    fn three_envelopes_normalize_identically() {
        let record = sample_record();
        let bare = json!([record]);
        let keyed = json!({"orders": [record]});
        let data = json!({"data": [record]});

        let a = normalize_orders(&bare);
        let b = normalize_orders(&keyed);
        let c = normalize_orders(&data);
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.len(), 1);
        assert_eq!(a[0].order_number, "ORD-1001");
        assert_eq!(a[0].status, OrderStatus::Shipped);
    }

    #[test]
    fn missing_fields_get_defaults_never_holes() {
        let order = normalize_order(&json!({
            "items": [{"price": "29.99", "quantity": "2"}]
        }));

        assert_eq!(order.status, OrderStatus::Processing);
        assert!(!order.id.as_str().is_empty());
        assert!(order.order_number.starts_with("ORD-"));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].price, "29.99".parse::<Decimal>().unwrap());
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[0].name, PLACEHOLDER_PRODUCT_NAME);
        assert_eq!(order.items[0].image, PLACEHOLDER_IMAGE_URL);
        assert_eq!(order.subtotal, Decimal::ZERO);
        assert_eq!(order.total, Decimal::ZERO);
    }

    #[test]
    fn item_quantity_defaults_to_one_and_price_to_zero() {
        let order = normalize_order(&json!({"id": "o-2", "items": [{}]}));
        assert_eq!(order.items[0].quantity, 1);
        assert_eq!(order.items[0].price, Decimal::ZERO);
    }

    #[test]
    fn item_falls_back_to_nested_product_snapshot() {
        let order = normalize_order(&json!({
            "id": "o-3",
            "items": [{"quantity": 1, "product": {
                "_id": "p-9", "title": "Wool Scarf", "price": 19.99,
                "image": "https://cdn.example.com/scarf.jpg"
            }}]
        }));
        let item = &order.items[0];
        assert_eq!(item.id, "p-9");
        assert_eq!(item.name, "Wool Scarf");
        assert_eq!(item.image, "https://cdn.example.com/scarf.jpg");
        assert_eq!(item.price, "19.99".parse::<Decimal>().unwrap());
    }

    #[test]
    fn alternate_keys_are_honored() {
        let order = normalize_order(&json!({
            "_id": "abc123",
            "order_number": "ORD-7",
            "orderStatus": "DELIVERED",
            "placedAt": "2024-11-05T08:30:00+00:00",
            "lineItems": [],
            "grandTotal": "12.00",
            "user": {"name": "Grace Hopper", "email": "grace@example.com"},
            "address": {"line1": "2 Oak Ave", "town": "Salem", "province": "OR",
                        "postalCode": "97301", "countryCode": "US"}
        }));
        assert_eq!(order.id, OrderId::new("abc123"));
        assert_eq!(order.order_number, "ORD-7");
        assert_eq!(order.status, OrderStatus::Delivered);
        assert_eq!(order.total, "12.00".parse::<Decimal>().unwrap());
        assert_eq!(order.customer.name, "Grace Hopper");
        assert_eq!(order.shipping_address.city, "Salem");
        assert_eq!(order.shipping_address.zip_code, "97301");
    }

    #[test]
    fn normalizing_a_canonical_order_is_identity() {
        let canonical = normalize_order(&sample_record());
        let reserialized = serde_json::to_value(&canonical).unwrap();
        assert_eq!(normalize_order(&reserialized), canonical);
    }

    #[test]
    fn unusable_payload_degrades_to_empty_list() {
        assert!(normalize_orders(&json!(42)).is_empty());
        assert!(normalize_orders(&json!({"message": "no orders"})).is_empty());
    }
}
