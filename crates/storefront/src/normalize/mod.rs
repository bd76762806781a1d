//! Response normalization: arbitrary JSON payloads -> canonical records.
//!
//! The backend has shipped several response envelopes over its lifetime and
//! sibling endpoints still disagree on field names. Rather than chase every
//! backend release, this module reconciles shapes with two deliberate
//! heuristics:
//!
//! 1. **List extraction** ([`extract_records`]): try, in order, the payload
//!    itself as an array; a known nested key; the first non-empty
//!    array-valued property; otherwise the empty list. First match wins.
//! 2. **Field lookup**: each canonical field tries an explicit priority list
//!    of alternate key names (module-level constants in the entity modules),
//!    then coerces and defaults.
//!
//! Normalization never fails and never panics. A fundamentally unusable
//! payload degrades to the empty list; any upstream-visible error flag is set
//! by the caller, not here. The one exception is single-record user
//! normalization, which reports [`ShapeError`] so the auth flow can fall back
//! to the cached session.

pub mod cart;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod user;
pub mod wishlist;

pub use cart::normalize_cart_items;
pub use orders::{normalize_order, normalize_orders};
pub use products::normalize_related_products;
pub use reviews::normalize_reviews;
pub use user::normalize_user;
pub use wishlist::normalize_wishlist;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// A payload carried no recognizable record for the requested entity.
///
/// Only single-record normalization reports this; list normalization
/// degrades to the empty list instead.
#[derive(Debug, Clone, Error)]
#[error("payload does not contain a recognizable {entity} record")]
pub struct ShapeError {
    pub entity: &'static str,
}

/// Extract the record list from a payload of unknown shape.
///
/// Fallback order (first match wins):
/// 1. the payload itself is an array;
/// 2. one of `known_keys` holds an array (even an empty one - an explicit
///    empty list from the backend means "no records", not "wrong shape");
/// 3. the first own property holding a non-empty array, in object order;
/// 4. the empty list.
///
/// Step 3 is a last-resort heuristic for backend drift; when two sibling
/// array properties exist, whichever comes first in the payload wins. That
/// ambiguity is accepted and logged at `debug` level.
#[must_use]
pub fn extract_records(payload: &Value, known_keys: &[&str]) -> Vec<Value> {
    if let Some(records) = payload.as_array() {
        return records.clone();
    }

    let Some(obj) = payload.as_object() else {
        return Vec::new();
    };

    for key in known_keys {
        if let Some(records) = obj.get(*key).and_then(Value::as_array) {
            return records.clone();
        }
    }

    for (key, value) in obj {
        if let Some(records) = value.as_array() {
            if !records.is_empty() {
                debug!(property = %key, "extracted records from unrecognized envelope");
                return records.clone();
            }
        }
    }

    Vec::new()
}

/// Unwrap single-record envelopes like `{user: {...}}` or `{data: {...}}`.
///
/// Returns the first object found under `known_keys`, or the payload itself
/// when it already is an object.
#[must_use]
pub fn unwrap_record<'a>(payload: &'a Value, known_keys: &[&str]) -> Option<&'a Map<String, Value>> {
    if let Some(obj) = payload.as_object() {
        for key in known_keys {
            if let Some(inner) = obj.get(*key).and_then(Value::as_object) {
                return Some(inner);
            }
        }
        return Some(obj);
    }
    None
}

// =============================================================================
// Field coercion helpers
// =============================================================================

/// First non-empty string under any of `keys`.
#[must_use]
pub fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = obj.get(*key).and_then(Value::as_str) {
            if !s.is_empty() {
                return Some(s.to_string());
            }
        }
    }
    None
}

/// First value under any of `keys` that coerces to a `Decimal`.
///
/// JSON numbers coerce via their literal representation (no float
/// round-tripping); numeric strings are trimmed and parsed. `"29.99"` and
/// `29.99` both yield `29.99`.
#[must_use]
pub fn decimal_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<Decimal> {
    keys.iter().find_map(|key| coerce_decimal(obj.get(*key)?))
}

/// Coerce a single JSON value to a `Decimal`.
#[must_use]
pub fn coerce_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First value under any of `keys` that coerces to a non-negative integer.
#[must_use]
pub fn u32_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<u32> {
    keys.iter().find_map(|key| coerce_u32(obj.get(*key)?))
}

fn coerce_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `true` when any of `keys` holds boolean `true` (the backend never sends
/// truthy strings for flags).
#[must_use]
pub fn bool_field(obj: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter()
        .any(|key| obj.get(*key).and_then(Value::as_bool) == Some(true))
}

/// First value under any of `keys` that parses as a timestamp.
///
/// Accepts RFC 3339 strings and integer epochs (seconds, or milliseconds
/// when the magnitude says so).
#[must_use]
pub fn datetime_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<DateTime<Utc>> {
    keys.iter().find_map(|key| coerce_datetime(obj.get(*key)?))
}

fn coerce_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => {
            let epoch = n.as_i64()?;
            // Millisecond epochs passed 10^12 back in 2001; second epochs
            // won't reach it for another 29,000 years.
            if epoch.abs() >= 1_000_000_000_000 {
                Utc.timestamp_millis_opt(epoch).single()
            } else {
                Utc.timestamp_opt(epoch, 0).single()
            }
        }
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_accepts_bare_array() {
        let payload = json!([{"id": 1}, {"id": 2}]);
        assert_eq!(extract_records(&payload, &["orders"]).len(), 2);
    }

    #[test]
    fn extract_prefers_known_keys_in_order() {
        let payload = json!({"data": [{"id": "d"}], "orders": [{"id": "o"}]});
        let records = extract_records(&payload, &["orders", "data"]);
        assert_eq!(records[0]["id"], "o");
    }

    #[test]
    fn known_key_with_empty_array_means_no_records() {
        // An explicit empty list must not fall through to the property scan.
        let payload = json!({"orders": [], "unrelated": [{"id": "x"}]});
        assert!(extract_records(&payload, &["orders"]).is_empty());
    }

    #[test]
    fn extract_scans_for_first_nonempty_array_property() {
        let payload = json!({"count": 1, "results": [{"id": "r"}]});
        let records = extract_records(&payload, &["orders", "data"]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], "r");
    }

    #[test]
    fn extract_degrades_to_empty_on_unusable_payload() {
        assert!(extract_records(&json!("nonsense"), &["orders"]).is_empty());
        assert!(extract_records(&json!(null), &["orders"]).is_empty());
        assert!(extract_records(&json!({"total": 3}), &["orders"]).is_empty());
    }

    #[test]
    fn unwrap_record_handles_envelopes_and_bare_objects() {
        let wrapped = json!({"user": {"email": "a@b.c"}});
        assert!(unwrap_record(&wrapped, &["user", "data"]).unwrap().contains_key("email"));

        let bare = json!({"email": "a@b.c"});
        assert!(unwrap_record(&bare, &["user", "data"]).unwrap().contains_key("email"));

        assert!(unwrap_record(&json!([1, 2]), &["user"]).is_none());
    }

    #[test]
    fn decimal_coercion_accepts_numbers_and_numeric_strings() {
        let obj = json!({"price": "29.99"});
        let obj = obj.as_object().unwrap();
        assert_eq!(decimal_field(obj, &["price"]), Some("29.99".parse().unwrap()));

        let obj = json!({"price": 29.99});
        let obj = obj.as_object().unwrap();
        assert_eq!(decimal_field(obj, &["price"]), Some("29.99".parse().unwrap()));
    }

    #[test]
    fn decimal_coercion_skips_unparseable_and_tries_next_key() {
        let obj = json!({"price": "free", "amount": 5});
        let obj = obj.as_object().unwrap();
        assert_eq!(decimal_field(obj, &["price", "amount"]), Some(Decimal::from(5)));
    }

    #[test]
    fn u32_coercion_rejects_negatives() {
        let obj = json!({"quantity": -2});
        let obj = obj.as_object().unwrap();
        assert_eq!(u32_field(obj, &["quantity"]), None);
    }

    #[test]
    fn datetime_accepts_rfc3339_and_epochs() {
        let obj = json!({
            "createdAt": "2025-03-01T12:00:00Z",
            "placedAt": 1_740_830_400i64,
            "updatedAt": 1_740_830_400_000i64
        });
        let obj = obj.as_object().unwrap();
        let rfc = datetime_field(obj, &["createdAt"]).unwrap();
        let secs = datetime_field(obj, &["placedAt"]).unwrap();
        let millis = datetime_field(obj, &["updatedAt"]).unwrap();
        assert_eq!(rfc.timestamp(), 1_740_830_400);
        assert_eq!(secs, millis);
    }

    #[test]
    fn bool_field_ignores_truthy_strings() {
        let obj = json!({"isAdmin": "true"});
        let obj = obj.as_object().unwrap();
        assert!(!bool_field(obj, &["isAdmin"]));
    }
}
