//! Review normalization.

use chrono::Utc;
use serde_json::{Map, Value};

use copperleaf_core::{ProductId, Review, ReviewId};

use super::{extract_records, string_field, u32_field};

const LIST_KEYS: &[&str] = &["reviews", "data"];

const ID_KEYS: &[&str] = &["id", "_id", "reviewId"];
const AUTHOR_KEYS: &[&str] = &["author", "userName", "name"];
const RATING_KEYS: &[&str] = &["rating", "stars", "score"];
const COMMENT_KEYS: &[&str] = &["comment", "text", "review", "body"];
const CREATED_KEYS: &[&str] = &["createdAt", "created_at", "date"];

/// Highest star rating the UI can render.
const MAX_RATING: u32 = 5;

/// Normalize a review-list payload for one product.
///
/// The raw records often omit the product reference (it is implicit in the
/// request URL), so the caller supplies it.
#[must_use]
pub fn normalize_reviews(payload: &Value, product_id: &ProductId) -> Vec<Review> {
    extract_records(payload, LIST_KEYS)
        .iter()
        .map(|raw| normalize_review(raw, product_id))
        .collect()
}

fn normalize_review(raw: &Value, product_id: &ProductId) -> Review {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);
    // Some versions nest the author: {user: {name: ...}}.
    let user = obj.get("user").and_then(Value::as_object);

    Review {
        id: string_field(obj, ID_KEYS).map_or_else(ReviewId::synthesize, ReviewId::new),
        product_id: string_field(obj, &["productId", "product_id"])
            .map_or_else(|| product_id.clone(), ProductId::new),
        author: string_field(obj, AUTHOR_KEYS)
            .or_else(|| user.and_then(|u| string_field(u, &["name", "userName"])))
            .unwrap_or_else(|| "Anonymous".to_string()),
        rating: u32_field(obj, RATING_KEYS).unwrap_or(0).min(MAX_RATING),
        comment: string_field(obj, COMMENT_KEYS).unwrap_or_default(),
        created_at: super::datetime_field(obj, CREATED_KEYS).unwrap_or_else(Utc::now),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelopes_normalize_identically() {
        let record = json!({"id": "r-1", "author": "Ada", "rating": 4,
                            "comment": "Lovely", "createdAt": "2025-01-02T00:00:00Z"});
        let product = ProductId::new("p-1");
        let a = normalize_reviews(&json!([record]), &product);
        let b = normalize_reviews(&json!({"reviews": [record]}), &product);
        let c = normalize_reviews(&json!({"data": [record]}), &product);
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a[0].product_id, product);
    }

    #[test]
    fn rating_is_coerced_and_clamped() {
        let product = ProductId::new("p-1");
        let reviews = normalize_reviews(
            &json!([{"rating": "4"}, {"rating": 11}, {"comment": "no stars"}]),
            &product,
        );
        assert_eq!(reviews[0].rating, 4);
        assert_eq!(reviews[1].rating, 5);
        assert_eq!(reviews[2].rating, 0);
        assert_eq!(reviews[2].author, "Anonymous");
    }

    #[test]
    fn nested_user_object_supplies_author() {
        let reviews = normalize_reviews(
            &json!([{"user": {"name": "Grace"}, "text": "Fits well"}]),
            &ProductId::new("p-1"),
        );
        assert_eq!(reviews[0].author, "Grace");
        assert_eq!(reviews[0].comment, "Fits well");
    }
}
