//! Product review endpoints.

use reqwest::Method;
use tracing::instrument;

use copperleaf_core::{ProductId, Review};

use super::{ApiClient, ApiError};
use crate::normalize::normalize_reviews;

impl ApiClient {
    /// Fetch the reviews for a product.
    ///
    /// # Errors
    ///
    /// Fails on transport errors. Unusable payloads come back as an empty
    /// list.
    #[instrument(skip(self))]
    pub async fn fetch_reviews(&self, product_id: &ProductId) -> Result<Vec<Review>, ApiError> {
        let path = format!("/api/products/{product_id}/reviews");
        let payload = self.get_value(&path).await?;
        Ok(normalize_reviews(&payload, product_id))
    }

    /// Submit a review for a product.
    ///
    /// Ratings outside `0..=5` are clamped by normalization on the way back
    /// out, so the raw value is sent as-is.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, 401, or a rejected payload.
    #[instrument(skip(self, comment))]
    pub async fn submit_review(
        &self,
        product_id: &ProductId,
        rating: u32,
        comment: &str,
    ) -> Result<(), ApiError> {
        let path = format!("/api/products/{product_id}/reviews");
        let body = serde_json::json!({ "rating": rating, "comment": comment });
        self.send(Method::POST, &path, Some(&body)).await?;
        Ok(())
    }
}
