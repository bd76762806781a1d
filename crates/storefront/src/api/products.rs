//! Catalog endpoints.
//!
//! Related-product lookups are read-heavy and change rarely, so they sit
//! behind the client's `moka` cache (TTL and capacity from configuration).

use tracing::{debug, instrument};

use copperleaf_core::{ProductId, RelatedProduct};

use super::{ApiClient, ApiError};
use crate::normalize::normalize_related_products;

impl ApiClient {
    /// Fetch the related products for a product, served from cache when
    /// fresh.
    ///
    /// # Errors
    ///
    /// Fails on transport errors. Unusable payloads come back as an empty
    /// list (and are cached as such until the TTL expires).
    #[instrument(skip(self))]
    pub async fn fetch_related_products(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<RelatedProduct>, ApiError> {
        let key = product_id.as_str().to_string();
        if let Some(hit) = self.related_cache().get(&key).await {
            debug!(%product_id, "related products served from cache");
            return Ok(hit);
        }

        let path = format!("/api/products/{product_id}/related");
        let payload = self.get_value(&path).await?;
        let related = normalize_related_products(&payload);
        self.related_cache().insert(key, related.clone()).await;
        Ok(related)
    }

    /// Drop a product's cached related list, forcing the next lookup to hit
    /// the backend.
    pub async fn invalidate_related_products(&self, product_id: &ProductId) {
        self.related_cache()
            .invalidate(&product_id.as_str().to_string())
            .await;
    }
}
