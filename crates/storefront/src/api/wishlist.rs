//! Wishlist endpoints.

use std::collections::BTreeSet;

use reqwest::Method;
use tracing::instrument;

use copperleaf_core::ProductId;

use super::{ApiClient, ApiError};
use crate::normalize::normalize_wishlist;

impl ApiClient {
    /// Fetch the authenticated user's wishlist as a set of product ids.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or 401.
    #[instrument(skip(self))]
    pub async fn fetch_wishlist(&self) -> Result<BTreeSet<ProductId>, ApiError> {
        let payload = self.get_value("/api/wishlist").await?;
        Ok(normalize_wishlist(&payload))
    }

    /// Add a product to the wishlist. Adding a product that is already
    /// present is a no-op server-side.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or 401.
    #[instrument(skip(self))]
    pub async fn add_to_wishlist(&self, product_id: &ProductId) -> Result<(), ApiError> {
        let path = format!("/api/wishlist/{product_id}");
        self.send(Method::POST, &path, None).await?;
        Ok(())
    }

    /// Remove a product from the wishlist.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or 401.
    #[instrument(skip(self))]
    pub async fn remove_from_wishlist(&self, product_id: &ProductId) -> Result<(), ApiError> {
        let path = format!("/api/wishlist/{product_id}");
        self.send(Method::DELETE, &path, None).await?;
        Ok(())
    }
}
