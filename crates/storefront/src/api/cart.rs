//! Cart endpoints.
//!
//! Mutation endpoints echo the updated cart record in their response, so
//! they hand the raw payload back to the caller; the cart service decides
//! whether that payload is usable or a follow-up fetch is needed.

use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use copperleaf_core::{CartItem, ProductId};

use super::{ApiClient, ApiError};
use crate::cart::AddToCartSpec;
use crate::normalize::normalize_cart_items;

impl ApiClient {
    /// Fetch the server-side cart as normalized line items.
    ///
    /// Infallible at the shape level: unusable payloads come back as an
    /// empty cart.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or 401.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Result<Vec<CartItem>, ApiError> {
        let payload = self.get_value("/api/cart").await?;
        Ok(normalize_cart_items(&payload))
    }

    /// Add a line to the server-side cart.
    ///
    /// Returns the response payload — the updated cart record on current
    /// backends, `Value::Null` when the endpoint answers with an empty
    /// body.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, 401, or a rejected payload.
    #[instrument(skip(self, spec), fields(product_id = %spec.product_id))]
    pub async fn add_cart_item(&self, spec: &AddToCartSpec) -> Result<Value, ApiError> {
        let body = serde_json::to_value(spec)?;
        self.send(Method::POST, "/api/cart/items", Some(&body)).await
    }

    /// Set the quantity of an existing cart line.
    ///
    /// Returns the response payload, as for [`Self::add_cart_item`].
    ///
    /// # Errors
    ///
    /// Fails on transport errors, 401, or when the line does not exist.
    #[instrument(skip(self))]
    pub async fn update_cart_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Value, ApiError> {
        let path = format!("/api/cart/items/{product_id}");
        let body = serde_json::json!({ "quantity": quantity });
        self.send(Method::PUT, &path, Some(&body)).await
    }

    /// Remove a line from the server-side cart.
    ///
    /// Returns the response payload, as for [`Self::add_cart_item`].
    ///
    /// # Errors
    ///
    /// Fails on transport errors, 401, or when the line does not exist.
    #[instrument(skip(self))]
    pub async fn remove_cart_item(&self, product_id: &ProductId) -> Result<Value, ApiError> {
        let path = format!("/api/cart/items/{product_id}");
        self.send(Method::DELETE, &path, None).await
    }
}
