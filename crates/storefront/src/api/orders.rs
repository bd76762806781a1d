//! Order endpoints, customer-facing and admin.

use reqwest::Method;
use tracing::instrument;

use copperleaf_core::{Order, OrderId, OrderStatus};

use serde_json::Value;

use super::{ApiClient, ApiError};
use crate::normalize::{normalize_order, normalize_orders, unwrap_record};

const ORDER_ENVELOPE_KEYS: &[&str] = &["order", "data"];

/// Single-order endpoints may wrap the record in an envelope; peel it before
/// normalizing.
fn unwrap_order(payload: &Value) -> Order {
    match unwrap_record(payload, ORDER_ENVELOPE_KEYS) {
        Some(map) => normalize_order(&Value::Object(map.clone())),
        None => normalize_order(payload),
    }
}

impl ApiClient {
    /// Fetch the authenticated customer's order history, newest first as
    /// returned by the backend.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or 401. Unusable payloads come back as an
    /// empty list, not an error.
    #[instrument(skip(self))]
    pub async fn fetch_my_orders(&self) -> Result<Vec<Order>, ApiError> {
        let payload = self.get_value("/api/orders/my").await?;
        Ok(normalize_orders(&payload))
    }

    /// Fetch a single order by id.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, 401, or 404.
    #[instrument(skip(self))]
    pub async fn fetch_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let path = format!("/api/orders/{id}");
        let payload = self.get_value(&path).await?;
        Ok(unwrap_order(&payload))
    }

    /// Fetch every order (admin only).
    ///
    /// # Errors
    ///
    /// Fails on transport errors, 401, or 403 for non-admin sessions.
    #[instrument(skip(self))]
    pub async fn fetch_all_orders(&self) -> Result<Vec<Order>, ApiError> {
        let payload = self.get_value("/api/admin/orders").await?;
        Ok(normalize_orders(&payload))
    }

    /// Set an order's fulfillment status (admin only) and return the saved
    /// record.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, 401, 403, or 404.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let path = format!("/api/admin/orders/{id}/status");
        let body = serde_json::json!({ "status": status });
        let payload = self.send(Method::PUT, &path, Some(&body)).await?;
        Ok(unwrap_order(&payload))
    }
}
