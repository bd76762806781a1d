//! Cart synchronization service.
//!
//! The server-side cart is the source of truth for *contents*; this layer
//! is the source of truth for *aggregates*. Every path that changes the
//! cart ends in the same place: fetch the raw cart, normalize the lines,
//! re-derive `total_items`/`total_price` locally via the price-lock ladder,
//! publish the whole snapshot through the store. Backend-provided totals
//! are never trusted (they have disagreed with the line items in the past).
//!
//! Mutations publish straight from the mutation response: the endpoints
//! echo the updated cart record, so the new snapshot goes out as soon as
//! the backend confirms, with no second round-trip. Only an empty response
//! body forces a follow-up fetch. A failed mutation publishes nothing, so
//! the previous snapshot stays intact. Overlapping refreshes are fenced
//! with a [`GenerationCounter`] so a slow response cannot overwrite a
//! newer one.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use copperleaf_core::{Cart, ProductId};

use crate::api::{ApiClient, ApiError};
use crate::error::{AppError, Result};
use crate::generation::GenerationCounter;
use crate::normalize::normalize_cart_items;
use crate::store::{Action, AppStore};

/// What goes in an add-to-cart request.
///
/// `price` is the price the shopper saw when they added the item. When set,
/// the backend records it against the line and it wins over catalog prices
/// on every later read (the price lock); a later catalog sale does not
/// change a line already in the cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartSpec {
    pub product_id: ProductId,
    pub color: String,
    pub size: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

/// Synchronizes the server-side cart with the published [`AppStore`] state.
#[derive(Clone)]
pub struct CartService {
    api: ApiClient,
    store: AppStore,
    refresh_gen: GenerationCounter,
}

impl CartService {
    #[must_use]
    pub fn new(api: ApiClient, store: AppStore) -> Self {
        Self {
            api,
            store,
            refresh_gen: GenerationCounter::new(),
        }
    }

    /// Fetch the cart, re-derive aggregates, publish.
    ///
    /// Safe to call concurrently: each call stamps a generation, and only
    /// the newest outstanding refresh publishes. A stale response is
    /// silently dropped.
    ///
    /// # Errors
    ///
    /// Fails on backend errors. An auth failure also signs the user out.
    #[instrument(skip_all)]
    pub async fn refresh(&self) -> Result<Cart> {
        let generation = self.refresh_gen.begin();
        let items = match self.api.fetch_cart().await {
            Ok(items) => items,
            Err(e) => return Err(self.map_api_error(e)),
        };
        let cart = Cart::from_items(items);

        if generation.is_current() {
            self.store.dispatch(Action::CartReplaced(cart.clone()));
        } else {
            debug!("discarding stale cart refresh");
        }
        Ok(cart)
    }

    /// Add a line to the cart and publish the snapshot from the mutation
    /// response.
    ///
    /// # Errors
    ///
    /// Fails on backend errors; published state is unchanged on failure.
    #[instrument(skip_all, fields(product_id = %spec.product_id, quantity = spec.quantity))]
    pub async fn add_to_cart(&self, spec: AddToCartSpec) -> Result<Cart> {
        let payload = match self.api.add_cart_item(&spec).await {
            Ok(payload) => payload,
            Err(e) => return Err(self.map_api_error(e)),
        };
        self.publish_mutation_result(payload).await
    }

    /// Set a line's quantity and publish the snapshot from the mutation
    /// response.
    ///
    /// A quantity of zero removes the line, matching what every storefront
    /// quantity stepper expects.
    ///
    /// # Errors
    ///
    /// Fails on backend errors; published state is unchanged on failure.
    #[instrument(skip_all, fields(product_id = %product_id, quantity))]
    pub async fn update_quantity(&self, product_id: &ProductId, quantity: u32) -> Result<Cart> {
        if quantity == 0 {
            return self.remove_item(product_id).await;
        }
        let payload = match self.api.update_cart_item(product_id, quantity).await {
            Ok(payload) => payload,
            Err(e) => return Err(self.map_api_error(e)),
        };
        self.publish_mutation_result(payload).await
    }

    /// Remove a line and publish the snapshot from the mutation response.
    ///
    /// # Errors
    ///
    /// Fails on backend errors; published state is unchanged on failure.
    /// Removing a line that is already gone is treated as success.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn remove_item(&self, product_id: &ProductId) -> Result<Cart> {
        let payload = match self.api.remove_cart_item(product_id).await {
            Ok(payload) => payload,
            // Already gone: converge on the backend's view via a fetch.
            Err(ApiError::NotFound(_)) => {
                warn!(%product_id, "removing a cart line that no longer exists");
                Value::Null
            }
            Err(e) => return Err(self.map_api_error(e)),
        };
        self.publish_mutation_result(payload).await
    }

    /// Publish the cart carried in a mutation response. The mutation is
    /// already applied server-side at this point, so older in-flight
    /// refreshes are retired first. An empty body carries no cart and
    /// forces one follow-up fetch.
    async fn publish_mutation_result(&self, payload: Value) -> Result<Cart> {
        self.refresh_gen.invalidate();
        if payload.is_null() {
            return self.refresh().await;
        }
        let cart = Cart::from_items(normalize_cart_items(&payload));
        self.store.dispatch(Action::CartReplaced(cart.clone()));
        Ok(cart)
    }

    fn map_api_error(&self, e: ApiError) -> AppError {
        if matches!(e, ApiError::Auth) {
            self.store.force_sign_out(&self.api);
        }
        e.into()
    }
}
