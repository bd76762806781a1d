//! Commerce backend API client.
//!
//! One `reqwest`-backed client for every endpoint group the storefront
//! consumes: profile, cart, orders, reviews, related products, wishlist.
//! Responses are fetched as raw `serde_json::Value` and passed through
//! [`crate::normalize`] before leaving this module, so callers only ever
//! see canonical records.
//!
//! The client is cheaply cloneable via `Arc`. The bearer token lives in a
//! slot that the store fills on login/restore and clears on logout. Related
//! products are cached in-memory via `moka` with a TTL from configuration.
//!
//! There is deliberately no retry or backoff here: recovery is always
//! "let the user retry manually".

mod cart;
mod orders;
mod products;
mod profile;
mod reviews;
mod wishlist;

use std::sync::{Arc, RwLock};

use moka::future::Cache;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use copperleaf_core::RelatedProduct;

use crate::config::StorefrontConfig;
use crate::normalize::ShapeError;

/// Errors that can occur when calling the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request never completed (DNS, connect, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response was JSON but carried no recognizable record.
    #[error("shape mismatch: {0}")]
    Shape(#[from] ShapeError),

    /// Backend rejected the credentials (401).
    #[error("authentication required")]
    Auth,

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// Client for the commerce backend API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<SecretString>>,
    related_cache: Cache<String, Vec<RelatedProduct>>,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.api_timeout)
            .build()?;

        let related_cache = Cache::builder()
            .max_capacity(config.catalog_cache_capacity)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.api_base_url.as_str().trim_end_matches('/').to_string(),
                token: RwLock::new(None),
                related_cache,
            }),
        })
    }

    /// Install the bearer token used for authenticated endpoints.
    pub fn set_token(&self, token: SecretString) {
        *write_lock(&self.inner.token) = Some(token);
    }

    /// Remove the bearer token (logout / auth failure).
    pub fn clear_token(&self) {
        *write_lock(&self.inner.token) = None;
    }

    /// Whether a bearer token is currently installed.
    #[must_use]
    pub fn has_token(&self) -> bool {
        read_lock(&self.inner.token).is_some()
    }

    pub(crate) fn related_cache(&self) -> &Cache<String, Vec<RelatedProduct>> {
        &self.inner.related_cache
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// GET a JSON payload.
    pub(crate) async fn get_value(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::GET, path, None).await
    }

    /// Send a request and decode the response body as JSON.
    ///
    /// An empty body (204, some DELETEs) decodes to `Value::Null`; the
    /// normalizers treat that as the empty shape.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(path);
        let mut request = self.inner.http.request(method.clone(), &url);

        if let Some(token) = read_lock(&self.inner.token).as_ref() {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "backend call");

        match status {
            StatusCode::UNAUTHORIZED => Err(ApiError::Auth),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(path.to_string())),
            s if !s.is_success() => Err(ApiError::Status {
                status: s.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
            _ => {
                let text = response.text().await?;
                if text.trim().is_empty() {
                    return Ok(Value::Null);
                }
                Ok(serde_json::from_str(&text)?)
            }
        }
    }
}

/// Lock helpers that survive poisoning: a panicked writer cannot corrupt an
/// `Option<SecretString>`, so recover the guard instead of panicking.
fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use url::Url;

    fn client_for(base: &str) -> ApiClient {
        let config = StorefrontConfig::for_base_url(Url::parse(base).unwrap());
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn endpoint_joins_without_doubled_slashes() {
        let client = client_for("http://localhost:9000/");
        assert_eq!(
            client.endpoint("/api/cart"),
            "http://localhost:9000/api/cart"
        );
        assert_eq!(
            client.endpoint("api/cart"),
            "http://localhost:9000/api/cart"
        );
    }

    #[test]
    fn token_slot_round_trips() {
        let client = client_for("http://localhost:9000");
        assert!(!client.has_token());
        client.set_token(SecretString::from("tok-1"));
        assert!(client.has_token());
        client.clear_token();
        assert!(!client.has_token());
    }
}
