//! Integration test harness for Copperleaf.
//!
//! Spins up a `wiremock` server standing in for the commerce backend and
//! wires a real [`ApiClient`] and [`AppStore`] against it, with an
//! in-memory session cache the tests can pre-seed and inspect.
//!
//! Run with: `cargo test -p copperleaf-integration-tests`

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use std::sync::{Arc, Once};

use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use copperleaf_storefront::api::ApiClient;
use copperleaf_storefront::store::{AppStore, CachedSession, MemorySessionCache, SessionCache};
use copperleaf_storefront::{CartService, StorefrontConfig};

static TRACING: Once = Once::new();

/// Route `tracing` output through the test writer so `RUST_LOG=debug`
/// surfaces client and normalizer logs in failing tests.
fn init_test_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A backend double plus the full client stack wired against it.
pub struct TestHarness {
    pub server: MockServer,
    pub api: ApiClient,
    pub store: AppStore,
    pub session: Arc<MemorySessionCache>,
}

impl TestHarness {
    /// Start a harness with an empty session cache.
    pub async fn start() -> Self {
        Self::with_cached_session(None).await
    }

    /// Start a harness whose session cache already holds `session`, as if
    /// a previous run had saved it.
    pub async fn with_cached_session(session: Option<CachedSession>) -> Self {
        init_test_tracing();
        let server = MockServer::start().await;
        let base_url = Url::parse(&server.uri()).expect("mock server uri is a valid url");
        let config = StorefrontConfig::for_base_url(base_url);

        let cache = Arc::new(match session {
            Some(session) => MemorySessionCache::with_session(session),
            None => MemorySessionCache::new(),
        });
        let api = ApiClient::new(&config).expect("client builds");
        let store = AppStore::new(Arc::clone(&cache) as Arc<dyn SessionCache>);

        Self {
            server,
            api,
            store,
            session: cache,
        }
    }

    /// A cart service over this harness's client and store.
    #[must_use]
    pub fn cart_service(&self) -> CartService {
        CartService::new(self.api.clone(), self.store.clone())
    }

    /// Mount a GET stub returning `body` as JSON with status 200.
    pub async fn stub_get_json(&self, route: &str, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount a stub returning `body` as JSON for the given method and
    /// status.
    pub async fn stub_json(
        &self,
        http_method: &str,
        route: &str,
        status: u16,
        body: serde_json::Value,
    ) {
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount a stub returning a bare status for any matching request.
    pub async fn stub_status(&self, http_method: &str, route: &str, status: u16) {
        Mock::given(method(http_method))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }
}

/// A session cache snapshot for a signed-in, non-admin test user.
#[must_use]
pub fn cached_customer_session(token: &str) -> CachedSession {
    CachedSession {
        token: Some(token.to_string()),
        user: None,
        is_admin: false,
    }
}
