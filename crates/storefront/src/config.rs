//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `COPPERLEAF_API_BASE_URL` - Base URL of the commerce backend
//!
//! ## Optional
//! - `COPPERLEAF_API_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `COPPERLEAF_CATALOG_CACHE_TTL_SECS` - Related-products cache TTL
//!   (default: 300)
//! - `COPPERLEAF_CATALOG_CACHE_CAPACITY` - Related-products cache capacity
//!   (default: 1000)
//! - `COPPERLEAF_SESSION_FILE` - Path of the persisted session blob
//!   (default: `.copperleaf/session.json`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront data-layer configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the commerce backend API.
    pub api_base_url: Url,
    /// Per-request timeout for backend calls.
    pub api_timeout: Duration,
    /// TTL for cached catalog reads (related products).
    pub catalog_cache_ttl: Duration,
    /// Maximum entries in the catalog cache.
    pub catalog_cache_capacity: u64,
    /// Path of the persisted session blob (token + cached user).
    pub session_file: PathBuf,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("COPPERLEAF_API_BASE_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("COPPERLEAF_API_BASE_URL".to_string(), e.to_string())
            })?;
        let api_timeout =
            Duration::from_secs(parse_env_or_default("COPPERLEAF_API_TIMEOUT_SECS", 10)?);
        let catalog_cache_ttl = Duration::from_secs(parse_env_or_default(
            "COPPERLEAF_CATALOG_CACHE_TTL_SECS",
            300,
        )?);
        let catalog_cache_capacity =
            parse_env_or_default("COPPERLEAF_CATALOG_CACHE_CAPACITY", 1000)?;
        let session_file =
            get_env_or_default("COPPERLEAF_SESSION_FILE", ".copperleaf/session.json").into();

        Ok(Self {
            api_base_url,
            api_timeout,
            catalog_cache_ttl,
            catalog_cache_capacity,
            session_file,
        })
    }

    /// Build a configuration for a known base URL with defaults elsewhere.
    ///
    /// Used by tests pointing the client at a local stub server.
    #[must_use]
    pub fn for_base_url(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            api_timeout: Duration::from_secs(10),
            catalog_cache_ttl: Duration::from_secs(300),
            catalog_cache_capacity: 1000,
            session_file: PathBuf::from(".copperleaf/session.json"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a numeric environment variable with a default value.
fn parse_env_or_default<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn for_base_url_applies_defaults() {
        let config = StorefrontConfig::for_base_url(Url::parse("http://localhost:9000").unwrap());
        assert_eq!(config.api_timeout, Duration::from_secs(10));
        assert_eq!(config.catalog_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.catalog_cache_capacity, 1000);
        assert_eq!(
            config.session_file,
            PathBuf::from(".copperleaf/session.json")
        );
    }

    #[test]
    fn parse_env_or_default_falls_back_when_unset() {
        let value: u64 = parse_env_or_default("COPPERLEAF_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
