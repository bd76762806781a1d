//! Copperleaf Storefront - client-side data layer.
//!
//! This crate is the fetch -> normalize -> publish layer between an external
//! commerce backend (REST, JSON) and any UI surface. It contains no views:
//! navbar badges, the cart popup, order history, and the admin dashboard all
//! subscribe to the same [`store::AppStore`] and render whatever it publishes.
//!
//! # Architecture
//!
//! - [`api`] - `reqwest` client for the backend endpoints (profile, cart,
//!   orders, reviews, related products, wishlist)
//! - [`normalize`] - pure functions that turn arbitrary-shaped payloads into
//!   the canonical records from `copperleaf-core`
//! - [`store`] - reducer-based application state store with a
//!   `tokio::sync::watch` subscription channel and a persisted session cache
//! - [`cart`] - cart synchronization service (fetch, mutate, re-derive
//!   aggregates, publish)
//! - [`toast`] - transient notification queue with per-toast dismiss timers
//! - [`generation`] - generation counter for discarding stale in-flight
//!   responses
//!
//! The backend owns all business logic. This layer's one hard job is shape
//! tolerance: the backend has shipped several response envelopes over time
//! (bare arrays, `{orders: [...]}`, `{data: [...]}`, single-key wrappers) and
//! the normalizer accepts all of them without ever failing.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod generation;
pub mod normalize;
pub mod store;
pub mod toast;
pub mod validate;

pub use api::{ApiClient, ApiError};
pub use cart::{AddToCartSpec, CartService};
pub use config::{ConfigError, StorefrontConfig};
pub use error::{AppError, Result};
pub use store::{AppState, AppStore, AuthPhase};
pub use toast::{Toast, ToastId, ToastKind, ToastOptions, ToastPosition, ToastQueue};
