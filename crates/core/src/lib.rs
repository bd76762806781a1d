//! Copperleaf Core - Shared canonical types.
//!
//! This crate provides the canonical record shapes used across all
//! Copperleaf components:
//! - `storefront` - Data layer (API client, normalizer, app state store)
//! - `integration-tests` - End-to-end tests against a stub backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure derivations - no I/O, no
//! HTTP clients. "Canonical" means fully defaulted: every field has a
//! concrete value after normalization, so consumers never see a missing
//! field.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, canonical `User`/`Cart`/`Order`/`Review`
//!   records, and the order status enum

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
