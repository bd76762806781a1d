//! Core types for Copperleaf.
//!
//! This module provides the canonical entity shapes produced by the
//! storefront normalizer, plus type-safe ID wrappers.

pub mod cart;
pub mod id;
pub mod order;
pub mod product;
pub mod review;
pub mod status;
pub mod user;

pub use cart::{Cart, CartItem, ProductSnapshot};
pub use id::*;
pub use order::{Order, OrderCustomer, OrderItem, PLACEHOLDER_IMAGE_URL, PLACEHOLDER_PRODUCT_NAME};
pub use product::RelatedProduct;
pub use review::Review;
pub use status::OrderStatus;
pub use user::{Address, User, UserPatch};
