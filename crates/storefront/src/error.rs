//! Unified error handling for the data layer.
//!
//! Provides a unified `AppError` over the taxonomy the UI cares about:
//! network failures (retry manually), shape mismatches (soft "no data"),
//! validation failures (field-level, pre-network), and auth failures
//! (sign in again). Every caught error is logged; recovery is always
//! manual - no retry/backoff lives in this layer.

use thiserror::Error;

use crate::api::ApiError;
use crate::normalize::ShapeError;
use crate::store::SessionCacheError;
use crate::validate::FieldError;

/// Application-level error type for the storefront data layer.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API call failed (network, status, parse, or auth).
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Response arrived but matched no known shape.
    #[error("shape mismatch: {0}")]
    Shape(#[from] ShapeError),

    /// Form input rejected before any network call.
    #[error("validation failed: {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Session cache read/write failed.
    #[error("session cache error: {0}")]
    Session(#[from] SessionCacheError),

    /// Operation requires an authenticated user.
    #[error("not authenticated")]
    NotAuthenticated,
}

impl AppError {
    /// True when the error means the session is no longer valid and the
    /// store should transition to unauthenticated.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Api(ApiError::Auth) | Self::NotAuthenticated
        )
    }

    /// Message safe to surface to the user. Internals stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Auth) | Self::NotAuthenticated => {
                "Please sign in to continue".to_string()
            }
            Self::Api(_) | Self::Session(_) => {
                "Something went wrong. Please try again".to_string()
            }
            Self::Shape(_) => "No data available".to_string(),
            Self::Validation(errors) => errors
                .first()
                .map_or_else(|| "Invalid input".to_string(), |e| e.message.clone()),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_are_detected() {
        assert!(AppError::Api(ApiError::Auth).is_auth_failure());
        assert!(AppError::NotAuthenticated.is_auth_failure());
        assert!(!AppError::Shape(ShapeError { entity: "user" }).is_auth_failure());
    }

    #[test]
    fn user_messages_do_not_leak_internals() {
        let err = AppError::Api(ApiError::Status {
            status: 500,
            message: "pg pool exhausted".to_string(),
        });
        assert!(!err.user_message().contains("pg pool"));
    }

    #[test]
    fn validation_message_surfaces_first_field_error() {
        let err = AppError::Validation(vec![FieldError::new("email", "Enter a valid email")]);
        assert_eq!(err.user_message(), "Enter a valid email");
    }
}
