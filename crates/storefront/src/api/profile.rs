//! Profile endpoints.

use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use copperleaf_core::{User, UserPatch};

use super::{ApiClient, ApiError};
use crate::normalize::normalize_user;

impl ApiClient {
    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, on 401, or when the payload carries no
    /// recognizable user record.
    #[instrument(skip(self))]
    pub async fn fetch_profile(&self) -> Result<User, ApiError> {
        let payload = self.get_value("/api/users/profile").await?;
        Ok(normalize_user(&payload)?)
    }

    /// Update the authenticated user's profile and return the saved record.
    ///
    /// Only the fields set in `patch` are sent; the backend leaves the rest
    /// untouched.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, on 401, or when the response carries no
    /// recognizable user record.
    #[instrument(skip(self, patch))]
    pub async fn update_profile(&self, patch: &UserPatch) -> Result<User, ApiError> {
        let body = serde_json::to_value(patch)?;
        let payload = self
            .send(Method::PUT, "/api/users/profile", Some(&body))
            .await?;
        Ok(normalize_user(&payload)?)
    }

    /// Exchange credentials for a session.
    ///
    /// Returns the raw payload: the caller extracts the token and user
    /// record, because login envelopes vary by deployment.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or when the backend rejects the
    /// credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.send(Method::POST, "/api/auth/login", Some(&body)).await
    }

    /// Invalidate the session server-side. Best-effort: callers clear local
    /// state regardless of the outcome.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send(Method::POST, "/api/auth/logout", None).await?;
        Ok(())
    }
}
