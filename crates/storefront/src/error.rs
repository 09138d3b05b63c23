//! Unified error handling with Sentry integration.
//!
//! Every service operation returns `Result<T, StorefrontError>`. Internal
//! failures are captured to Sentry when they are reported; validation and
//! backend-rejected requests are not.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;
use crate::services::reviews::ReviewError;
use crate::storage::StorageError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Backend request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Session storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Authentication or account input was rejected.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout could not proceed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Review input was rejected.
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// The operation needs a signed-in user.
    #[error("Not authenticated")]
    NotAuthenticated,
}

impl StorefrontError {
    /// Whether this is a failure on our side or the backend's, as opposed to
    /// a rejected request.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Api(err) => match err {
                ApiError::Http(_) | ApiError::Parse(_) | ApiError::InvalidUrl(_) => true,
                ApiError::Api { status, .. } => *status >= 500,
                ApiError::Unauthorized(_) | ApiError::NotFound(_) => false,
            },
            Self::Storage(_) | Self::Config(_) => true,
            Self::Auth(_) | Self::Checkout(_) | Self::Review(_) | Self::NotAuthenticated => false,
        }
    }

    /// Message safe to show the user, using `fallback` when the failure has
    /// no message of its own.
    #[must_use]
    pub fn user_message_or(&self, fallback: &str) -> String {
        // Don't expose internal error details to users
        match self {
            Self::Api(err) => err.server_message().unwrap_or(fallback).to_string(),
            Self::Storage(_) | Self::Config(_) => fallback.to_string(),
            Self::Auth(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::Review(err) => err.to_string(),
            Self::NotAuthenticated => "Please login to continue".to_string(),
        }
    }

    /// Log the error, capturing internal failures to Sentry.
    pub fn capture(&self) {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, "Storefront request rejected");
        }
    }
}

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart and
/// checkout actions leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
