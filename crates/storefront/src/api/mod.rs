//! Client for the Hawk Leather backend REST API.
//!
//! One method per endpoint. Responses are converted to domain models before
//! they are returned; the wire shapes live in [`types`].
//!
//! Product list and product detail reads are cached with `moka` for the
//! configured TTL. Everything else goes to the network every time, because
//! the server is the source of truth for carts, orders and accounts.

mod cache;
pub mod conversions;
pub mod types;

use std::sync::Arc;

use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use hawk_leather_core::{Gender, OrderId, OrderStatus, PaymentMethod, ProductId, ShippingAddress};

use crate::config::StorefrontConfig;
use crate::models::{Order, Product, Review, User};

use cache::{CacheKey, CacheValue};
pub use conversions::{CartSnapshot, OrderHistory, SignedIn};
use conversions::{
    convert_auth, convert_cart, convert_order, convert_order_history, convert_product,
    convert_products, convert_review, convert_user,
};
use types::{
    Acknowledged, AddReviewResponse, AddToCartRequest, CartPayload, CreateOrderRequest, Envelope, ErrorBody,
    ForgotPasswordRequest, GatewayOrder, GatewayOrderRequest, LoginRequest, MessageResponse,
    NewReviewRequest, OrdersPayload, OtpSent, ProductListResponse, ProfileFields,
    QuantityAction, RegisterRequest, ResetGrant, ResetPasswordRequest, ReviewListResponse,
    UpdateQuantityRequest, VerifyOtpRequest, VerifyPaymentRequest, VerifyPaymentResponse,
};

/// Longest body excerpt written to logs.
const LOG_BODY_LIMIT: usize = 500;

/// Maximum number of cached catalog entries.
const CACHE_CAPACITY: u64 = 1000;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Missing, expired or rejected bearer token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Message reported by the backend, if the failure came from it.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } | Self::Unauthorized(message) | Self::NotFound(message) => {
                Some(message)
            }
            Self::Http(_) | Self::Parse(_) | Self::InvalidUrl(_) => None,
        }
    }

    /// HTTP status, if the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            Self::NotFound(_) => Some(404),
            Self::Http(_) | Self::Parse(_) | Self::InvalidUrl(_) => None,
        }
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the backend REST API.
///
/// Cheap to clone; clones share the connection pool and the catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl ApiClient {
    /// Create a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let cache = (!config.catalog_cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(config.catalog_cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.clone(),
                cache,
            }),
        })
    }

    /// Backend root every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Drop every cached catalog response.
    pub fn invalidate_catalog(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all();
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    fn product_path(prefix: &str, id: &ProductId) -> String {
        format!("{prefix}/{}", urlencoding::encode(id.as_str()))
    }

    fn get(&self, url: Url) -> RequestBuilder {
        self.inner.client.get(url)
    }

    fn with_token(request: RequestBuilder, token: &SecretString) -> RequestBuilder {
        request.bearer_auth(token.expose_secret())
    }

    async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        match &self.inner.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    async fn remember(&self, key: CacheKey, value: CacheValue) {
        if let Some(cache) = &self.inner.cache {
            cache.insert(key, value).await;
        }
    }

    /// Send a request and decode a successful JSON body.
    ///
    /// Non-success statuses carry the body's `message` field when present,
    /// otherwise `fallback`.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        // Read as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %excerpt(&body),
                "Backend returned non-success status"
            );
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|error| error.message)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string());

            return Err(match status {
                StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
                StatusCode::NOT_FOUND => ApiError::NotFound(message),
                _ => ApiError::Api {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&body),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    /// [`send`](Self::send), then reject a 2xx body whose `success` flag is
    /// false, using its `message` (or `fallback`) as the error.
    async fn send_checked<T: DeserializeOwned + Acknowledged>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let response: T = self.send(request, fallback).await?;
        if response.succeeded() {
            return Ok(response);
        }

        let message = response
            .message()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(fallback)
            .to_string();
        tracing::warn!(message = %message, "Backend reported failure with a success status");
        Err(ApiError::Api {
            status: StatusCode::OK.as_u16(),
            message,
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List products, optionally filtered server-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        category: Option<&str>,
        gender: Option<Gender>,
    ) -> Result<Vec<Product>, ApiError> {
        let cache_key = CacheKey::Products {
            category: category.map(str::to_string),
            gender,
        };

        if let Some(CacheValue::Products(products)) = self.cached(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut url = self.endpoint("products/all")?;
        if category.is_some() || gender.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(category) = category {
                query.append_pair("category", category);
            }
            if let Some(gender) = gender {
                query.append_pair("gender", gender.as_str());
            }
        }

        let response: ProductListResponse = self
            .send_checked(self.get(url), "Failed to fetch products")
            .await?;
        let products = convert_products(response.data);

        self.remember(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.cached(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&Self::product_path("products", id))?;
        let response: Envelope<types::BackendProduct> =
            self.send_checked(self.get(url), "Failed to fetch product").await?;
        let product = convert_product(response.data);

        self.remember(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// List all customer reviews.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_reviews(&self) -> Result<Vec<Review>, ApiError> {
        let url = self.endpoint("auth/review")?;
        let response: ReviewListResponse = self.send(self.get(url), "Failed to fetch reviews").await?;
        Ok(response.reviews.into_iter().map(convert_review).collect())
    }

    /// Post a review as the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, comment))]
    pub async fn add_review(
        &self,
        token: &SecretString,
        rating: u8,
        comment: &str,
    ) -> Result<Review, ApiError> {
        let url = self.endpoint("auth/review")?;
        let request = Self::with_token(self.inner.client.post(url), token)
            .json(&NewReviewRequest { rating, comment });
        let response: AddReviewResponse = self.send(request, "Failed to add review").await?;
        Ok(convert_review(response.review))
    }

    // =========================================================================
    // Auth & Account
    // =========================================================================

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, profile, password))]
    pub async fn register(
        &self,
        profile: &ProfileFields,
        email: &str,
        password: &str,
    ) -> Result<SignedIn, ApiError> {
        let url = self.endpoint("auth/register")?;
        let request = self.inner.client.post(url).json(&RegisterRequest {
            profile,
            user_email: email,
            user_password: password,
        });
        let response: Envelope<types::AuthPayload> =
            self.send_checked(request, "Registration failed").await?;
        Ok(convert_auth(response.data))
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<SignedIn, ApiError> {
        let url = self.endpoint("auth/login")?;
        let request = self.inner.client.post(url).json(&LoginRequest {
            user_email: email,
            user_password: password,
        });
        let response: Envelope<types::AuthPayload> =
            self.send_checked(request, "Login failed").await?;
        Ok(convert_auth(response.data))
    }

    /// Ask the backend to email a password-reset OTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn request_password_reset(&self, email: &str) -> Result<OtpSent, ApiError> {
        let url = self.endpoint("auth/forget")?;
        let request = self
            .inner
            .client
            .post(url)
            .json(&ForgotPasswordRequest { user_email: email });
        let response: Envelope<OtpSent> = self.send_checked(request, "Failed to send OTP").await?;
        Ok(response.data)
    }

    /// Exchange an OTP for a short-lived reset token.
    ///
    /// # Errors
    ///
    /// Returns an error if the OTP is rejected or the request fails.
    #[instrument(skip(self, otp))]
    pub async fn verify_reset_otp(&self, email: &str, otp: u32) -> Result<SecretString, ApiError> {
        let url = self.endpoint("auth/forget/verify")?;
        let request = self.inner.client.post(url).json(&VerifyOtpRequest {
            user_email: email,
            otp,
        });
        let response: Envelope<ResetGrant> = self.send_checked(request, "Invalid OTP").await?;
        Ok(response.data.reset_token.into())
    }

    /// Set a new password using a reset token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        reset_token: &SecretString,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let url = self.endpoint("auth/forget/reset")?;
        let request = Self::with_token(self.inner.client.post(url), reset_token)
            .json(&ResetPasswordRequest { new_password });
        let _: MessageResponse = self.send_checked(request, "Failed to reset password").await?;
        Ok(())
    }

    /// Fetch the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn get_user(&self, token: &SecretString) -> Result<User, ApiError> {
        let url = self.endpoint("auth/user")?;
        let request = Self::with_token(self.get(url), token);
        let response: Envelope<types::BackendUser> =
            self.send_checked(request, "Failed to fetch user details").await?;
        Ok(convert_user(response.data))
    }

    /// Update the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn update_user(
        &self,
        token: &SecretString,
        profile: &ProfileFields,
    ) -> Result<User, ApiError> {
        let url = self.endpoint("auth/update")?;
        let request = Self::with_token(self.inner.client.put(url), token).json(profile);
        let response: Envelope<types::BackendUser> =
            self.send_checked(request, "Failed to update profile").await?;
        Ok(convert_user(response.data))
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Fetch the server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn get_cart(&self, token: &SecretString) -> Result<CartSnapshot, ApiError> {
        let url = self.endpoint("cart")?;
        let request = Self::with_token(self.get(url), token);
        let response: Envelope<CartPayload> =
            self.send_checked(request, "Failed to fetch cart").await?;
        Ok(convert_cart(response.data))
    }

    /// Add `quantity` units of a product to the server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        token: &SecretString,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&Self::product_path("cart", product_id))?;
        let request = Self::with_token(self.inner.client.post(url), token)
            .json(&AddToCartRequest { quantity });
        let _: MessageResponse = self.send_checked(request, "Failed to add to cart").await?;
        Ok(())
    }

    /// Change a cart line's quantity by exactly one unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn step_quantity(
        &self,
        token: &SecretString,
        product_id: &ProductId,
        action: QuantityAction,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&Self::product_path("cart", product_id))?;
        let request = Self::with_token(self.inner.client.put(url), token)
            .json(&UpdateQuantityRequest { action });
        let _: MessageResponse = self.send_checked(request, "Failed to update cart").await?;
        Ok(())
    }

    /// Remove a product from the server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn remove_from_cart(
        &self,
        token: &SecretString,
        product_id: &ProductId,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&Self::product_path("cart", product_id))?;
        let request = Self::with_token(self.inner.client.delete(url), token);
        let _: MessageResponse = self.send_checked(request, "Failed to remove from cart").await?;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Fetch the order history, optionally for one status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn list_orders(
        &self,
        token: &SecretString,
        status: Option<OrderStatus>,
    ) -> Result<OrderHistory, ApiError> {
        let mut url = self.endpoint("orders/myOrder")?;
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status.as_str());
        }
        let request = Self::with_token(self.get(url), token);
        let response: Envelope<OrdersPayload> =
            self.send_checked(request, "Failed to fetch orders").await?;
        Ok(convert_order_history(response.data))
    }

    /// Cancel an order that has not shipped yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses or the request fails.
    #[instrument(skip(self, token), fields(order_id = %order_id))]
    pub async fn cancel_order(
        &self,
        token: &SecretString,
        order_id: &OrderId,
    ) -> Result<(), ApiError> {
        let path = format!("orders/{}/cancel", urlencoding::encode(order_id.as_str()));
        let url = self.endpoint(&path)?;
        let request = Self::with_token(self.inner.client.put(url), token);
        let _: MessageResponse = self.send_checked(request, "Failed to cancel order").await?;
        Ok(())
    }

    /// Create an order from the server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, address))]
    pub async fn create_order(
        &self,
        token: &SecretString,
        address: &ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<Order, ApiError> {
        let url = self.endpoint("orders/create")?;
        let request = Self::with_token(self.inner.client.post(url), token).json(
            &CreateOrderRequest {
                shipping_address: address,
                payment_method,
            },
        );
        let response: Envelope<types::BackendOrder> =
            self.send_checked(request, "Failed to create order").await?;
        Ok(convert_order(response.data))
    }

    /// Create a payment-gateway order for the server cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn create_gateway_order(
        &self,
        token: &SecretString,
        address: &ShippingAddress,
    ) -> Result<GatewayOrder, ApiError> {
        let url = self.endpoint("orders/razorpay/create")?;
        let request = Self::with_token(self.inner.client.post(url), token).json(
            &GatewayOrderRequest {
                shipping_address: address,
            },
        );
        let response: Envelope<GatewayOrder> =
            self.send_checked(request, "Failed to create payment order").await?;
        Ok(response.data)
    }

    /// Verify a gateway payment and turn it into an order.
    ///
    /// Returns the created order when the backend includes one in the
    /// response.
    ///
    /// # Errors
    ///
    /// Returns an error if verification fails or the request fails.
    #[instrument(skip_all, fields(gateway_order_id = %verification.gateway_order_id))]
    pub async fn verify_payment(
        &self,
        token: &SecretString,
        verification: &VerifyPaymentRequest<'_>,
    ) -> Result<Option<Order>, ApiError> {
        const FALLBACK: &str = "Payment verification failed";

        let url = self.endpoint("orders/razorpay/verify")?;
        let request = Self::with_token(self.inner.client.post(url), token).json(verification);
        let response: VerifyPaymentResponse = self.send(request, FALLBACK).await?;

        if !response.success {
            return Err(ApiError::Api {
                status: StatusCode::OK.as_u16(),
                message: response.message.unwrap_or_else(|| FALLBACK.to_string()),
            });
        }

        Ok(response.data.and_then(order_from_value))
    }
}

/// Decode an order from a loosely shaped payload: either the order itself or
/// an object wrapping it under `order`.
fn order_from_value(value: serde_json::Value) -> Option<Order> {
    let value = match value {
        serde_json::Value::Object(mut map) if map.contains_key("order") => map.remove("order")?,
        other => other,
    };
    match serde_json::from_value::<types::BackendOrder>(value) {
        Ok(order) => Some(convert_order(order)),
        Err(e) => {
            debug!(error = %e, "Verification payload did not contain an order");
            None
        }
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&StorefrontConfig::for_base_url(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("https://api.example.com/api/v1");
        let url = client.endpoint("orders/myOrder").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/api/v1/orders/myOrder");
    }

    #[test]
    fn test_product_path_is_encoded() {
        let path = ApiClient::product_path("cart", &ProductId::new("a/b c"));
        assert_eq!(path, "cart/a%2Fb%20c");
    }

    #[test]
    fn test_server_message_and_status() {
        let error = ApiError::Api {
            status: 400,
            message: "Out of stock".to_string(),
        };
        assert_eq!(error.server_message(), Some("Out of stock"));
        assert_eq!(error.status(), Some(400));
        assert_eq!(ApiError::Unauthorized("x".into()).status(), Some(401));
    }

    #[test]
    fn test_order_from_wrapped_value() {
        let value = serde_json::json!({
            "order": {
                "_id": "abcdef1234567890",
                "totalAmount": 100,
                "orderStatus": "processing",
                "createdAt": "2025-03-01T10:00:00Z"
            }
        });
        let order = order_from_value(value).unwrap();
        assert_eq!(order.order_number, "34567890");
        assert!(order_from_value(serde_json::json!({"paymentId": "pay_1"})).is_none());
    }
}
