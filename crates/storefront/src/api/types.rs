//! Wire types for the backend REST API.
//!
//! Field names follow the backend's JSON exactly. These types are kept
//! separate from the domain models in [`crate::models`]; conversion happens
//! in [`super::conversions`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hawk_leather_core::{
    CartLineId, Gender, OrderId, OrderItemId, OrderStatus, PaymentMethod, PaymentStatus,
    ProductId, ReviewId, ShippingAddress, UserId,
};

// =============================================================================
// Envelopes
// =============================================================================

/// A 2xx body that carries the backend's own `success` flag.
///
/// A missing flag counts as success; only an explicit `false` is a failure.
pub trait Acknowledged {
    fn succeeded(&self) -> bool;
    fn message(&self) -> Option<&str>;
}

/// Standard `{success, message, data}` response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

impl<T> Acknowledged for Envelope<T> {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Response whose payload the client ignores (mutations followed by a refetch).
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl Acknowledged for MessageResponse {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Products
// =============================================================================

/// `GET /products/all` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductListResponse {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub data: Vec<BackendProduct>,
}

impl Acknowledged for ProductListResponse {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Catalog product as stored by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub category_name: String,
    pub item_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub item_price: Decimal,
    #[serde(default)]
    pub item_description: String,
    #[serde(default)]
    pub item_features: Vec<String>,
    #[serde(default)]
    pub item_image_url: String,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(default)]
    pub gender: Option<Gender>,
}

const fn default_true() -> bool {
    true
}

// =============================================================================
// Reviews
// =============================================================================

/// `GET /auth/review` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewListResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reviews: Vec<BackendReview>,
}

/// `POST /auth/review` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AddReviewResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub review: BackendReview,
}

/// A customer review with its author populated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendReview {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    /// Populated author; `null` when the account was deleted.
    #[serde(default)]
    pub user_id: Option<ReviewAuthor>,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Author fields populated on a review.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewAuthor {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub occupation: String,
}

/// `POST /auth/review` body.
#[derive(Debug, Clone, Serialize)]
pub struct NewReviewRequest<'a> {
    pub rating: u8,
    pub comment: &'a str,
}

// =============================================================================
// Auth & Users
// =============================================================================

/// Customer account as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendUser {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub user_name: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub pincode: Option<u64>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub phone_number: Option<u64>,
    pub user_email: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `data` of login and register responses.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    pub user: BackendUser,
    pub token: String,
}

/// `POST /auth/login` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub user_email: &'a str,
    pub user_password: &'a str,
}

/// Editable profile fields, shared by register and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    pub user_name: String,
    pub occupation: String,
    pub pincode: u64,
    pub state: String,
    pub city: String,
    pub street_address: String,
    pub phone_number: u64,
}

/// `POST /auth/register` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    #[serde(flatten)]
    pub profile: &'a ProfileFields,
    pub user_email: &'a str,
    pub user_password: &'a str,
}

/// `POST /auth/forget` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest<'a> {
    pub user_email: &'a str,
}

/// `data` of the forgot-password response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpSent {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub expires_in: Option<String>,
}

/// `POST /auth/forget/verify` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest<'a> {
    pub user_email: &'a str,
    pub otp: u32,
}

/// `data` of the OTP verification response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetGrant {
    pub reset_token: String,
    #[serde(default)]
    pub expires_in: Option<String>,
}

/// `POST /auth/forget/reset` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest<'a> {
    pub new_password: &'a str,
}

// =============================================================================
// Cart
// =============================================================================

/// `data` of `GET /cart`.
#[derive(Debug, Clone, Deserialize)]
pub struct CartPayload {
    #[serde(default)]
    pub cart: Vec<BackendCartItem>,
    #[serde(default)]
    pub summary: Option<BackendCartSummary>,
}

/// Cart line with its product populated.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendCartItem {
    #[serde(rename = "_id")]
    pub id: CartLineId,
    /// Populated product; `null` when the product was removed from the catalog.
    #[serde(rename = "productId", default)]
    pub product: Option<BackendCartProduct>,
    pub quantity: u32,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

/// Product fields populated on a cart line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendCartProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub category_name: String,
    pub item_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub item_price: Decimal,
    #[serde(default)]
    pub item_image_url: String,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount: Decimal,
}

/// Server-computed cart summary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendCartSummary {
    #[serde(default)]
    pub total_items: u32,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(default)]
    pub item_count: u32,
}

/// `POST /cart/{productId}` body.
#[derive(Debug, Clone, Serialize)]
pub struct AddToCartRequest {
    pub quantity: u32,
}

/// Single-step quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityAction {
    Increase,
    Decrease,
}

/// `PUT /cart/{productId}` body.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateQuantityRequest {
    pub action: QuantityAction,
}

// =============================================================================
// Orders
// =============================================================================

/// `data` of `GET /orders/myOrder`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersPayload {
    #[serde(default)]
    pub orders: Vec<BackendOrder>,
    #[serde(default)]
    pub summary: BackendOrderSummary,
    #[serde(default)]
    pub total_orders: usize,
}

/// Per-status order counts.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BackendOrderSummary {
    #[serde(default)]
    pub processing: usize,
    #[serde(default)]
    pub shipped: usize,
    #[serde(default)]
    pub delivered: usize,
    #[serde(default)]
    pub cancelled: usize,
}

/// An order as stored by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendOrder {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub items: Vec<BackendOrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub order_status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub shipping_address: ShippingAddress,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Order line, priced at the time of ordering.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendOrderItem {
    #[serde(rename = "_id")]
    pub id: OrderItemId,
    #[serde(rename = "productId", default)]
    pub product: Option<BackendOrderProduct>,
    pub item_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub item_price: Decimal,
    pub quantity: u32,
}

/// Product fields populated on an order line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendOrderProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub item_name: String,
    #[serde(default)]
    pub item_image_url: String,
}

/// `POST /orders/create` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest<'a> {
    pub shipping_address: &'a ShippingAddress,
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Payment gateway
// =============================================================================

/// `POST /orders/razorpay/create` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrderRequest<'a> {
    pub shipping_address: &'a ShippingAddress,
}

/// Gateway order created by the backend before handoff.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayOrder {
    pub order_id: String,
    /// Amount in major units (rupees).
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub key_id: String,
}

/// `POST /orders/razorpay/verify` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest<'a> {
    #[serde(rename = "razorpay_order_id")]
    pub gateway_order_id: &'a str,
    #[serde(rename = "razorpay_payment_id")]
    pub payment_id: &'a str,
    #[serde(rename = "razorpay_signature")]
    pub signature: &'a str,
    pub shipping_address: &'a ShippingAddress,
}

/// `POST /orders/razorpay/verify` response. The payload shape is not
/// guaranteed, so it is decoded leniently.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_defaults_for_missing_fields() {
        let json = r#"{"_id":"p1","itemName":"Satchel","itemPrice":3200}"#;
        let product: BackendProduct = serde_json::from_str(json).unwrap();
        assert!(product.in_stock);
        assert_eq!(product.discount, Decimal::ZERO);
        assert!(product.gender.is_none());
        assert!(product.item_features.is_empty());
    }

    #[test]
    fn test_success_flag_defaults_to_true() {
        let listed: ProductListResponse = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(listed.succeeded());

        let refused: MessageResponse =
            serde_json::from_str(r#"{"success":false,"message":"Cart locked"}"#).unwrap();
        assert!(!refused.succeeded());
        assert_eq!(refused.message(), Some("Cart locked"));
    }

    #[test]
    fn test_cart_item_with_deleted_product() {
        let json = r#"{"_id":"c1","productId":null,"quantity":2}"#;
        let item: BackendCartItem = serde_json::from_str(json).unwrap();
        assert!(item.product.is_none());
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_register_request_flattens_profile() {
        let profile = ProfileFields {
            user_name: "Asha Rao".to_string(),
            occupation: "Architect".to_string(),
            pincode: 560_001,
            state: "Karnataka".to_string(),
            city: "Bengaluru".to_string(),
            street_address: "4 MG Road".to_string(),
            phone_number: 9_876_543_210,
        };
        let body = RegisterRequest {
            profile: &profile,
            user_email: "asha@example.com",
            user_password: "hunter22",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["userName"], "Asha Rao");
        assert_eq!(json["phoneNumber"], 9_876_543_210_u64);
        assert_eq!(json["userEmail"], "asha@example.com");
        assert_eq!(json["userPassword"], "hunter22");
    }

    #[test]
    fn test_verify_payment_request_uses_gateway_field_names() {
        let address = ShippingAddress::default();
        let body = VerifyPaymentRequest {
            gateway_order_id: "order_1",
            payment_id: "pay_1",
            signature: "sig",
            shipping_address: &address,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["razorpay_order_id"], "order_1");
        assert_eq!(json["razorpay_payment_id"], "pay_1");
        assert_eq!(json["razorpay_signature"], "sig");
        assert!(json.get("shippingAddress").is_some());
    }

    #[test]
    fn test_quantity_action_wire_name() {
        let body = UpdateQuantityRequest {
            action: QuantityAction::Decrease,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"action":"decrease"}"#
        );
    }
}
