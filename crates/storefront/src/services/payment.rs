//! Payment gateway handoff.
//!
//! Online checkout hands a [`PaymentRequest`] to a [`PaymentGateway`] and
//! waits for a [`GatewayOutcome`]. The gateway collects payment from the
//! customer however it likes (a hosted checkout page, a terminal prompt, a
//! test double) and reports back the signed callback, a dismissal, or that
//! it could not start at all.

use std::future::Future;

use serde::Serialize;

use hawk_leather_core::CurrencyCode;

/// Gateway brand color for the leather storefront.
pub const THEME_COLOR: &str = "#8B4513";

/// Description shown on the gateway's payment sheet.
pub const PAYMENT_DESCRIPTION: &str = "Purchase Premium Leather Products";

/// Customer details pre-filled on the payment sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// Everything the gateway needs to collect one payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    /// Public merchant key.
    pub key_id: String,
    /// Amount in minor units (paise for INR).
    pub amount_minor: i64,
    pub currency: CurrencyCode,
    /// Gateway order created by the backend.
    pub gateway_order_id: String,
    /// Merchant name.
    pub name: String,
    pub description: String,
    pub prefill: Prefill,
    pub theme_color: String,
}

/// Signed proof of payment returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCallback {
    pub gateway_order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// How a gateway session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// Customer paid; the callback still has to be verified by the backend.
    Completed(PaymentCallback),
    /// Customer closed the payment sheet.
    Dismissed,
    /// The gateway could not be started.
    Unavailable,
}

/// A payment gateway the checkout can hand off to.
pub trait PaymentGateway {
    /// Collect payment for `request`.
    fn collect(&mut self, request: &PaymentRequest) -> impl Future<Output = GatewayOutcome> + Send;
}
