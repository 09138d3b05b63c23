//! Checkout orchestration.
//!
//! Placing an order is two-phase: the shipping address is confirmed first,
//! then the chosen payment method decides the path.
//!
//! - **COD**: create the order directly.
//! - **Online**: have the backend create a gateway order, hand off to the
//!   [`PaymentGateway`], then have the backend verify the signed callback.
//!
//! The local cart is cleared only after an order exists on the server. Any
//! failure or dismissal leaves it untouched.

use secrecy::SecretString;
use thiserror::Error;
use tracing::instrument;

use hawk_leather_core::{
    AddressError, CheckoutTotals, CurrencyCode, PaymentMethod, Price, ShippingAddress,
};

use super::payment::{
    GatewayOutcome, PAYMENT_DESCRIPTION, PaymentCallback, PaymentGateway, PaymentRequest,
    Prefill, THEME_COLOR,
};
use crate::api::ApiClient;
use crate::api::types::{GatewayOrder, VerifyPaymentRequest};
use crate::error::{StorefrontError, add_breadcrumb};
use crate::models::{Cart, CheckoutForm, Order, Session};
use crate::notify::Notifier;
use crate::services::surface;

const PLACE_ORDER_FAILED: &str = "Failed to place order";
const VERIFICATION_FAILED: &str = "Payment verification failed";

/// Reasons checkout cannot proceed. Display text is shown to the user.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please complete your shipping address")]
    IncompleteAddress(#[source] AddressError),

    #[error("Please fill in all address fields")]
    InvalidAddressEdit(#[source] AddressError),

    #[error("Payment gateway not loaded. Please refresh the page.")]
    GatewayUnavailable,

    #[error("Payment amount is out of range")]
    AmountOutOfRange,

    #[error("Unsupported payment currency: {0}")]
    InvalidCurrency(String),
}

/// Result of a checkout attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// COD order created.
    Placed(Order),
    /// Online payment verified. Carries the order when the backend returned it.
    Paid(Option<Order>),
    /// Customer dismissed the payment sheet.
    Cancelled,
}

/// Checkout for the signed-in user's cart.
pub struct CheckoutService<'a> {
    api: &'a ApiClient,
    notifier: &'a dyn Notifier,
    session: &'a Session,
    cart: &'a mut Cart,
    form: &'a mut CheckoutForm,
    store_name: &'a str,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub fn new(
        api: &'a ApiClient,
        notifier: &'a dyn Notifier,
        session: &'a Session,
        cart: &'a mut Cart,
        form: &'a mut CheckoutForm,
        store_name: &'a str,
    ) -> Self {
        Self {
            api,
            notifier,
            session,
            cart,
            form,
            store_name,
        }
    }

    /// The checkout form.
    #[must_use]
    pub fn form(&self) -> &CheckoutForm {
        self.form
    }

    /// Order totals for the current cart.
    #[must_use]
    pub fn totals(&self) -> CheckoutTotals {
        CheckoutTotals::from_subtotal(self.cart.total())
    }

    // =========================================================================
    // Address
    // =========================================================================

    /// Open the address editor.
    pub fn edit_address(&mut self) {
        self.form.set_editing(true);
    }

    /// Save an edited address.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidAddressEdit` if any field is blank; the
    /// editor stays open and the previous address is kept.
    pub fn save_address(&mut self, address: ShippingAddress) -> Result<(), StorefrontError> {
        if let Err(e) = address.validate() {
            return Err(surface(
                self.notifier,
                CheckoutError::InvalidAddressEdit(e),
                PLACE_ORDER_FAILED,
            ));
        }
        *self.form.address_mut() = address;
        self.form.set_editing(false);
        self.notifier.success("Delivery address updated");
        Ok(())
    }

    /// Discard edits and go back to the profile address.
    pub fn cancel_address_edit(&mut self) {
        self.form.reset_address(self.session.user());
        self.form.set_editing(false);
    }

    // =========================================================================
    // Placing Orders
    // =========================================================================

    /// Place an order for the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty, the address is incomplete, the
    /// user is signed out, or any backend or gateway step fails. The cart is
    /// kept on every error.
    #[instrument(skip(self, gateway))]
    pub async fn place_order<G: PaymentGateway>(
        &mut self,
        method: PaymentMethod,
        gateway: &mut G,
    ) -> Result<CheckoutOutcome, StorefrontError> {
        let session = self.session;

        if self.cart.is_empty() {
            return Err(surface(self.notifier, CheckoutError::EmptyCart, PLACE_ORDER_FAILED));
        }
        if let Err(e) = self.form.address().validate() {
            return Err(surface(
                self.notifier,
                CheckoutError::IncompleteAddress(e),
                PLACE_ORDER_FAILED,
            ));
        }
        let token = session
            .token()
            .map_err(|e| surface(self.notifier, e, PLACE_ORDER_FAILED))?;

        self.form.set_payment_method(method);
        self.form.set_placing(true);
        add_breadcrumb("checkout", "Place order", Some(&[("payment_method", method.as_str())]));

        let result = match method {
            PaymentMethod::Cod => self.place_cod(token).await,
            PaymentMethod::Online => self.place_online(token, gateway).await,
        };

        self.form.set_placing(false);
        result
    }

    async fn place_cod(&mut self, token: &SecretString) -> Result<CheckoutOutcome, StorefrontError> {
        let order = self
            .api
            .create_order(token, self.form.address(), PaymentMethod::Cod)
            .await
            .map_err(|e| surface(self.notifier, e, PLACE_ORDER_FAILED))?;

        tracing::info!(order_id = %order.id, "COD order placed");
        self.order_placed();
        self.notifier.success("Order placed successfully!");
        Ok(CheckoutOutcome::Placed(order))
    }

    async fn place_online<G: PaymentGateway>(
        &mut self,
        token: &SecretString,
        gateway: &mut G,
    ) -> Result<CheckoutOutcome, StorefrontError> {
        let gateway_order = self
            .api
            .create_gateway_order(token, self.form.address())
            .await
            .map_err(|e| surface(self.notifier, e, PLACE_ORDER_FAILED))?;

        let request = self
            .payment_request(&gateway_order)
            .map_err(|e| surface(self.notifier, e, PLACE_ORDER_FAILED))?;

        add_breadcrumb(
            "checkout",
            "Gateway handoff",
            Some(&[("gateway_order_id", request.gateway_order_id.as_str())]),
        );

        match gateway.collect(&request).await {
            GatewayOutcome::Completed(callback) => self.verify(token, &callback).await,
            GatewayOutcome::Dismissed => {
                tracing::info!(gateway_order_id = %request.gateway_order_id, "Payment dismissed");
                self.notifier.error("Payment cancelled");
                Ok(CheckoutOutcome::Cancelled)
            }
            GatewayOutcome::Unavailable => Err(surface(
                self.notifier,
                CheckoutError::GatewayUnavailable,
                PLACE_ORDER_FAILED,
            )),
        }
    }

    async fn verify(
        &mut self,
        token: &SecretString,
        callback: &PaymentCallback,
    ) -> Result<CheckoutOutcome, StorefrontError> {
        let verification = VerifyPaymentRequest {
            gateway_order_id: &callback.gateway_order_id,
            payment_id: &callback.payment_id,
            signature: &callback.signature,
            shipping_address: self.form.address(),
        };

        let order = self
            .api
            .verify_payment(token, &verification)
            .await
            .map_err(|e| surface(self.notifier, e, VERIFICATION_FAILED))?;

        tracing::info!(payment_id = %callback.payment_id, "Online payment verified");
        self.order_placed();
        self.notifier.success("Payment successful! Order placed.");
        Ok(CheckoutOutcome::Paid(order))
    }

    /// The server consumed the cart and adjusted stock, so drop the local
    /// cart and any cached catalog reads.
    fn order_placed(&mut self) {
        self.cart.clear();
        self.api.invalidate_catalog();
    }

    /// Build the gateway handoff for a backend-created gateway order.
    fn payment_request(&self, order: &GatewayOrder) -> Result<PaymentRequest, CheckoutError> {
        let currency: CurrencyCode = order
            .currency
            .parse()
            .map_err(|_| CheckoutError::InvalidCurrency(order.currency.clone()))?;
        let amount_minor = Price::new(order.amount, currency)
            .to_minor_units()
            .ok_or(CheckoutError::AmountOutOfRange)?;

        let user = self.session.user();
        Ok(PaymentRequest {
            key_id: order.key_id.clone(),
            amount_minor,
            currency,
            gateway_order_id: order.order_id.clone(),
            name: self.store_name.to_string(),
            description: PAYMENT_DESCRIPTION.to_string(),
            prefill: Prefill {
                name: user.map(|u| u.name.clone()).unwrap_or_default(),
                email: user.map(|u| u.email.clone()).unwrap_or_default(),
                contact: self.form.address().phone.clone(),
            },
            theme_color: THEME_COLOR.to_string(),
        })
    }
}
