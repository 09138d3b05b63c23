//! Checkout form state.

use hawk_leather_core::{PaymentMethod, ShippingAddress};

use super::user::User;

/// Shipping address editor and payment selection for the checkout screen.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    address: ShippingAddress,
    editing: bool,
    placing: bool,
    payment_method: PaymentMethod,
}

impl CheckoutForm {
    /// A form pre-filled from the user's profile address.
    #[must_use]
    pub fn for_user(user: Option<&User>) -> Self {
        Self {
            address: user.map(User::shipping_address).unwrap_or_default(),
            ..Self::default()
        }
    }

    /// The address that will be submitted.
    #[must_use]
    pub const fn address(&self) -> &ShippingAddress {
        &self.address
    }

    /// Mutable access while editing.
    pub const fn address_mut(&mut self) -> &mut ShippingAddress {
        &mut self.address
    }

    /// Whether the address editor is open.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.editing
    }

    /// Whether an order is being placed.
    #[must_use]
    pub const fn is_placing(&self) -> bool {
        self.placing
    }

    /// Selected payment method.
    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Select a payment method.
    pub const fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    pub(crate) fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    pub(crate) fn set_placing(&mut self, placing: bool) {
        self.placing = placing;
    }

    pub(crate) fn reset_address(&mut self, user: Option<&User>) {
        self.address = user.map(User::shipping_address).unwrap_or_default();
    }
}
