//! Shipping address captured at checkout.

use serde::{Deserialize, Serialize};

/// Errors from validating a [`ShippingAddress`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Delivery address for an order.
///
/// Every field is free text as the customer typed it; the backend owns any
/// stricter validation. Pincode and phone stay strings because the order
/// endpoint accepts them that way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
}

impl ShippingAddress {
    /// Check that every field is filled in.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] naming the first blank field,
    /// checked in form order.
    pub fn validate(&self) -> Result<(), AddressError> {
        let fields = [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("pincode", &self.pincode),
            ("phone", &self.phone),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(AddressError::MissingField(name));
            }
        }
        Ok(())
    }

    /// Whether [`validate`](Self::validate) would pass.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    /// Single-line rendering, e.g. for order summaries.
    #[must_use]
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {} - {} (ph: {})",
            self.street, self.city, self.state, self.pincode, self.phone
        )
    }
}
