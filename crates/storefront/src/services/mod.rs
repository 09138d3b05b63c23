//! Business logic services for the storefront client.
//!
//! # Services
//!
//! - `auth` - Session lifecycle, account and password reset
//! - `cart` - Server cart mirror (mutate, then refetch)
//! - `checkout` - Address confirmation and order placement (COD or gateway)
//! - `payment` - Payment gateway handoff types
//! - `catalog` - Product listing and detail
//! - `orders` - Order history and cancellation
//! - `reviews` - Testimonials and new reviews
//!
//! Services borrow the state they work on for a single operation. Each
//! user-facing outcome is reported through the [`Notifier`] exactly once, and
//! failures are also returned to the caller.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod payment;
pub mod reviews;

pub use auth::{AuthService, PasswordReset, ProfileUpdate, SignupForm};
pub use cart::CartService;
pub use catalog::CatalogService;
pub use checkout::{CheckoutOutcome, CheckoutService};
pub use orders::OrderService;
pub use payment::{GatewayOutcome, PaymentCallback, PaymentGateway, PaymentRequest};
pub use reviews::ReviewService;

use crate::error::StorefrontError;
use crate::notify::Notifier;

/// Report a failure: log it (capturing internal ones), tell the user, and
/// hand the error back for propagation.
pub(crate) fn surface(
    notifier: &dyn Notifier,
    error: impl Into<StorefrontError>,
    fallback: &str,
) -> StorefrontError {
    let error = error.into();
    error.capture();
    notifier.error(&error.user_message_or(fallback));
    error
}
