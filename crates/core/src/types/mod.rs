//! Core types for Hawk Leather.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod email;
pub mod id;
pub mod pagination;
pub mod price;
pub mod status;
pub mod totals;

pub use address::{AddressError, ShippingAddress};
pub use email::{Email, EmailError};
pub use id::*;
pub use pagination::{Page, PageMarker, Paginator};
pub use price::{CurrencyCode, Price, discounted_price};
pub use status::*;
pub use totals::CheckoutTotals;
