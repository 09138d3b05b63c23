//! Domain models for the storefront client.
//!
//! These are the client-side shapes of backend records (see
//! [`crate::api::types`] for the wire format) plus the local state each
//! screen keeps: the cart mirror, the order book, the catalog and the
//! checkout form.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;
pub mod product;
pub mod review;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem, CartSummary};
pub use catalog::{Catalog, ProductFilter, product_page};
pub use checkout::CheckoutForm;
pub use order::{Order, OrderBook, OrderLine, OrderSummary};
pub use product::Product;
pub use review::{Review, Testimonials};
pub use session::Session;
pub use user::{User, user_initials};
