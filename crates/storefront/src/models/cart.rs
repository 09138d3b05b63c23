//! Local mirror of the server-side cart.
//!
//! The server cart is authoritative. [`Cart`] only ever holds the result of
//! the most recent successful fetch, except for [`Cart::clear`], which empties
//! it locally after an order has been placed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hawk_leather_core::{CartLineId, Price, ProductId};

/// A product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub line_id: CartLineId,
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    pub image_url: String,
    /// List price (MRP) per unit.
    pub price: Decimal,
    /// Payable price per unit.
    pub discounted_price: Decimal,
    pub discount: Decimal,
    pub in_stock: bool,
    pub quantity: u32,
}

impl CartItem {
    /// Payable amount for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.discounted_price * Decimal::from(self.quantity)
    }
}

/// Totals as computed by the server on the last fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartSummary {
    pub total_items: u32,
    pub subtotal: Decimal,
    pub item_count: u32,
}

/// Client-side cart state.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<CartItem>,
    summary: Option<CartSummary>,
    is_loading: bool,
}

impl Cart {
    /// Lines currently in the cart.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Server summary from the last fetch, if it sent one.
    #[must_use]
    pub const fn summary(&self) -> Option<&CartSummary> {
        self.summary.as_ref()
    }

    /// Whether a refresh is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line for a product.
    #[must_use]
    pub fn find(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of payable price × quantity.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// [`total`](Self::total) as a displayable price.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::inr(self.total())
    }

    /// Empty the local mirror without touching the server.
    pub fn clear(&mut self) {
        self.items.clear();
        self.summary = None;
    }

    pub(crate) fn replace(&mut self, items: Vec<CartItem>, summary: Option<CartSummary>) {
        self.items = items;
        self.summary = summary;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }
}
