//! Orders and the customer's order history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hawk_leather_core::pagination::PROFILE_ITEMS_PER_PAGE;
use hawk_leather_core::{
    OrderId, OrderItemId, OrderStatus, Page, Paginator, PaymentMethod, PaymentStatus, Price,
    ProductId, ShippingAddress,
};

/// A line on a placed order, priced at ordering time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: OrderItemId,
    pub product_id: Option<ProductId>,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Short customer-facing number derived from the ID.
    pub order_number: String,
    pub placed_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub total: Decimal,
    pub shipping_address: ShippingAddress,
    pub items: Vec<OrderLine>,
}

impl Order {
    /// Order total as a displayable price.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::inr(self.total)
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

/// Per-status counts reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub processing: usize,
    pub shipped: usize,
    pub delivered: usize,
    pub cancelled: usize,
}

impl OrderSummary {
    /// Count for a single status.
    #[must_use]
    pub const fn count(&self, status: OrderStatus) -> usize {
        match status {
            OrderStatus::Processing => self.processing,
            OrderStatus::Shipped => self.shipped,
            OrderStatus::Delivered => self.delivered,
            OrderStatus::Cancelled => self.cancelled,
        }
    }
}

/// The customer's order history as last fetched.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
    summary: OrderSummary,
    total_orders: usize,
    is_loading: bool,
    load_error: Option<String>,
}

impl OrderBook {
    /// All orders, newest first as sent by the backend.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Server-side status counts.
    #[must_use]
    pub const fn summary(&self) -> &OrderSummary {
        &self.summary
    }

    /// Server-side total order count.
    #[must_use]
    pub const fn total_orders(&self) -> usize {
        self.total_orders
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message from the last failed fetch, cleared by the next attempt.
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Find an order by ID.
    #[must_use]
    pub fn find(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    /// Orders still on their way (processing or shipped).
    #[must_use]
    pub fn in_progress(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| order.status.is_in_progress())
            .collect()
    }

    /// Delivered orders.
    #[must_use]
    pub fn completed(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| order.status == OrderStatus::Delivered)
            .collect()
    }

    /// A page of all orders, three per page.
    #[must_use]
    pub fn page(&self, page: usize) -> Page<'_, Order> {
        Paginator::new(PROFILE_ITEMS_PER_PAGE).page(&self.orders, page)
    }

    pub(crate) fn replace(&mut self, orders: Vec<Order>, summary: OrderSummary, total: usize) {
        self.orders = orders;
        self.summary = summary;
        self.total_orders = total;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub(crate) fn set_load_error(&mut self, error: Option<String>) {
        self.load_error = error;
    }
}
