//! Order history commands.

use hawk_leather_core::{OrderId, OrderStatus};
use hawk_leather_storefront::Storefront;
use hawk_leather_storefront::models::Order;

use crate::console::print_page_footer;
use crate::error::CliError;

pub async fn list(
    store: &mut Storefront,
    status: Option<OrderStatus>,
    page: usize,
) -> Result<(), CliError> {
    store.orders().load(status).await?;
    let book = store.order_book();

    let counts: Vec<String> = OrderStatus::ALL
        .iter()
        .map(|s| format!("{} {}", book.summary().count(*s), s.label()))
        .collect();
    println!("{} orders: {}", book.total_orders(), counts.join(", "));

    let page = book.page(page);
    if page.items.is_empty() {
        println!();
        println!("No orders yet");
        return Ok(());
    }

    for order in page.items {
        println!();
        print_order(order);
    }
    print_page_footer(&page);
    Ok(())
}

/// Print one order with its lines.
pub fn print_order(order: &Order) {
    println!(
        "Order #{}  {}  {}",
        order.order_number,
        order.placed_at.format("%d %b %Y"),
        order.status.label()
    );
    for line in &order.items {
        println!("  {} x{}", line.name, line.quantity);
    }
    println!(
        "  {} item(s), {} ({}, payment {})",
        order.unit_count(),
        order.total_price().display(),
        order.payment_method.as_str().to_uppercase(),
        order.payment_status
    );
    if order.status.is_cancellable() {
        println!("  Cancel with: hawk orders cancel {}", order.id);
    }
}

pub async fn cancel(store: &mut Storefront, order_id: &str) -> Result<(), CliError> {
    store.orders().cancel(&OrderId::new(order_id)).await?;
    Ok(())
}
