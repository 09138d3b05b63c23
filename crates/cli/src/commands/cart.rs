//! Cart commands.

use hawk_leather_core::{CheckoutTotals, Price, ProductId};
use hawk_leather_storefront::Storefront;
use hawk_leather_storefront::models::Cart;

use crate::error::CliError;

pub async fn show(store: &mut Storefront) -> Result<(), CliError> {
    if !store.session().is_authenticated() {
        println!("Please login to view your cart");
        return Ok(());
    }

    store.cart().refresh().await?;
    print_cart(store.cart_state());
    Ok(())
}

/// Print cart lines followed by the checkout totals.
pub fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }

    for item in cart.items() {
        let stock = if item.in_stock { "" } else { "  (out of stock)" };
        println!(
            "{}  {} x{}  {}{stock}",
            item.product_id,
            item.name,
            item.quantity,
            Price::inr(item.line_total()).display()
        );
    }
    println!();
    print_totals(&CheckoutTotals::from_subtotal(cart.total()));
}

pub fn print_totals(totals: &CheckoutTotals) {
    println!("Subtotal  {}", Price::inr(totals.subtotal).display());
    if totals.has_free_shipping() {
        println!("Shipping  FREE");
    } else {
        println!("Shipping  {}", Price::inr(totals.shipping).display());
    }
    println!("Tax       {}", Price::inr(totals.tax).display());
    println!("Total     {}", Price::inr(totals.total).display());
}

pub async fn add(store: &mut Storefront, product_id: &str) -> Result<(), CliError> {
    let product = store.catalog().product(&ProductId::new(product_id)).await?;
    store.cart().add(&product).await?;
    Ok(())
}

pub async fn remove(store: &mut Storefront, product_id: &str) -> Result<(), CliError> {
    store.cart().remove(&ProductId::new(product_id)).await?;
    Ok(())
}

pub async fn set(store: &mut Storefront, product_id: &str, quantity: i64) -> Result<(), CliError> {
    let id = ProductId::new(product_id);
    if store.cart_state().find(&id).is_none() {
        println!("That product is not in your cart");
        return Ok(());
    }
    store.cart().update_quantity(&id, quantity).await?;
    print_cart(store.cart_state());
    Ok(())
}
