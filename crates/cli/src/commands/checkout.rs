//! Checkout: confirm the address, then place the order.

use hawk_leather_core::{PaymentMethod, ShippingAddress};
use hawk_leather_storefront::Storefront;
use hawk_leather_storefront::services::CheckoutOutcome;

use super::cart::print_cart;
use super::orders::print_order;
use crate::console::{Console, ConsoleGateway};
use crate::error::CliError;

pub async fn run(
    store: &mut Storefront,
    console: &mut Console,
    method: PaymentMethod,
    edit_address: bool,
) -> Result<(), CliError> {
    store.begin_checkout();
    print_cart(store.cart_state());
    if store.cart_state().is_empty() {
        return Ok(());
    }

    if edit_address || !store.checkout_form().address().is_complete() {
        confirm_address(store, console).await?;
    }

    println!();
    println!("Deliver to: {}", store.checkout_form().address().one_line());
    println!("Payment:    {}", method.as_str().to_uppercase());
    if !console.confirm("Place order?").await? {
        println!("Checkout cancelled");
        return Ok(());
    }

    let mut gateway = ConsoleGateway::new(console);
    let outcome = store.checkout().place_order(method, &mut gateway).await?;

    match outcome {
        CheckoutOutcome::Placed(order) | CheckoutOutcome::Paid(Some(order)) => {
            println!();
            print_order(&order);
        }
        CheckoutOutcome::Paid(None) | CheckoutOutcome::Cancelled => {}
    }
    Ok(())
}

/// Edit the delivery address until it is accepted or the user gives up.
async fn confirm_address(store: &mut Storefront, console: &mut Console) -> Result<(), CliError> {
    store.checkout().edit_address();

    loop {
        let current = store.checkout_form().address().clone();
        let address = ShippingAddress {
            street: console.ask_or_keep("Street address", &current.street).await?,
            city: console.ask_or_keep("City", &current.city).await?,
            state: console.ask_or_keep("State", &current.state).await?,
            pincode: console.ask_or_keep("Pincode", &current.pincode).await?,
            phone: console.ask_or_keep("Phone", &current.phone).await?,
        };

        match store.checkout().save_address(address) {
            Ok(()) => return Ok(()),
            Err(e) => {
                if !console.confirm("Edit again?").await? {
                    store.checkout().cancel_address_edit();
                    return Err(e.into());
                }
            }
        }
    }
}
