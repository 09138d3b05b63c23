//! Checkout: address confirmation, cash on delivery, and the gateway flow.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use serde_json::json;

use hawk_leather_core::{CurrencyCode, OrderStatus, PaymentMethod, PaymentStatus, ProductId};
use hawk_leather_integration_tests::{
    BELT, CARD_HOLDER, EMAIL, GATEWAY_KEY, GATEWAY_ORDER_ID, Harness, MockBackend, PASSWORD,
    ScriptedGateway, VALID_SIGNATURE, WALLET,
};
use hawk_leather_storefront::services::payment::THEME_COLOR;
use hawk_leather_storefront::services::{CheckoutOutcome, GatewayOutcome, PaymentCallback};
use hawk_leather_storefront::storage::MemoryStorage;

async fn ready_to_checkout(lines: &[(&str, u32)]) -> Harness {
    let mut h = Harness::signed_in().await;
    {
        let mut state = h.backend.state();
        for (product_id, quantity) in lines {
            state.seed_cart(product_id, *quantity);
        }
    }
    h.store.cart().refresh().await.unwrap();
    h.store.begin_checkout();
    h
}

fn paid(signature: &str) -> ScriptedGateway {
    ScriptedGateway::new(GatewayOutcome::Completed(PaymentCallback {
        gateway_order_id: GATEWAY_ORDER_ID.to_string(),
        payment_id: "pay_test_1".to_string(),
        signature: signature.to_string(),
    }))
}

#[tokio::test]
async fn test_empty_cart_is_rejected() {
    let mut h = Harness::signed_in().await;
    let mut gateway = ScriptedGateway::new(GatewayOutcome::Dismissed);

    let result = h
        .store
        .checkout()
        .place_order(PaymentMethod::Cod, &mut gateway)
        .await;

    assert!(result.is_err());
    assert_eq!(h.messages(), vec!["Your cart is empty"]);
    assert_eq!(h.backend.calls("orders.create"), 0);
}

#[tokio::test]
async fn test_incomplete_address_is_rejected() {
    let mut h = ready_to_checkout(&[(BELT, 1)]).await;
    h.store.checkout_form_mut().address_mut().pincode.clear();
    let mut gateway = ScriptedGateway::new(GatewayOutcome::Dismissed);

    let result = h
        .store
        .checkout()
        .place_order(PaymentMethod::Cod, &mut gateway)
        .await;

    assert!(result.is_err());
    assert_eq!(h.messages(), vec!["Please complete your shipping address"]);
    assert_eq!(h.backend.calls("orders.create"), 0);
    assert!(!h.store.cart_state().is_empty());
}

#[tokio::test]
async fn test_address_prefilled_from_profile() {
    let h = ready_to_checkout(&[(BELT, 1)]).await;
    let address = h.store.checkout_form().address();

    assert_eq!(address.street, "4 MG Road");
    assert_eq!(address.city, "Bengaluru");
    assert_eq!(address.pincode, "560001");
    assert_eq!(address.phone, "9876543210");
}

#[tokio::test]
async fn test_save_address_requires_every_field() {
    let mut h = ready_to_checkout(&[(BELT, 1)]).await;
    h.store.checkout().edit_address();

    let mut edited = h.store.checkout_form().address().clone();
    edited.city = "  ".to_string();
    let rejected = h.store.checkout().save_address(edited.clone());

    assert!(rejected.is_err());
    assert!(h.store.checkout_form().is_editing());
    assert_eq!(h.store.checkout_form().address().city, "Bengaluru");

    edited.city = "Mysuru".to_string();
    h.store.checkout().save_address(edited).unwrap();

    assert!(!h.store.checkout_form().is_editing());
    assert_eq!(h.store.checkout_form().address().city, "Mysuru");
    assert_eq!(
        h.messages(),
        vec!["Please fill in all address fields", "Delivery address updated"]
    );
}

#[tokio::test]
async fn test_cancel_address_edit_restores_profile_address() {
    let mut h = ready_to_checkout(&[(BELT, 1)]).await;
    h.store.checkout().edit_address();
    h.store.checkout_form_mut().address_mut().street = "Somewhere else".to_string();

    h.store.checkout().cancel_address_edit();

    assert!(!h.store.checkout_form().is_editing());
    assert_eq!(h.store.checkout_form().address().street, "4 MG Road");
}

#[tokio::test]
async fn test_totals_add_shipping_below_threshold() {
    let mut h = ready_to_checkout(&[(CARD_HOLDER, 1)]).await;
    let totals = h.store.checkout().totals();

    // 25% off 600
    assert_eq!(totals.subtotal, Decimal::from(450));
    assert_eq!(totals.shipping, Decimal::from(150));
    assert_eq!(totals.tax, Decimal::from(36));
    assert_eq!(totals.total, Decimal::from(636));
}

#[tokio::test]
async fn test_cod_order_clears_cart() {
    let mut h = ready_to_checkout(&[(WALLET, 2), (BELT, 1)]).await;
    let mut gateway = ScriptedGateway::new(GatewayOutcome::Dismissed);

    let outcome = h
        .store
        .checkout()
        .place_order(PaymentMethod::Cod, &mut gateway)
        .await
        .unwrap();

    let CheckoutOutcome::Placed(order) = outcome else {
        panic!("expected a placed order, got {outcome:?}");
    };
    assert_eq!(order.total, Decimal::from(3060));
    assert_eq!(order.status, OrderStatus::Processing);
    assert_eq!(order.payment_method, PaymentMethod::Cod);
    assert_eq!(order.unit_count(), 3);
    assert_eq!(order.order_number.len(), 8);
    assert_eq!(order.shipping_address.city, "Bengaluru");

    assert!(gateway.requests.is_empty());
    assert!(h.store.cart_state().is_empty());
    assert!(h.backend.state().cart.is_empty());
    assert!(!h.store.checkout_form().is_placing());
    assert_eq!(h.store.checkout_form().payment_method(), PaymentMethod::Cod);
    assert_eq!(h.messages(), vec!["Order placed successfully!"]);
}

#[tokio::test]
async fn test_placed_order_drops_cached_catalog() {
    let mut h = Harness::over_with(
        MockBackend::start().await,
        Arc::new(MemoryStorage::new()),
        Duration::from_secs(300),
    )
    .await;
    h.store.auth().login(EMAIL, PASSWORD).await.unwrap();

    h.store.catalog().load(None, None).await.unwrap();
    h.store.catalog().load(None, None).await.unwrap();
    assert_eq!(h.backend.calls("products.list"), 1);

    h.backend.state().seed_cart(BELT, 1);
    h.store.cart().refresh().await.unwrap();
    h.store.begin_checkout();
    let mut gateway = ScriptedGateway::new(GatewayOutcome::Dismissed);
    h.store
        .checkout()
        .place_order(PaymentMethod::Cod, &mut gateway)
        .await
        .unwrap();

    // The belt sold out with that order
    h.backend.state().products[2]["inStock"] = json!(false);
    h.store.catalog().load(None, None).await.unwrap();

    assert_eq!(h.backend.calls("products.list"), 2);
    let belt = h
        .store
        .catalog_state()
        .find(&ProductId::new(BELT))
        .unwrap();
    assert!(!belt.in_stock);
}

#[tokio::test]
async fn test_online_payment_verified() {
    let mut h = ready_to_checkout(&[(WALLET, 1)]).await;
    let mut gateway = paid(VALID_SIGNATURE);

    let outcome = h
        .store
        .checkout()
        .place_order(PaymentMethod::Online, &mut gateway)
        .await
        .unwrap();

    let CheckoutOutcome::Paid(Some(order)) = outcome else {
        panic!("expected a paid order, got {outcome:?}");
    };
    assert_eq!(order.payment_method, PaymentMethod::Online);
    assert_eq!(order.payment_status, PaymentStatus::Completed);

    let request = gateway.requests.first().unwrap();
    assert_eq!(request.key_id, GATEWAY_KEY);
    assert_eq!(request.gateway_order_id, GATEWAY_ORDER_ID);
    assert_eq!(request.amount_minor, 108_000);
    assert_eq!(request.currency, CurrencyCode::INR);
    assert_eq!(request.name, "Hawk Leather");
    assert_eq!(request.prefill.name, "Asha Rao");
    assert_eq!(request.prefill.email, EMAIL);
    assert_eq!(request.prefill.contact, "9876543210");
    assert_eq!(request.theme_color, THEME_COLOR);

    assert!(h.store.cart_state().is_empty());
    assert_eq!(h.backend.calls("payment.verify"), 1);
    assert_eq!(h.messages(), vec!["Payment successful! Order placed."]);
}

#[tokio::test]
async fn test_dismissed_payment_keeps_cart() {
    let mut h = ready_to_checkout(&[(WALLET, 1)]).await;
    let mut gateway = ScriptedGateway::new(GatewayOutcome::Dismissed);

    let outcome = h
        .store
        .checkout()
        .place_order(PaymentMethod::Online, &mut gateway)
        .await
        .unwrap();

    assert_eq!(outcome, CheckoutOutcome::Cancelled);
    assert_eq!(gateway.requests.len(), 1);
    assert_eq!(h.backend.calls("payment.verify"), 0);
    assert_eq!(h.store.cart_state().count(), 1);
    assert!(!h.store.checkout_form().is_placing());
    assert_eq!(h.messages(), vec!["Payment cancelled"]);
}

#[tokio::test]
async fn test_failed_verification_keeps_cart() {
    let mut h = ready_to_checkout(&[(WALLET, 1)]).await;
    let mut gateway = paid("forged_signature");

    let result = h
        .store
        .checkout()
        .place_order(PaymentMethod::Online, &mut gateway)
        .await;

    assert!(result.is_err());
    assert_eq!(h.store.cart_state().count(), 1);
    assert_eq!(h.backend.state().cart_quantity(WALLET), Some(1));
    assert!(h.backend.state().orders.is_empty());
    assert_eq!(h.messages(), vec!["Invalid payment signature"]);
}

#[tokio::test]
async fn test_unavailable_gateway_keeps_cart() {
    let mut h = ready_to_checkout(&[(BELT, 1)]).await;
    let mut gateway = ScriptedGateway::new(GatewayOutcome::Unavailable);

    let result = h
        .store
        .checkout()
        .place_order(PaymentMethod::Online, &mut gateway)
        .await;

    assert!(result.is_err());
    assert_eq!(h.store.cart_state().count(), 1);
    assert_eq!(
        h.messages(),
        vec!["Payment gateway not loaded. Please refresh the page."]
    );
}
