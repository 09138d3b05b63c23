//! Order history and cancellation.

use hawk_leather_core::{OrderId, OrderStatus, PaymentMethod};
use hawk_leather_integration_tests::{Harness, ScriptedGateway, TOTE};
use hawk_leather_storefront::error::StorefrontError;
use hawk_leather_storefront::services::GatewayOutcome;

const PROCESSING: &str = "65f1c2d3e4a5b6c7d8e9f101";
const SHIPPED: &str = "65f1c2d3e4a5b6c7d8e9f102";
const DELIVERED: &str = "65f1c2d3e4a5b6c7d8e9f103";

async fn with_history() -> Harness {
    let h = Harness::signed_in().await;
    {
        let mut state = h.backend.state();
        state.seed_order(DELIVERED, "delivered");
        state.seed_order(SHIPPED, "shipped");
        state.seed_order(PROCESSING, "processing");
    }
    h
}

#[tokio::test]
async fn test_load_history_with_summary() {
    let mut h = with_history().await;

    h.store.orders().load(None).await.unwrap();

    let book = h.store.order_book();
    assert_eq!(book.orders().len(), 3);
    assert_eq!(book.total_orders(), 3);
    assert_eq!(book.summary().count(OrderStatus::Processing), 1);
    assert_eq!(book.summary().count(OrderStatus::Shipped), 1);
    assert_eq!(book.summary().count(OrderStatus::Delivered), 1);
    assert_eq!(book.summary().count(OrderStatus::Cancelled), 0);
    assert!(!book.is_loading());
    assert!(book.load_error().is_none());

    // Newest first
    let first = book.orders().first().unwrap();
    assert_eq!(first.id, OrderId::new(PROCESSING));
    assert_eq!(first.order_number, "D8E9F101");
    assert_eq!(first.items.first().unwrap().product_id, None);

    assert_eq!(book.in_progress().len(), 2);
    assert_eq!(book.completed().len(), 1);
}

#[tokio::test]
async fn test_load_filtered_by_status() {
    let mut h = with_history().await;

    h.store
        .orders()
        .load(Some(OrderStatus::Shipped))
        .await
        .unwrap();

    let book = h.store.order_book();
    assert_eq!(book.orders().len(), 1);
    assert_eq!(book.orders().first().unwrap().status, OrderStatus::Shipped);
    // The summary still covers every order
    assert_eq!(book.total_orders(), 3);
}

#[tokio::test]
async fn test_cancel_processing_order_reloads_history() {
    let mut h = with_history().await;
    h.store.orders().load(None).await.unwrap();

    h.store
        .orders()
        .cancel(&OrderId::new(PROCESSING))
        .await
        .unwrap();

    assert_eq!(h.backend.state().status_of(PROCESSING).as_deref(), Some("cancelled"));
    assert_eq!(h.backend.calls("orders.list"), 2);
    let book = h.store.order_book();
    assert_eq!(
        book.find(&OrderId::new(PROCESSING)).unwrap().status,
        OrderStatus::Cancelled
    );
    assert_eq!(book.summary().count(OrderStatus::Cancelled), 1);
    assert_eq!(h.messages(), vec!["Order cancelled successfully"]);
}

#[tokio::test]
async fn test_cancel_shipped_order_is_refused() {
    let mut h = with_history().await;

    let result = h.store.orders().cancel(&OrderId::new(SHIPPED)).await;

    assert!(result.is_err());
    assert_eq!(h.backend.state().status_of(SHIPPED).as_deref(), Some("shipped"));
    assert_eq!(h.backend.calls("orders.list"), 0);
    assert_eq!(h.messages(), vec!["Only processing orders can be cancelled"]);
}

#[tokio::test]
async fn test_signed_out_history_asks_for_login() {
    let mut h = Harness::new().await;

    let result = h.store.orders().load(None).await.map(|_| ());

    assert!(matches!(result, Err(StorefrontError::NotAuthenticated)));
    assert_eq!(h.backend.calls("orders.list"), 0);
    assert_eq!(h.messages(), vec!["Please login to continue"]);
}

#[tokio::test]
async fn test_placed_order_appears_in_history() {
    let mut h = Harness::signed_in().await;
    h.backend.state().seed_cart(TOTE, 1);
    h.store.cart().refresh().await.unwrap();
    let mut gateway = ScriptedGateway::new(GatewayOutcome::Dismissed);
    h.store
        .checkout()
        .place_order(PaymentMethod::Cod, &mut gateway)
        .await
        .unwrap();

    h.store.orders().load(None).await.unwrap();

    let book = h.store.order_book();
    assert_eq!(book.orders().len(), 1);
    let order = book.orders().first().unwrap();
    assert_eq!(order.items.first().unwrap().name, "Everyday Tote");
    assert_eq!(order.items.first().unwrap().category.as_deref(), Some("Bags"));
}
