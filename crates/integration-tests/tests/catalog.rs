//! Catalog listing, product detail and testimonials.

use rust_decimal::Decimal;

use hawk_leather_core::{Gender, ProductId};
use hawk_leather_integration_tests::{CARD_HOLDER, Harness, TOTE, WALLET};
use hawk_leather_storefront::error::StorefrontError;
use hawk_leather_storefront::models::{ProductFilter, product_page};

#[tokio::test]
async fn test_load_and_filter_locally() {
    let mut h = Harness::new().await;

    h.store.catalog().load(None, None).await.unwrap();

    let catalog = h.store.catalog_state();
    assert!(catalog.is_loaded());
    assert_eq!(catalog.products().len(), 5);
    assert_eq!(catalog.featured().len(), 4);
    assert_eq!(catalog.categories(), vec!["Wallets", "Bags", "Belts"]);

    let wallets = catalog.filtered(&ProductFilter {
        category: Some("wallets".to_string()),
        gender: None,
    });
    assert_eq!(wallets.len(), 2);

    let mens = catalog.filtered(&ProductFilter {
        category: None,
        gender: Some(Gender::Men),
    });
    assert_eq!(mens.len(), 2);

    let page = product_page(catalog.products(), 1);
    assert_eq!(page.items.len(), 5);
    assert_eq!(page.total_pages, 1);
}

#[tokio::test]
async fn test_failed_load_hides_server_message() {
    let mut h = Harness::new().await;
    h.backend.state().fail_product_list = true;

    let result = h.store.catalog().load(None, None).await.map(|_| ());

    assert!(matches!(result, Err(StorefrontError::Api(_))));
    assert_eq!(h.messages(), vec!["Failed to load products"]);
    let catalog = h.store.catalog_state();
    assert!(!catalog.is_loaded());
    assert!(!catalog.is_loading());
    assert_eq!(
        catalog.load_error(),
        Some("Failed to load products. Please try again later.")
    );
}

#[tokio::test]
async fn test_refused_reload_keeps_loaded_products() {
    let mut h = Harness::new().await;
    h.store.catalog().load(None, None).await.unwrap();
    h.backend.state().refuse_product_list = true;

    let result = h.store.catalog().load(None, None).await.map(|_| ());

    assert!(result.is_err());
    assert_eq!(h.messages(), vec!["Failed to load products"]);
    let catalog = h.store.catalog_state();
    assert!(catalog.is_loaded());
    assert_eq!(catalog.products().len(), 5);
    assert!(catalog.load_error().is_some());

    h.backend.state().refuse_product_list = false;
    h.store.catalog().load(None, None).await.unwrap();
    assert!(h.store.catalog_state().load_error().is_none());
}

#[tokio::test]
async fn test_load_with_backend_filter() {
    let mut h = Harness::new().await;

    h.store
        .catalog()
        .load(Some("Bags"), Some(Gender::Women))
        .await
        .unwrap();

    let catalog = h.store.catalog_state();
    assert_eq!(catalog.products().len(), 1);
    assert_eq!(catalog.products().first().unwrap().id, ProductId::new(TOTE));
}

#[tokio::test]
async fn test_product_detail_with_discount() {
    let mut h = Harness::new().await;

    let wallet = h.store.catalog().product(&ProductId::new(WALLET)).await.unwrap();
    let card = h
        .store
        .catalog()
        .product(&ProductId::new(CARD_HOLDER))
        .await
        .unwrap();

    assert!(wallet.has_discount());
    assert_eq!(wallet.price, Decimal::from(1200));
    assert_eq!(wallet.discounted_price, Decimal::from(1080));
    assert_eq!(card.discounted_price, Decimal::from(450));
    assert_eq!(wallet.features.len(), 2);
    assert!(h.messages().is_empty());
}

#[tokio::test]
async fn test_missing_product_shows_server_message() {
    let mut h = Harness::new().await;

    let result = h
        .store
        .catalog()
        .product(&ProductId::new("p-nope"))
        .await;

    assert!(matches!(result, Err(StorefrontError::Api(_))));
    assert_eq!(h.messages(), vec!["Product not found"]);
}

#[tokio::test]
async fn test_reviews_load_and_add() {
    let mut h = Harness::signed_in().await;

    h.store.reviews().load().await.unwrap();
    assert_eq!(h.store.testimonials().reviews().len(), 1);
    let seeded = h.store.testimonials().reviews().first().unwrap();
    assert_eq!(seeded.author_name, "Vikram Shah");
    assert_eq!(seeded.initials, "VS");

    let missing = h.store.reviews().add(0, "Lovely stitching").await;
    assert!(missing.is_err());
    assert_eq!(h.backend.calls("reviews.add"), 0);

    let review = h
        .store
        .reviews()
        .add(4, "  Lovely stitching  ")
        .await
        .unwrap();
    assert_eq!(review.author_name, "Asha Rao");
    assert_eq!(review.comment, "Lovely stitching");
    assert_eq!(review.rating, 4);

    let testimonials = h.store.testimonials();
    assert_eq!(testimonials.reviews().len(), 2);
    assert_eq!(testimonials.reviews().first().unwrap().id, review.id);
    assert_eq!(testimonials.average_rating(), Some(4.5));
    assert_eq!(
        h.messages(),
        vec!["Please select a rating", "Thank you for your review!"]
    );
}

#[tokio::test]
async fn test_review_requires_login() {
    let mut h = Harness::new().await;

    let result = h.store.reviews().add(5, "Beautiful tote").await;

    assert!(matches!(result, Err(StorefrontError::NotAuthenticated)));
    assert_eq!(h.backend.calls("reviews.add"), 0);
    assert_eq!(h.messages(), vec!["Please login to continue"]);
}
