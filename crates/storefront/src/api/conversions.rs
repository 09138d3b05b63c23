//! Conversions from backend wire types to domain models.

use tracing::warn;

use hawk_leather_core::discounted_price;

use super::types::{
    AuthPayload, BackendCartItem, BackendCartSummary, BackendOrder, BackendOrderItem,
    BackendOrderSummary, BackendProduct, BackendReview, BackendUser, CartPayload, OrdersPayload,
};
use crate::models::{
    CartItem, CartSummary, Order, OrderLine, OrderSummary, Product, Review, User, user_initials,
};

/// Display name for reviews whose author account no longer exists.
const ANONYMOUS_AUTHOR: &str = "Anonymous";

pub fn convert_product(product: BackendProduct) -> Product {
    Product::new(
        product.id,
        product.item_name,
        product.category_name,
        product.gender,
        product.item_price,
        product.discount,
        product.item_image_url,
        product.item_description,
        product.item_features,
        product.in_stock,
    )
}

pub fn convert_products(products: Vec<BackendProduct>) -> Vec<Product> {
    products.into_iter().map(convert_product).collect()
}

/// Convert a cart line. Lines whose product was deleted are dropped.
pub fn convert_cart_item(item: BackendCartItem) -> Option<CartItem> {
    let Some(product) = item.product else {
        warn!(line_id = %item.id, "Dropping cart line with missing product");
        return None;
    };

    Some(CartItem {
        line_id: item.id,
        discounted_price: discounted_price(product.item_price, product.discount),
        product_id: product.id,
        name: product.item_name,
        category: product.category_name,
        image_url: product.item_image_url,
        price: product.item_price,
        discount: product.discount,
        in_stock: product.in_stock,
        quantity: item.quantity,
    })
}

const fn convert_cart_summary(summary: BackendCartSummary) -> CartSummary {
    CartSummary {
        total_items: summary.total_items,
        subtotal: summary.subtotal,
        item_count: summary.item_count,
    }
}

/// The server cart as items plus its summary.
#[derive(Debug, Clone, Default)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub summary: Option<CartSummary>,
}

pub fn convert_cart(payload: CartPayload) -> CartSnapshot {
    CartSnapshot {
        items: payload
            .cart
            .into_iter()
            .filter_map(convert_cart_item)
            .collect(),
        summary: payload.summary.map(convert_cart_summary),
    }
}

pub fn convert_user(user: BackendUser) -> User {
    User {
        id: user.id,
        name: user.user_name,
        occupation: user.occupation,
        email: user.user_email,
        phone_number: user.phone_number,
        street_address: user.street_address,
        city: user.city,
        state: user.state,
        pincode: user.pincode,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

/// A successful login or registration: bearer token plus profile.
#[derive(Debug)]
pub struct SignedIn {
    pub token: secrecy::SecretString,
    pub user: User,
}

pub fn convert_auth(payload: AuthPayload) -> SignedIn {
    SignedIn {
        token: payload.token.into(),
        user: convert_user(payload.user),
    }
}

pub fn convert_review(review: BackendReview) -> Review {
    let (author_id, author_name, author_occupation) = match review.user_id {
        Some(author) => (Some(author.id), author.user_name, author.occupation),
        None => (None, ANONYMOUS_AUTHOR.to_string(), String::new()),
    };

    Review {
        id: review.id,
        author_id,
        initials: user_initials(&author_name),
        author_name,
        author_occupation,
        rating: review.rating,
        comment: review.comment,
        created_at: review.created_at,
    }
}

fn convert_order_line(item: BackendOrderItem) -> OrderLine {
    let (product_id, image_url, category) = match item.product {
        Some(product) => (
            Some(product.id),
            Some(product.item_image_url),
            Some(product.category_name),
        ),
        None => (None, None, None),
    };

    OrderLine {
        id: item.id,
        product_id,
        name: item.item_name,
        price: item.item_price,
        quantity: item.quantity,
        image_url,
        category,
    }
}

pub fn convert_order(order: BackendOrder) -> Order {
    Order {
        order_number: order.id.order_number(),
        id: order.id,
        placed_at: order.created_at,
        status: order.order_status,
        payment_status: order.payment_status,
        payment_method: order.payment_method,
        total: order.total_amount,
        shipping_address: order.shipping_address,
        items: order.items.into_iter().map(convert_order_line).collect(),
    }
}

const fn convert_order_summary(summary: BackendOrderSummary) -> OrderSummary {
    OrderSummary {
        processing: summary.processing,
        shipped: summary.shipped,
        delivered: summary.delivered,
        cancelled: summary.cancelled,
    }
}

/// Order history as returned by the backend.
#[derive(Debug, Clone, Default)]
pub struct OrderHistory {
    pub orders: Vec<Order>,
    pub summary: OrderSummary,
    pub total_orders: usize,
}

pub fn convert_order_history(payload: OrdersPayload) -> OrderHistory {
    OrderHistory {
        orders: payload.orders.into_iter().map(convert_order).collect(),
        summary: convert_order_summary(payload.summary),
        total_orders: payload.total_orders,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_product_discount_applied() {
        let json = r#"{
            "_id": "p1", "categoryName": "Bags", "itemName": "Satchel",
            "itemPrice": 2000, "discount": 25, "gender": "Women",
            "itemFeatures": ["Full grain"], "itemImageUrl": "https://img/p1.jpg"
        }"#;
        let product = convert_product(serde_json::from_str(json).unwrap());
        assert_eq!(product.price, Decimal::from(2000));
        assert_eq!(product.discounted_price, Decimal::from(1500));
        assert_eq!(product.features, vec!["Full grain"]);
        assert_eq!(product.image_url, "https://img/p1.jpg");
    }

    #[test]
    fn test_cart_drops_lines_without_product() {
        let json = r#"{
            "cart": [
                {"_id": "c1", "productId": null, "quantity": 1},
                {"_id": "c2", "quantity": 3, "productId": {
                    "_id": "p2", "categoryName": "Wallets", "itemName": "Bifold",
                    "itemPrice": 800, "discount": 10, "inStock": true
                }}
            ],
            "summary": {"totalItems": 4, "subtotal": 2160, "itemCount": 2}
        }"#;
        let snapshot = convert_cart(serde_json::from_str(json).unwrap());
        assert_eq!(snapshot.items.len(), 1);
        let line = &snapshot.items[0];
        assert_eq!(line.product_id.as_str(), "p2");
        assert_eq!(line.discounted_price, Decimal::from(720));
        assert_eq!(line.quantity, 3);
        assert_eq!(snapshot.summary.unwrap().item_count, 2);
    }

    #[test]
    fn test_review_author_and_initials() {
        let json = r#"{
            "_id": "r1", "rating": 5, "comment": "Lovely stitching",
            "createdAt": "2025-01-10T08:00:00Z",
            "userId": {"_id": "u1", "userName": "Kavya Iyer", "occupation": "Designer"}
        }"#;
        let review = convert_review(serde_json::from_str(json).unwrap());
        assert_eq!(review.author_name, "Kavya Iyer");
        assert_eq!(review.initials, "KI");
        assert_eq!(review.author_occupation, "Designer");
    }

    #[test]
    fn test_review_without_author() {
        let json = r#"{"_id": "r2", "rating": 4, "createdAt": "2025-01-10T08:00:00Z", "userId": null}"#;
        let review = convert_review(serde_json::from_str(json).unwrap());
        assert_eq!(review.author_name, "Anonymous");
        assert!(review.author_id.is_none());
        assert_eq!(review.initials, "AN");
    }

    #[test]
    fn test_order_number_and_lines() {
        let json = r#"{
            "_id": "65f1c2d3e4a5b6c7d8e9f0ab",
            "totalAmount": 2430.5,
            "orderStatus": "shipped",
            "paymentStatus": "completed",
            "paymentMethod": "online",
            "shippingAddress": {"street": "1 Park St", "city": "Kolkata", "state": "WB", "pincode": "700016", "phone": "9000000000"},
            "createdAt": "2025-03-01T10:00:00Z",
            "items": [{
                "_id": "i1", "itemName": "Belt", "itemPrice": 1215.25, "quantity": 2,
                "productId": {"_id": "p9", "categoryName": "Belts", "itemImageUrl": "https://img/p9.jpg"}
            }]
        }"#;
        let order = convert_order(serde_json::from_str(json).unwrap());
        assert_eq!(order.order_number, "D8E9F0AB");
        assert_eq!(order.unit_count(), 2);
        assert_eq!(order.items[0].category.as_deref(), Some("Belts"));
        assert_eq!(order.total, "2430.5".parse::<Decimal>().unwrap());
    }
}
