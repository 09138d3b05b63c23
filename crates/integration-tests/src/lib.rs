//! Integration tests for the Hawk Leather storefront client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p hawk-leather-integration-tests
//! ```
//!
//! Each test starts an in-process [`MockBackend`] on an ephemeral port that
//! speaks the backend's REST contract for a single customer account, and
//! drives a real [`Storefront`] against it through a [`Harness`].
//!
//! # Test Categories
//!
//! - `session` - Restore, login, signup, logout, profile, password reset
//! - `cart` - Mutations and refetches
//! - `checkout` - COD and gateway flows
//! - `orders` - History and cancellation
//! - `catalog` - Products and reviews

#![allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use hawk_leather_storefront::Storefront;
use hawk_leather_storefront::config::StorefrontConfig;
use hawk_leather_storefront::notify::NoticeLog;
use hawk_leather_storefront::services::{GatewayOutcome, PaymentGateway, PaymentRequest};
use hawk_leather_storefront::storage::MemoryStorage;

pub const TOKEN: &str = "test-token";
pub const RESET_TOKEN: &str = "reset-token";
pub const USER_ID: &str = "65f0aa11bb22cc33dd44ee55";
pub const EMAIL: &str = "asha@example.com";
pub const PASSWORD: &str = "leather123";
pub const OTP: &str = "4321";
pub const GATEWAY_ORDER_ID: &str = "order_test_1";
pub const GATEWAY_KEY: &str = "rzp_test_key";
pub const VALID_SIGNATURE: &str = "valid_signature";
pub const TIMESTAMP: &str = "2026-03-01T10:00:00.000Z";

/// Seeded catalog IDs.
pub const WALLET: &str = "p-wallet";
pub const TOTE: &str = "p-tote";
pub const BELT: &str = "p-belt";
pub const CARD_HOLDER: &str = "p-card";
pub const SATCHEL: &str = "p-satchel";

type Shared = Arc<Mutex<BackendState>>;

// =============================================================================
// Backend state
// =============================================================================

/// Everything the mock backend knows, for one customer account.
#[derive(Debug)]
pub struct BackendState {
    pub products: Vec<Value>,
    pub user: Value,
    pub password: String,
    /// `(product id, quantity)` in insertion order.
    pub cart: Vec<(String, u32)>,
    /// Newest first.
    pub orders: Vec<Value>,
    pub reviews: Vec<Value>,
    /// Requests seen, by route name.
    pub calls: HashMap<&'static str, usize>,
    /// Make `GET /auth/user` fail with a 500.
    pub fail_user_fetch: bool,
    /// Make every `PUT /cart/{id}` fail with a 500.
    pub fail_quantity_steps: bool,
    /// Make `GET /products/all` fail with a 500 carrying a driver message.
    pub fail_product_list: bool,
    /// Make `GET /products/all` answer 200 with `success: false`.
    pub refuse_product_list: bool,
    next_order: u32,
}

impl BackendState {
    fn seeded() -> Self {
        Self {
            products: vec![
                product(WALLET, "Classic Bifold Wallet", "Wallets", "Men", 1200.0, 10.0),
                product(TOTE, "Everyday Tote", "Bags", "Women", 4500.0, 0.0),
                product(BELT, "Braided Belt", "Belts", "Unisex", 900.0, 0.0),
                product(CARD_HOLDER, "Slim Card Holder", "Wallets", "Unisex", 600.0, 25.0),
                product(SATCHEL, "Messenger Satchel", "Bags", "Men", 5200.0, 0.0),
            ],
            user: json!({
                "_id": USER_ID,
                "userName": "Asha Rao",
                "occupation": "Architect",
                "pincode": 560_001,
                "state": "Karnataka",
                "city": "Bengaluru",
                "streetAddress": "4 MG Road",
                "phoneNumber": 9_876_543_210_u64,
                "userEmail": EMAIL,
                "createdAt": TIMESTAMP,
            }),
            password: PASSWORD.to_string(),
            cart: Vec::new(),
            orders: Vec::new(),
            reviews: vec![json!({
                "_id": "r-seed",
                "userId": {"_id": "65f0aa11bb22cc33dd44ee99", "userName": "Vikram Shah", "occupation": "Chef"},
                "rating": 5,
                "comment": "The wallet has aged beautifully.",
                "createdAt": TIMESTAMP,
            })],
            calls: HashMap::new(),
            fail_user_fetch: false,
            fail_quantity_steps: false,
            fail_product_list: false,
            refuse_product_list: false,
            next_order: 0,
        }
    }

    fn hit(&mut self, route: &'static str) {
        *self.calls.entry(route).or_default() += 1;
    }

    fn find_product(&self, id: &str) -> Option<&Value> {
        self.products.iter().find(|p| p["_id"] == id)
    }

    /// Put a product in the cart directly.
    pub fn seed_cart(&mut self, product_id: &str, quantity: u32) {
        self.cart.push((product_id.to_string(), quantity));
    }

    /// Quantity of a product in the server cart.
    #[must_use]
    pub fn cart_quantity(&self, product_id: &str) -> Option<u32> {
        self.cart
            .iter()
            .find(|(id, _)| id == product_id)
            .map(|(_, qty)| *qty)
    }

    fn subtotal(&self) -> f64 {
        self.cart
            .iter()
            .filter_map(|(id, qty)| self.find_product(id).map(|p| payable(p) * f64::from(*qty)))
            .sum()
    }

    fn cart_payload(&self) -> Value {
        let lines: Vec<Value> = self
            .cart
            .iter()
            .enumerate()
            .map(|(i, (id, qty))| {
                json!({
                    "_id": format!("line-{i}"),
                    "productId": self.find_product(id).cloned().unwrap_or(Value::Null),
                    "quantity": qty,
                    "addedAt": TIMESTAMP,
                })
            })
            .collect();
        let units: u32 = self.cart.iter().map(|(_, qty)| qty).sum();

        json!({
            "cart": lines,
            "summary": {
                "totalItems": units,
                "subtotal": self.subtotal(),
                "itemCount": self.cart.len(),
            }
        })
    }

    /// Turn the cart into an order (newest first) and empty the cart.
    fn place_order(&mut self, address: &Value, method: &str, payment_status: &str) -> Value {
        self.next_order += 1;
        let items: Vec<Value> = self
            .cart
            .iter()
            .enumerate()
            .filter_map(|(i, (id, qty))| {
                let product = self.find_product(id)?;
                Some(json!({
                    "_id": format!("item-{i}"),
                    "productId": {
                        "_id": id,
                        "categoryName": product["categoryName"],
                        "itemName": product["itemName"],
                        "itemImageUrl": product["itemImageUrl"],
                    },
                    "itemName": product["itemName"],
                    "itemPrice": payable(product),
                    "quantity": qty,
                }))
            })
            .collect();

        let order = json!({
            "_id": format!("65f1c2d3e4a5b6c7d8e9f0{:02x}", self.next_order),
            "userId": USER_ID,
            "items": items,
            "totalAmount": self.subtotal(),
            "orderStatus": "processing",
            "paymentStatus": payment_status,
            "paymentMethod": method,
            "shippingAddress": address,
            "createdAt": TIMESTAMP,
        });
        self.orders.insert(0, order.clone());
        self.cart.clear();
        order
    }

    /// Add an order directly, e.g. one that has already shipped.
    pub fn seed_order(&mut self, id: &str, status: &str) {
        self.orders.insert(
            0,
            json!({
                "_id": id,
                "userId": USER_ID,
                "items": [{
                    "_id": format!("{id}-item"),
                    "productId": null,
                    "itemName": "Braided Belt",
                    "itemPrice": 900.0,
                    "quantity": 1,
                }],
                "totalAmount": 900.0,
                "orderStatus": status,
                "paymentStatus": "pending",
                "paymentMethod": "cod",
                "shippingAddress": {
                    "street": "4 MG Road",
                    "city": "Bengaluru",
                    "state": "Karnataka",
                    "pincode": "560001",
                    "phone": "9876543210",
                },
                "createdAt": TIMESTAMP,
            }),
        );
    }

    fn order_status(&self, id: &str) -> Option<String> {
        self.orders
            .iter()
            .find(|o| o["_id"] == id)
            .and_then(|o| o["orderStatus"].as_str())
            .map(str::to_string)
    }

    /// Current status of an order.
    #[must_use]
    pub fn status_of(&self, id: &str) -> Option<String> {
        self.order_status(id)
    }
}

fn product(id: &str, name: &str, category: &str, gender: &str, price: f64, discount: f64) -> Value {
    json!({
        "_id": id,
        "categoryName": category,
        "itemName": name,
        "itemPrice": price,
        "itemDescription": format!("Full-grain leather {}", name.to_lowercase()),
        "itemFeatures": ["Full-grain leather", "Hand stitched"],
        "itemImageUrl": format!("https://cdn.example.com/{id}.jpg"),
        "inStock": true,
        "discount": discount,
        "gender": gender,
    })
}

fn payable(product: &Value) -> f64 {
    let price = product["itemPrice"].as_f64().unwrap_or_default();
    let discount = product["discount"].as_f64().unwrap_or_default();
    price * (100.0 - discount) / 100.0
}

// =============================================================================
// Handlers
// =============================================================================

fn lock(state: &Shared) -> MutexGuard<'_, BackendState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn signed_in(headers: &HeaderMap) -> bool {
    bearer(headers) == Some(TOKEN)
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn unauthorized() -> Response {
    fail(StatusCode::UNAUTHORIZED, "Please login to access this resource")
}

fn ok(body: Value) -> Response {
    Json(body).into_response()
}

async fn list_products(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut s = lock(&state);
    s.hit("products.list");
    if s.fail_product_list {
        return fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            "MongoServerError: connection pool closed",
        );
    }
    if s.refuse_product_list {
        return ok(json!({
            "success": false,
            "message": "Catalog is being reindexed",
            "data": [],
        }));
    }

    let products: Vec<Value> = s
        .products
        .iter()
        .filter(|p| {
            query.get("category").is_none_or(|c| {
                p["categoryName"]
                    .as_str()
                    .is_some_and(|name| name.eq_ignore_ascii_case(c))
            })
        })
        .filter(|p| query.get("gender").is_none_or(|g| p["gender"] == g.as_str()))
        .cloned()
        .collect();
    ok(json!({ "success": true, "count": products.len(), "data": products }))
}

async fn get_product(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut s = lock(&state);
    s.hit("products.get");
    match s.find_product(&id) {
        Some(product) => ok(json!({ "success": true, "data": product })),
        None => fail(StatusCode::NOT_FOUND, "Product not found"),
    }
}

async fn list_reviews(State(state): State<Shared>) -> Response {
    let mut s = lock(&state);
    s.hit("reviews.list");
    ok(json!({ "message": "Reviews fetched", "reviews": s.reviews }))
}

async fn add_review(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut s = lock(&state);
    s.hit("reviews.add");
    if !signed_in(&headers) {
        return unauthorized();
    }

    let review = json!({
        "_id": format!("r-{}", s.reviews.len() + 1),
        "userId": {
            "_id": USER_ID,
            "userName": s.user["userName"],
            "occupation": s.user["occupation"],
        },
        "rating": body["rating"],
        "comment": body["comment"],
        "createdAt": TIMESTAMP,
    });
    s.reviews.insert(0, review.clone());
    ok(json!({ "message": "Review added", "review": review }))
}

fn auth_payload(s: &BackendState) -> Response {
    ok(json!({
        "success": true,
        "message": "Authenticated",
        "data": { "user": s.user, "token": TOKEN },
    }))
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = lock(&state);
    s.hit("auth.login");
    if body["userEmail"] == s.user["userEmail"] && body["userPassword"] == s.password.as_str() {
        auth_payload(&s)
    } else {
        fail(StatusCode::UNAUTHORIZED, "Invalid email or password")
    }
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = lock(&state);
    s.hit("auth.register");
    if body["userEmail"] == s.user["userEmail"] {
        return fail(StatusCode::BAD_REQUEST, "User already exists");
    }

    s.user = json!({
        "_id": "65f0aa11bb22cc33dd44ee77",
        "userName": body["userName"],
        "occupation": body["occupation"],
        "pincode": body["pincode"],
        "state": body["state"],
        "city": body["city"],
        "streetAddress": body["streetAddress"],
        "phoneNumber": body["phoneNumber"],
        "userEmail": body["userEmail"],
        "createdAt": TIMESTAMP,
    });
    s.password = body["userPassword"].as_str().unwrap_or_default().to_string();
    auth_payload(&s)
}

async fn get_user(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut s = lock(&state);
    s.hit("auth.user");
    if !signed_in(&headers) {
        return unauthorized();
    }
    if s.fail_user_fetch {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Database unavailable");
    }
    ok(json!({ "success": true, "data": s.user }))
}

async fn update_user(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut s = lock(&state);
    s.hit("auth.update");
    if !signed_in(&headers) {
        return unauthorized();
    }

    for key in [
        "userName",
        "occupation",
        "pincode",
        "state",
        "city",
        "streetAddress",
        "phoneNumber",
    ] {
        if let Some(value) = body.get(key) {
            s.user[key] = value.clone();
        }
    }
    ok(json!({ "success": true, "message": "Profile updated", "data": s.user }))
}

async fn forgot_password(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = lock(&state);
    s.hit("auth.forget");
    if body["userEmail"] != s.user["userEmail"] {
        return fail(StatusCode::NOT_FOUND, "No account with that email");
    }
    ok(json!({
        "success": true,
        "message": "OTP sent",
        "data": { "email": body["userEmail"], "expiresIn": "10 minutes" },
    }))
}

async fn verify_otp(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut s = lock(&state);
    s.hit("auth.forget.verify");
    let expected: u64 = OTP.parse().unwrap_or_default();
    if body["otp"].as_u64() != Some(expected) {
        return fail(StatusCode::BAD_REQUEST, "Invalid or expired OTP");
    }
    ok(json!({
        "success": true,
        "data": { "resetToken": RESET_TOKEN, "expiresIn": "15 minutes" },
    }))
}

async fn reset_password(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut s = lock(&state);
    s.hit("auth.forget.reset");
    if bearer(&headers) != Some(RESET_TOKEN) {
        return fail(StatusCode::UNAUTHORIZED, "Reset session expired");
    }
    s.password = body["newPassword"].as_str().unwrap_or_default().to_string();
    ok(json!({ "success": true, "message": "Password updated" }))
}

async fn get_cart(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut s = lock(&state);
    s.hit("cart.get");
    if !signed_in(&headers) {
        return unauthorized();
    }
    ok(json!({ "success": true, "data": s.cart_payload() }))
}

async fn add_to_cart(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = lock(&state);
    s.hit("cart.add");
    if !signed_in(&headers) {
        return unauthorized();
    }
    if s.find_product(&id).is_none() {
        return fail(StatusCode::NOT_FOUND, "Product not found");
    }

    let quantity = u32::try_from(body["quantity"].as_u64().unwrap_or(1)).unwrap_or(1);
    match s.cart.iter_mut().find(|(pid, _)| *pid == id) {
        Some((_, qty)) => *qty += quantity,
        None => s.cart.push((id, quantity)),
    }
    ok(json!({ "success": true, "message": "Item added to cart" }))
}

async fn step_quantity(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = lock(&state);
    s.hit("cart.step");
    if !signed_in(&headers) {
        return unauthorized();
    }
    if s.fail_quantity_steps {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Cart service unavailable");
    }

    let Some(position) = s.cart.iter().position(|(pid, _)| *pid == id) else {
        return fail(StatusCode::NOT_FOUND, "Item not in cart");
    };
    match body["action"].as_str() {
        Some("increase") => s.cart[position].1 += 1,
        Some("decrease") if s.cart[position].1 > 1 => s.cart[position].1 -= 1,
        Some("decrease") => {
            s.cart.remove(position);
        }
        _ => return fail(StatusCode::BAD_REQUEST, "Unknown action"),
    }
    ok(json!({ "success": true, "message": "Cart updated" }))
}

async fn remove_from_cart(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let mut s = lock(&state);
    s.hit("cart.remove");
    if !signed_in(&headers) {
        return unauthorized();
    }
    let before = s.cart.len();
    s.cart.retain(|(pid, _)| *pid != id);
    if s.cart.len() == before {
        return fail(StatusCode::NOT_FOUND, "Item not in cart");
    }
    ok(json!({ "success": true, "message": "Item removed" }))
}

async fn list_orders(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut s = lock(&state);
    s.hit("orders.list");
    if !signed_in(&headers) {
        return unauthorized();
    }

    let count = |status: &str| s.orders.iter().filter(|o| o["orderStatus"] == status).count();
    let summary = json!({
        "processing": count("processing"),
        "shipped": count("shipped"),
        "delivered": count("delivered"),
        "cancelled": count("cancelled"),
    });
    let orders: Vec<&Value> = s
        .orders
        .iter()
        .filter(|o| query.get("status").is_none_or(|st| o["orderStatus"] == st.as_str()))
        .collect();

    ok(json!({
        "success": true,
        "data": { "orders": orders, "summary": summary, "totalOrders": s.orders.len() },
    }))
}

async fn cancel_order(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let mut s = lock(&state);
    s.hit("orders.cancel");
    if !signed_in(&headers) {
        return unauthorized();
    }

    let Some(order) = s.orders.iter_mut().find(|o| o["_id"] == id.as_str()) else {
        return fail(StatusCode::NOT_FOUND, "Order not found");
    };
    if order["orderStatus"] != "processing" {
        return fail(StatusCode::BAD_REQUEST, "Only processing orders can be cancelled");
    }
    order["orderStatus"] = json!("cancelled");
    ok(json!({ "success": true, "message": "Order cancelled" }))
}

async fn create_order(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut s = lock(&state);
    s.hit("orders.create");
    if !signed_in(&headers) {
        return unauthorized();
    }
    if s.cart.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "Cart is empty");
    }

    let method = body["paymentMethod"].as_str().unwrap_or("cod").to_string();
    let order = s.place_order(&body["shippingAddress"], &method, "pending");
    ok(json!({ "success": true, "message": "Order placed", "data": order }))
}

async fn create_gateway_order(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut s = lock(&state);
    s.hit("payment.create");
    if !signed_in(&headers) {
        return unauthorized();
    }
    if s.cart.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "Cart is empty");
    }
    ok(json!({
        "success": true,
        "data": {
            "orderId": GATEWAY_ORDER_ID,
            "amount": s.subtotal(),
            "currency": "INR",
            "keyId": GATEWAY_KEY,
        },
    }))
}

async fn verify_payment(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut s = lock(&state);
    s.hit("payment.verify");
    if !signed_in(&headers) {
        return unauthorized();
    }
    if body["razorpay_order_id"] != GATEWAY_ORDER_ID || body["razorpay_signature"] != VALID_SIGNATURE {
        return ok(json!({ "success": false, "message": "Invalid payment signature" }));
    }

    let order = s.place_order(&body["shippingAddress"], "online", "completed");
    ok(json!({ "success": true, "message": "Payment verified", "data": { "order": order } }))
}

fn router(state: Shared) -> Router {
    let api = Router::new()
        .route("/products/all", get(list_products))
        .route("/products/{id}", get(get_product))
        .route("/auth/review", get(list_reviews).post(add_review))
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/user", get(get_user))
        .route("/auth/update", put(update_user))
        .route("/auth/forget", post(forgot_password))
        .route("/auth/forget/verify", post(verify_otp))
        .route("/auth/forget/reset", post(reset_password))
        .route("/cart", get(get_cart))
        .route(
            "/cart/{id}",
            post(add_to_cart).put(step_quantity).delete(remove_from_cart),
        )
        .route("/orders/myOrder", get(list_orders))
        .route("/orders/create", post(create_order))
        .route("/orders/{id}/cancel", put(cancel_order))
        .route("/orders/razorpay/create", post(create_gateway_order))
        .route("/orders/razorpay/verify", post(verify_payment));

    Router::new().nest("/api/v1", api).with_state(state)
}

// =============================================================================
// Mock backend
// =============================================================================

/// In-process backend on an ephemeral port. Stops when dropped.
pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
    server: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState::seeded()));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");

        let app = router(Arc::clone(&state));
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    /// Inspect or tweak backend state. Do not hold across an await.
    pub fn state(&self) -> MutexGuard<'_, BackendState> {
        lock(&self.state)
    }

    /// How many requests a route has seen.
    #[must_use]
    pub fn calls(&self, route: &str) -> usize {
        self.state().calls.get(route).copied().unwrap_or_default()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

// =============================================================================
// Harness
// =============================================================================

/// A started storefront wired to a fresh mock backend.
pub struct Harness {
    pub backend: MockBackend,
    pub store: Storefront,
    pub notices: NoticeLog,
    pub storage: Arc<MemoryStorage>,
}

impl Harness {
    /// Signed out.
    pub async fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new())).await
    }

    /// Started over the given storage, so a persisted session is restored.
    pub async fn with_storage(storage: Arc<MemoryStorage>) -> Self {
        let backend = MockBackend::start().await;
        Self::over(backend, storage).await
    }

    /// Started against an existing backend, with catalog caching off.
    pub async fn over(backend: MockBackend, storage: Arc<MemoryStorage>) -> Self {
        Self::over_with(backend, storage, Duration::ZERO).await
    }

    /// Started against an existing backend, caching catalog reads for
    /// `catalog_cache_ttl`.
    pub async fn over_with(
        backend: MockBackend,
        storage: Arc<MemoryStorage>,
        catalog_cache_ttl: Duration,
    ) -> Self {
        let mut config = StorefrontConfig::for_base_url(&backend.base_url()).expect("config");
        config.catalog_cache_ttl = catalog_cache_ttl;

        let notices = NoticeLog::new();
        let mut store = Storefront::new(
            config,
            Box::new(Arc::clone(&storage)),
            Arc::new(notices.clone()),
        )
        .expect("storefront");
        store.start().await.expect("start");

        Self {
            backend,
            store,
            notices,
            storage,
        }
    }

    /// Logged in as the seeded customer with the cart loaded and checkout
    /// seeded from the profile. Notices from setup are discarded.
    pub async fn signed_in() -> Self {
        let mut harness = Self::new().await;
        harness
            .store
            .auth()
            .login(EMAIL, PASSWORD)
            .await
            .expect("login");
        harness.store.cart().refresh().await.expect("cart");
        harness.store.begin_checkout();
        harness.notices.drain();
        harness
    }

    /// Messages of the notices shown so far, clearing them.
    pub fn messages(&self) -> Vec<String> {
        self.notices.drain().into_iter().map(|n| n.message).collect()
    }
}

// =============================================================================
// Gateway double
// =============================================================================

/// Payment gateway that answers with a fixed outcome and records requests.
#[derive(Debug)]
pub struct ScriptedGateway {
    outcome: GatewayOutcome,
    pub requests: Vec<PaymentRequest>,
}

impl ScriptedGateway {
    #[must_use]
    pub const fn new(outcome: GatewayOutcome) -> Self {
        Self {
            outcome,
            requests: Vec::new(),
        }
    }
}

impl PaymentGateway for ScriptedGateway {
    async fn collect(&mut self, request: &PaymentRequest) -> GatewayOutcome {
        self.requests.push(request.clone());
        self.outcome.clone()
    }
}
