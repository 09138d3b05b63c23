//! Storefront client state.
//!
//! [`Storefront`] owns everything a front end keeps between interactions:
//! the API client, session storage, the notifier, and the local state of
//! each screen. Services are handed out per operation and borrow only the
//! pieces they touch.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::StorefrontConfig;
use crate::error::StorefrontError;
use crate::models::{Cart, Catalog, CheckoutForm, OrderBook, Session, Testimonials, User};
use crate::notify::Notifier;
use crate::services::{
    AuthService, CartService, CatalogService, CheckoutService, OrderService, ReviewService,
};
use crate::storage::{FileStorage, SessionStorage};

/// Storefront client state.
pub struct Storefront {
    config: StorefrontConfig,
    api: ApiClient,
    storage: Box<dyn SessionStorage>,
    notifier: Arc<dyn Notifier>,
    session: Session,
    cart: Cart,
    checkout: CheckoutForm,
    catalog: Catalog,
    orders: OrderBook,
    testimonials: Testimonials,
}

impl Storefront {
    /// Create a storefront over the given session storage.
    ///
    /// The session starts signed out; call [`Storefront::start`] to restore it.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        config: StorefrontConfig,
        storage: Box<dyn SessionStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, StorefrontError> {
        let api = ApiClient::new(&config)?;

        Ok(Self {
            config,
            api,
            storage,
            notifier,
            session: Session::default(),
            cart: Cart::default(),
            checkout: CheckoutForm::default(),
            catalog: Catalog::default(),
            orders: OrderBook::default(),
            testimonials: Testimonials::default(),
        })
    }

    /// Create a storefront persisting its session to `config.session_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn open(config: StorefrontConfig, notifier: Arc<dyn Notifier>) -> Result<Self, StorefrontError> {
        let storage = FileStorage::new(config.session_path.clone());
        Self::new(config, Box::new(storage), notifier)
    }

    /// Restore the persisted session, then load the cart and seed checkout.
    ///
    /// A cart fetch failure is logged; the storefront still starts.
    ///
    /// # Errors
    ///
    /// Returns an error if session storage cannot be read.
    pub async fn start(&mut self) -> Result<(), StorefrontError> {
        self.auth().restore().await?;

        if let Err(e) = self.cart().refresh().await {
            tracing::warn!(error = %e, "Initial cart load failed");
        }

        self.begin_checkout();
        tracing::info!(
            signed_in = self.session.is_authenticated(),
            cart_items = self.cart.count(),
            "Storefront started"
        );
        Ok(())
    }

    /// Start a fresh checkout: the address comes from the profile and the
    /// payment method goes back to cash on delivery.
    pub fn begin_checkout(&mut self) {
        self.checkout = CheckoutForm::for_user(self.session.user());
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    #[must_use]
    pub fn cart_state(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn checkout_form(&self) -> &CheckoutForm {
        &self.checkout
    }

    /// Mutable checkout form, for choosing the payment method or editing
    /// address fields in place.
    pub fn checkout_form_mut(&mut self) -> &mut CheckoutForm {
        &mut self.checkout
    }

    #[must_use]
    pub fn catalog_state(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn order_book(&self) -> &OrderBook {
        &self.orders
    }

    #[must_use]
    pub fn testimonials(&self) -> &Testimonials {
        &self.testimonials
    }

    // =========================================================================
    // Services
    // =========================================================================

    pub fn auth(&mut self) -> AuthService<'_> {
        AuthService::new(
            &self.api,
            self.storage.as_ref(),
            self.notifier.as_ref(),
            &mut self.session,
            &mut self.cart,
        )
    }

    pub fn cart(&mut self) -> CartService<'_> {
        CartService::new(
            &self.api,
            self.notifier.as_ref(),
            &self.session,
            &mut self.cart,
        )
    }

    pub fn checkout(&mut self) -> CheckoutService<'_> {
        CheckoutService::new(
            &self.api,
            self.notifier.as_ref(),
            &self.session,
            &mut self.cart,
            &mut self.checkout,
            &self.config.store_name,
        )
    }

    pub fn catalog(&mut self) -> CatalogService<'_> {
        CatalogService::new(&self.api, self.notifier.as_ref(), &mut self.catalog)
    }

    pub fn orders(&mut self) -> OrderService<'_> {
        OrderService::new(
            &self.api,
            self.notifier.as_ref(),
            &self.session,
            &mut self.orders,
        )
    }

    pub fn reviews(&mut self) -> ReviewService<'_> {
        ReviewService::new(
            &self.api,
            self.notifier.as_ref(),
            &self.session,
            &mut self.testimonials,
        )
    }
}
