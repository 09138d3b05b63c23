//! Cart service.
//!
//! The server cart is authoritative. Every mutation is one or more API calls
//! followed by a single refetch that replaces the local mirror.

use tracing::instrument;

use hawk_leather_core::ProductId;

use crate::api::ApiClient;
use crate::api::types::QuantityAction;
use crate::error::{StorefrontError, add_breadcrumb};
use crate::models::{Cart, Product, Session};
use crate::notify::Notifier;
use crate::services::surface;

/// Cart operations for the signed-in user.
pub struct CartService<'a> {
    api: &'a ApiClient,
    notifier: &'a dyn Notifier,
    session: &'a Session,
    cart: &'a mut Cart,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub fn new(
        api: &'a ApiClient,
        notifier: &'a dyn Notifier,
        session: &'a Session,
        cart: &'a mut Cart,
    ) -> Self {
        Self {
            api,
            notifier,
            session,
            cart,
        }
    }

    /// The local cart mirror.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        self.cart
    }

    /// Replace the local cart with the server cart.
    ///
    /// Signed out, the cart is emptied instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails; the local cart is left unchanged.
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<(), StorefrontError> {
        let Ok(token) = self.session.token() else {
            self.cart.clear();
            return Ok(());
        };

        self.cart.set_loading(true);
        let fetched = self.api.get_cart(token).await;
        self.cart.set_loading(false);

        let snapshot = fetched?;
        tracing::debug!(lines = snapshot.items.len(), "Cart refreshed");
        self.cart.replace(snapshot.items, snapshot.summary);
        Ok(())
    }

    /// Refetch after a successful mutation. A failed refetch is logged and
    /// the stale mirror kept; the mutation itself already succeeded.
    async fn reload(&mut self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "Failed to refetch cart");
        }
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns `StorefrontError::NotAuthenticated` when signed out, or the
    /// API error if the backend refuses.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add(&mut self, product: &Product) -> Result<(), StorefrontError> {
        let Ok(token) = self.session.token() else {
            self.notifier.error("Please login to add items to cart");
            return Err(StorefrontError::NotAuthenticated);
        };

        add_breadcrumb("cart", "Add to cart", Some(&[("product_id", product.id.as_str())]));
        self.api
            .add_to_cart(token, &product.id, 1)
            .await
            .map_err(|e| surface(self.notifier, e, "Failed to add to cart"))?;

        self.reload().await;
        self.notifier
            .success(&format!("{} added to cart", product.name));
        Ok(())
    }

    /// Remove a product's line entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if signed out or the backend refuses.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove(&mut self, product_id: &ProductId) -> Result<(), StorefrontError> {
        const FALLBACK: &str = "Failed to remove item";

        let token = self
            .session
            .token()
            .map_err(|e| surface(self.notifier, e, FALLBACK))?;

        add_breadcrumb("cart", "Remove from cart", Some(&[("product_id", product_id.as_str())]));
        self.api
            .remove_from_cart(token, product_id)
            .await
            .map_err(|e| surface(self.notifier, e, FALLBACK))?;

        self.reload().await;
        self.notifier.success("Item removed from cart");
        Ok(())
    }

    /// Set a line's quantity.
    ///
    /// Products not in the cart are ignored. A target of zero or less removes
    /// the line. Otherwise one increase or decrease call is made per unit of
    /// difference, in sequence, followed by one refetch. The first failing
    /// call stops the sequence without a refetch.
    ///
    /// # Errors
    ///
    /// Returns an error if signed out or any step call fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), StorefrontError> {
        const FALLBACK: &str = "Failed to update quantity";

        let Some(current) = self.cart.find(product_id).map(|item| item.quantity) else {
            tracing::debug!("Quantity change for product not in cart ignored");
            return Ok(());
        };

        if quantity <= 0 {
            return self.remove(product_id).await;
        }

        let (action, steps) = quantity_steps(current, quantity);
        let token = self
            .session
            .token()
            .map_err(|e| surface(self.notifier, e, FALLBACK))?;

        let target = quantity.to_string();
        add_breadcrumb(
            "cart",
            "Update quantity",
            Some(&[
                ("product_id", product_id.as_str()),
                ("quantity", target.as_str()),
            ]),
        );

        for _ in 0..steps {
            self.api
                .step_quantity(token, product_id, action)
                .await
                .map_err(|e| surface(self.notifier, e, FALLBACK))?;
        }

        self.reload().await;
        Ok(())
    }

    /// Empty the local mirror only, after an order consumed the server cart.
    pub fn clear(&mut self) {
        self.cart.clear();
    }
}

/// Direction and number of single-unit calls to move from `current` to
/// `target` (which must be positive).
fn quantity_steps(current: u32, target: i64) -> (QuantityAction, u64) {
    let diff = target - i64::from(current);
    let action = if diff > 0 {
        QuantityAction::Increase
    } else {
        QuantityAction::Decrease
    };
    (action, diff.unsigned_abs())
}
