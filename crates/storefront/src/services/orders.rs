//! Order history service.

use tracing::instrument;

use hawk_leather_core::{OrderId, OrderStatus};

use crate::api::ApiClient;
use crate::error::StorefrontError;
use crate::models::{OrderBook, Session};
use crate::notify::Notifier;
use crate::services::surface;

const LOAD_FAILED: &str = "Failed to load orders";

pub struct OrderService<'a> {
    api: &'a ApiClient,
    notifier: &'a dyn Notifier,
    session: &'a Session,
    book: &'a mut OrderBook,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub fn new(
        api: &'a ApiClient,
        notifier: &'a dyn Notifier,
        session: &'a Session,
        book: &'a mut OrderBook,
    ) -> Self {
        Self {
            api,
            notifier,
            session,
            book,
        }
    }

    /// Orders as last loaded.
    #[must_use]
    pub fn book(&self) -> &OrderBook {
        self.book
    }

    /// Load the order history, optionally for one status.
    ///
    /// # Errors
    ///
    /// Returns an error if signed out or the fetch fails. The failure is
    /// also recorded on the order book.
    #[instrument(skip(self))]
    pub async fn load(&mut self, status: Option<OrderStatus>) -> Result<&OrderBook, StorefrontError> {
        let session = self.session;
        let token = session
            .token()
            .map_err(|e| surface(self.notifier, e, LOAD_FAILED))?;

        self.book.set_loading(true);
        self.book.set_load_error(None);
        let fetched = self.api.list_orders(token, status).await;
        self.book.set_loading(false);

        match fetched {
            Ok(history) => {
                tracing::debug!(count = history.orders.len(), "Orders loaded");
                self.book
                    .replace(history.orders, history.summary, history.total_orders);
                Ok(self.book)
            }
            Err(e) => {
                self.book.set_load_error(Some(LOAD_FAILED.to_string()));
                // Always the generic message, whatever the backend said
                let error = StorefrontError::from(e);
                error.capture();
                self.notifier.error(LOAD_FAILED);
                Err(error)
            }
        }
    }

    /// Cancel an order, then reload the history.
    ///
    /// # Errors
    ///
    /// Returns an error if signed out or the backend refuses.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn cancel(&mut self, order_id: &OrderId) -> Result<(), StorefrontError> {
        const FALLBACK: &str = "Failed to cancel order";

        let session = self.session;
        let token = session
            .token()
            .map_err(|e| surface(self.notifier, e, FALLBACK))?;

        self.api
            .cancel_order(token, order_id)
            .await
            .map_err(|e| surface(self.notifier, e, FALLBACK))?;

        self.notifier.success("Order cancelled successfully");
        if self.load(None).await.is_err() {
            tracing::warn!("Order cancelled but history reload failed");
        }
        Ok(())
    }
}
