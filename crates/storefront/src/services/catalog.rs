//! Catalog service: fetch products, then filter and page them locally.

use tracing::instrument;

use hawk_leather_core::{Gender, Page, ProductId};

use crate::api::ApiClient;
use crate::error::StorefrontError;
use crate::models::{Catalog, Product, ProductFilter, product_page};
use crate::notify::Notifier;
use crate::services::surface;

const LOAD_FAILED: &str = "Failed to load products";
/// Shown in place of the listing after a failed load.
const LISTING_UNAVAILABLE: &str = "Failed to load products. Please try again later.";

pub struct CatalogService<'a> {
    api: &'a ApiClient,
    notifier: &'a dyn Notifier,
    catalog: &'a mut Catalog,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub fn new(api: &'a ApiClient, notifier: &'a dyn Notifier, catalog: &'a mut Catalog) -> Self {
        Self {
            api,
            notifier,
            catalog,
        }
    }

    /// The products as last loaded.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    /// Load products, optionally narrowed by the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch fails. The previous products are kept
    /// and the failure is recorded on the catalog.
    #[instrument(skip(self))]
    pub async fn load(
        &mut self,
        category: Option<&str>,
        gender: Option<Gender>,
    ) -> Result<&Catalog, StorefrontError> {
        self.catalog.set_loading(true);
        self.catalog.set_load_error(None);
        let fetched = self.api.list_products(category, gender).await;
        self.catalog.set_loading(false);

        match fetched {
            Ok(products) => {
                tracing::debug!(count = products.len(), "Catalog loaded");
                self.catalog.replace(products);
                Ok(self.catalog)
            }
            Err(e) => {
                self.catalog
                    .set_load_error(Some(LISTING_UNAVAILABLE.to_string()));
                // Backend text stays in the logs, never in the notice
                let error = StorefrontError::from(e);
                error.capture();
                self.notifier.error(LOAD_FAILED);
                Err(error)
            }
        }
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the fetch fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, StorefrontError> {
        self.api
            .get_product(id)
            .await
            .map_err(|e| surface(self.notifier, e, "Failed to load product"))
    }

    /// Products on the home screen.
    #[must_use]
    pub fn featured(&self) -> &[Product] {
        self.catalog.featured()
    }

    /// Filter the loaded products locally.
    #[must_use]
    pub fn filtered(&self, filter: &ProductFilter) -> Vec<Product> {
        self.catalog.filtered(filter)
    }
}

/// One page of an already-filtered listing.
#[must_use]
pub fn page(products: &[Product], page: usize) -> Page<'_, Product> {
    product_page(products, page)
}
