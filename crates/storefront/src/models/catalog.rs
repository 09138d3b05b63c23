//! Fetched product catalog with client-side filtering.

use hawk_leather_core::pagination::{FEATURED_PRODUCT_COUNT, PRODUCTS_PER_PAGE};
use hawk_leather_core::{Gender, Page, Paginator, ProductId};

use super::product::Product;

/// Local filter over the fetched catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub gender: Option<Gender>,
}

impl ProductFilter {
    /// Whether `product` passes the filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| product.in_category(category));
        let gender_ok = self
            .gender
            .is_none_or(|gender| product.gender == Some(gender));
        category_ok && gender_ok
    }
}

/// Products as last loaded.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    loaded: bool,
    is_loading: bool,
    load_error: Option<String>,
}

impl Catalog {
    /// Whether at least one load has succeeded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message from the last failed fetch, cleared by the next attempt.
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Every loaded product, in backend order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The products featured on the home screen.
    #[must_use]
    pub fn featured(&self) -> &[Product] {
        let end = self.products.len().min(FEATURED_PRODUCT_COUNT);
        self.products.get(..end).unwrap_or_default()
    }

    /// Look up a loaded product.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Products passing `filter`, in backend order.
    #[must_use]
    pub fn filtered(&self, filter: &ProductFilter) -> Vec<Product> {
        self.products
            .iter()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect()
    }

    /// Distinct category names, in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen
                .iter()
                .any(|category| category.eq_ignore_ascii_case(&product.category))
            {
                seen.push(&product.category);
            }
        }
        seen
    }

    pub(crate) fn replace(&mut self, products: Vec<Product>) {
        self.products = products;
        self.loaded = true;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub(crate) fn set_load_error(&mut self, error: Option<String>) {
        self.load_error = error;
    }
}

/// Six-per-page slice of a filtered product list.
#[must_use]
pub fn product_page(products: &[Product], page: usize) -> Page<'_, Product> {
    Paginator::new(PRODUCTS_PER_PAGE).page(products, page)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn product(id: &str, category: &str, gender: Option<Gender>) -> Product {
        Product::new(
            ProductId::new(id),
            format!("Item {id}"),
            category.to_string(),
            gender,
            Decimal::from(1000),
            Decimal::ZERO,
            String::new(),
            String::new(),
            vec![],
            true,
        )
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.replace(vec![
            product("1", "Bags", Some(Gender::Women)),
            product("2", "Wallets", Some(Gender::Men)),
            product("3", "bags", Some(Gender::Men)),
            product("4", "Belts", None),
            product("5", "Wallets", Some(Gender::Unisex)),
        ]);
        catalog
    }

    #[test]
    fn test_featured_is_first_four() {
        let catalog = catalog();
        let ids: Vec<&str> = catalog.featured().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert!(Catalog::default().featured().is_empty());
    }

    #[test]
    fn test_filter_by_category_is_case_insensitive() {
        let filter = ProductFilter {
            category: Some("BAGS".to_string()),
            gender: None,
        };
        let ids: Vec<String> = catalog()
            .filtered(&filter)
            .into_iter()
            .map(|p| p.id.into_inner())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_filter_by_gender_and_category() {
        let filter = ProductFilter {
            category: Some("bags".to_string()),
            gender: Some(Gender::Men),
        };
        let found = catalog().filtered(&filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "3");
    }

    #[test]
    fn test_categories_deduplicated() {
        assert_eq!(catalog().categories(), vec!["Bags", "Wallets", "Belts"]);
    }

    #[test]
    fn test_failed_reload_keeps_products() {
        let mut catalog = catalog();
        catalog.set_load_error(Some("Failed to load products".to_string()));

        assert!(catalog.is_loaded());
        assert_eq!(catalog.products().len(), 5);
        assert_eq!(catalog.load_error(), Some("Failed to load products"));

        catalog.set_load_error(None);
        assert!(catalog.load_error().is_none());
        assert!(!catalog.is_loading());
    }

    #[test]
    fn test_product_page_size() {
        let products: Vec<Product> = (0..13)
            .map(|i| product(&i.to_string(), "Bags", None))
            .collect();
        let page = product_page(&products, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total_pages, 3);
    }
}
