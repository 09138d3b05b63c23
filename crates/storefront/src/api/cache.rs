//! Cache types for catalog reads.

use hawk_leather_core::{Gender, ProductId};

use crate::models::Product;

/// Cache key for product reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// Product list with its server-side filters.
    Products {
        category: Option<String>,
        gender: Option<Gender>,
    },
    /// A single product.
    Product(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
}
