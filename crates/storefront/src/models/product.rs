//! Catalog product.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use hawk_leather_core::{Gender, Price, ProductId, discounted_price};

/// A product as shown in listings and on the detail screen.
///
/// `price` is the list price (MRP); `discounted_price` is what the customer
/// pays. The two are always consistent with `discount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub gender: Option<Gender>,
    pub price: Decimal,
    pub discounted_price: Decimal,
    pub image_url: String,
    pub description: String,
    pub features: Vec<String>,
    pub in_stock: bool,
    /// Discount percentage (0-100).
    pub discount: Decimal,
}

impl Product {
    /// Build a product, deriving the payable price from the discount.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ProductId,
        name: String,
        category: String,
        gender: Option<Gender>,
        price: Decimal,
        discount: Decimal,
        image_url: String,
        description: String,
        features: Vec<String>,
        in_stock: bool,
    ) -> Self {
        Self {
            id,
            name,
            category,
            gender,
            price,
            discounted_price: discounted_price(price, discount),
            image_url,
            description,
            features,
            in_stock,
            discount,
        }
    }

    /// List price (MRP).
    #[must_use]
    pub fn list_price(&self) -> Price {
        Price::inr(self.price)
    }

    /// Payable price after discount.
    #[must_use]
    pub fn payable_price(&self) -> Price {
        Price::inr(self.discounted_price)
    }

    /// Whether a discount applies.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount > Decimal::ZERO
    }

    /// Case-insensitive category match.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category.trim())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn wallet(discount: &str) -> Product {
        Product::new(
            ProductId::new("p-wallet"),
            "Bifold Wallet".to_string(),
            "Wallets".to_string(),
            Some(Gender::Men),
            "1500".parse().unwrap(),
            discount.parse().unwrap(),
            "https://img.example/wallet.jpg".to_string(),
            String::new(),
            vec![],
            true,
        )
    }

    #[test]
    fn test_new_derives_discounted_price() {
        let product = wallet("10");
        assert_eq!(product.discounted_price, "1350".parse::<Decimal>().unwrap());
        assert!(product.has_discount());
        assert_eq!(product.payable_price().display(), "₹1,350.00");
        assert_eq!(product.list_price().display(), "₹1,500.00");
    }

    #[test]
    fn test_no_discount() {
        let product = wallet("0");
        assert_eq!(product.discounted_price, product.price);
        assert!(!product.has_discount());
    }

    #[test]
    fn test_in_category_ignores_case() {
        let product = wallet("0");
        assert!(product.in_category("wallets"));
        assert!(product.in_category(" WALLETS "));
        assert!(!product.in_category("belts"));
    }
}
