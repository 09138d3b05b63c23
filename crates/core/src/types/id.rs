//! Newtype IDs for type-safe entity references.
//!
//! The backend identifies every record by an opaque string (a document ID).
//! Use the `define_id!` macro to create wrappers that prevent accidentally
//! passing an order ID where a product ID is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use hawk_leather_core::define_id;
/// define_id!(WishlistId);
/// define_id!(CouponId);
///
/// let wishlist = WishlistId::new("64f1c0ffee");
/// let coupon = CouponId::new("64f1c0ffee");
///
/// // Same underlying value, different types - this won't compile:
/// // let _: WishlistId = coupon;
/// assert_eq!(wishlist.as_str(), coupon.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);
define_id!(ProductId);
define_id!(OrderId);
define_id!(OrderItemId);
define_id!(CartLineId);
define_id!(ReviewId);

/// Number of trailing ID characters shown as the customer-facing order number.
const ORDER_NUMBER_LEN: usize = 8;

impl OrderId {
    /// Short, customer-facing order number: the last 8 characters, uppercased.
    ///
    /// IDs shorter than 8 characters are used whole.
    ///
    /// ```rust
    /// # use hawk_leather_core::OrderId;
    /// let id = OrderId::new("6650a1b2c3d4e5f6a7b8c9d0");
    /// assert_eq!(id.order_number(), "A7B8C9D0");
    /// ```
    #[must_use]
    pub fn order_number(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let start = chars.len().saturating_sub(ORDER_NUMBER_LEN);
        chars
            .get(start..)
            .unwrap_or_default()
            .iter()
            .collect::<String>()
            .to_uppercase()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_uses_last_eight_chars() {
        let id = OrderId::new("66a0f3e9b1c2d3e4f5a6b7c8");
        assert_eq!(id.order_number(), "F5A6B7C8");
    }

    #[test]
    fn test_order_number_short_id() {
        assert_eq!(OrderId::new("ab12").order_number(), "AB12");
        assert_eq!(OrderId::new("").order_number(), "");
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id = ProductId::new("665f00aa");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"665f00aa\"");

        let parsed: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_display_and_conversions() {
        let id = UserId::from("u-1");
        assert_eq!(id.to_string(), "u-1");
        assert_eq!(String::from(id.clone()), "u-1");
        assert_eq!(id.as_ref(), "u-1");
    }
}
