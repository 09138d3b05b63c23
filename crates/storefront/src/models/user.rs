//! Customer account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hawk_leather_core::{ShippingAddress, UserId};

/// The signed-in customer's profile.
///
/// Persisted to session storage after every successful fetch or update, so
/// the last known profile is available offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub occupation: String,
    pub email: String,
    pub phone_number: Option<u64>,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub pincode: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Avatar initials for the user's name.
    #[must_use]
    pub fn initials(&self) -> String {
        user_initials(&self.name)
    }

    /// Profile address as a checkout shipping address.
    #[must_use]
    pub fn shipping_address(&self) -> ShippingAddress {
        ShippingAddress {
            street: self.street_address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            pincode: self.pincode.map(|p| p.to_string()).unwrap_or_default(),
            phone: self.phone_number.map(|p| p.to_string()).unwrap_or_default(),
        }
    }
}

/// Initials for an avatar: the first letter of the first two words, or the
/// first two characters of a single-word name, uppercased.
#[must_use]
pub fn user_initials(name: &str) -> String {
    let mut words = name.split_whitespace();
    match (words.next(), words.next()) {
        (Some(first), Some(second)) => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .collect::<String>()
            .to_uppercase(),
        (Some(only), None) => only.chars().take(2).collect::<String>().to_uppercase(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials_two_words() {
        assert_eq!(user_initials("ravi kumar sharma"), "RK");
    }

    #[test]
    fn test_initials_single_word() {
        assert_eq!(user_initials("meera"), "ME");
        assert_eq!(user_initials("q"), "Q");
    }

    #[test]
    fn test_initials_blank() {
        assert_eq!(user_initials("   "), "");
    }

    #[test]
    fn test_shipping_address_from_profile() {
        let user = User {
            id: UserId::new("u1"),
            name: "Asha Rao".to_string(),
            occupation: String::new(),
            email: "asha@example.com".to_string(),
            phone_number: Some(9_876_543_210),
            street_address: "4 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: None,
            created_at: None,
            updated_at: None,
        };
        let address = user.shipping_address();
        assert_eq!(address.phone, "9876543210");
        assert_eq!(address.pincode, "");
        assert_eq!(address.street, "4 MG Road");
    }
}
