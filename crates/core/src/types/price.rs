//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices arrive from the backend as list prices (the MRP) together
//! with a discount percentage. The payable amount is always derived here so
//! every screen agrees on it.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Compute the payable price after a percentage discount.
///
/// `discounted = list × (1 − percent / 100)`. The result is not rounded;
/// rounding happens only for display and for gateway minor units.
///
/// ```rust
/// # use hawk_leather_core::discounted_price;
/// # use rust_decimal::Decimal;
/// assert_eq!(discounted_price(Decimal::from(2000), Decimal::from(25)), Decimal::from(1500));
/// ```
#[must_use]
pub fn discounted_price(list: Decimal, discount_percent: Decimal) -> Decimal {
    list - (list * discount_percent) / Decimal::ONE_HUNDRED
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the store's default currency.
    #[must_use]
    pub fn inr(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::INR)
    }

    /// Amount in minor units (paise, cents), rounded half away from zero.
    ///
    /// Returns `None` if the amount does not fit in an `i64`.
    #[must_use]
    pub fn to_minor_units(&self) -> Option<i64> {
        (self.amount * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
    }

    /// Format for display, e.g. `₹1,499.25`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let text = format!("{:.2}", rounded.abs());
        let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

        format!(
            "{}{}{}.{}",
            if negative { "-" } else { "" },
            self.currency_code.symbol(),
            group_thousands(whole),
            frac
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Insert a comma every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// ISO 4217 currency codes accepted by the payment gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INR" => Ok(Self::INR),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            other => Err(format!("unsupported currency: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_discounted_price_formula() {
        assert_eq!(discounted_price(dec("2499"), dec("20")), dec("1999.2"));
        assert_eq!(discounted_price(dec("1000"), dec("0")), dec("1000"));
        assert_eq!(discounted_price(dec("1000"), dec("100")), dec("0"));
    }

    #[test]
    fn test_discounted_price_fractional_discount() {
        assert_eq!(discounted_price(dec("1200"), dec("12.5")), dec("1050"));
    }

    #[test]
    fn test_minor_units_rounds_half_away_from_zero() {
        assert_eq!(Price::inr(dec("1999.2")).to_minor_units(), Some(199_920));
        assert_eq!(Price::inr(dec("10.005")).to_minor_units(), Some(1001));
        assert_eq!(Price::inr(dec("0")).to_minor_units(), Some(0));
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::inr(dec("1234567.5")).display(), "₹1,234,567.50");
        assert_eq!(Price::inr(dec("999")).display(), "₹999.00");
        assert_eq!(Price::inr(dec("1000")).display(), "₹1,000.00");
        assert_eq!(
            Price::new(dec("-12.345"), CurrencyCode::USD).display(),
            "-$12.35"
        );
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("inr".parse::<CurrencyCode>().unwrap(), CurrencyCode::INR);
        assert!("JPY".parse::<CurrencyCode>().is_err());
    }
}
