use crate::error::{AmountOverflow, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217-style currency code.
///
/// Each group has exactly one home currency at any time; expense amounts
/// are always denominated in it.
///
/// # Examples
///
/// ```
/// use split_ledger::core::currency::CurrencyCode;
///
/// let sgd = CurrencyCode::parse(" sgd ").unwrap();
/// assert_eq!(sgd, CurrencyCode::new("SGD"));
/// assert!(CurrencyCode::parse("dollars").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Parse a currency code from user input.
    ///
    /// The input is trimmed and uppercased; the result must be exactly
    /// three ASCII letters.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let code = raw.trim().to_ascii_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
            Ok(Self(code))
        } else {
            Err(ValidationError::InvalidCurrency(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Rescale an amount by an exchange rate: 1 unit of the source currency is
/// worth `rate` units of the target.
pub fn convert(amount: Decimal, rate: Decimal) -> Result<Decimal, AmountOverflow> {
    amount.checked_mul(rate).ok_or(AmountOverflow)
}

/// A re-denomination applied to a balance query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    /// The group's home currency.
    pub from: CurrencyCode,
    /// The currency the figures were converted into.
    pub to: CurrencyCode,
    /// 1 `from` = `rate` `to`, as observed when the query ran.
    pub rate: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_currency_code_equality() {
        let a = CurrencyCode::new("USD");
        let b = CurrencyCode::new("USD");
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_uppercases() {
        assert_eq!(CurrencyCode::parse("eur").unwrap().as_str(), "EUR");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(
            CurrencyCode::parse("US"),
            Err(ValidationError::InvalidCurrency("US".to_string()))
        );
        assert!(CurrencyCode::parse("US1").is_err());
        assert!(CurrencyCode::parse("").is_err());
        assert!(CurrencyCode::parse("EURO").is_err());
    }

    #[test]
    fn test_convert() {
        assert_eq!(convert(dec!(90), dec!(0.74)), Ok(dec!(66.60)));
        assert_eq!(convert(dec!(12.5), Decimal::ONE), Ok(dec!(12.5)));
    }

    #[test]
    fn test_convert_overflow() {
        let amount = Decimal::from_str("50000000000000000000000000000").unwrap();
        assert_eq!(convert(amount, dec!(11000)), Err(AmountOverflow));
    }
}
