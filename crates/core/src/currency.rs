//! Currency - Type-safe ISO-4217-style currency codes
//!
//! Common hub currencies are pre-defined; anything else goes through the
//! validated `Other` variant (exactly three ASCII letters).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing currency codes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    #[error("Empty currency code")]
    EmptyCode,

    #[error("Currency code must be exactly 3 letters: {0}")]
    InvalidFormat(String),
}

/// Currency codes
///
/// Currencies a settlement hub commonly clears are pre-defined for type
/// safety; other ISO codes use the `Other` variant.
///
/// # Examples
/// ```
/// use hubadmin_core::Currency;
///
/// let usd: Currency = "USD".parse().unwrap();
/// assert_eq!(usd, Currency::Usd);
///
/// // Any other 3-letter code
/// let custom: Currency = "ZAR".parse().unwrap();
/// assert!(matches!(custom, Currency::Other(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// British Pound
    Gbp,
    /// Japanese Yen
    Jpy,
    /// Kenyan Shilling
    Kes,
    /// Tanzanian Shilling
    Tzs,
    /// Ugandan Shilling
    Ugx,
    /// Zambian Kwacha
    Zmw,
    /// Malawian Kwacha
    Mwk,
    /// Any other 3-letter ISO code
    Other(String),
}

impl Currency {
    /// Returns the currency code as a string slice
    pub fn code(&self) -> &str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Kes => "KES",
            Currency::Tzs => "TZS",
            Currency::Ugx => "UGX",
            Currency::Zmw => "ZMW",
            Currency::Mwk => "MWK",
            Currency::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();

        if s.is_empty() {
            return Err(CurrencyError::EmptyCode);
        }

        if s.len() != 3 || !s.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CurrencyError::InvalidFormat(s));
        }

        Ok(match s.as_str() {
            "USD" => Currency::Usd,
            "EUR" => Currency::Eur,
            "GBP" => Currency::Gbp,
            "JPY" => Currency::Jpy,
            "KES" => Currency::Kes,
            "TZS" => Currency::Tzs,
            "UGX" => Currency::Ugx,
            "ZMW" => Currency::Zmw,
            "MWK" => Currency::Mwk,
            _ => Currency::Other(s),
        })
    }
}

impl TryFrom<String> for Currency {
    type Error = CurrencyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_currencies() {
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!("KES".parse::<Currency>().unwrap(), Currency::Kes);
    }

    #[test]
    fn test_parse_other_code() {
        let other: Currency = "ZAR".parse().unwrap();
        assert_eq!(other, Currency::Other("ZAR".to_string()));
        assert_eq!(other.to_string(), "ZAR");
    }

    #[test]
    fn test_display() {
        assert_eq!(Currency::Usd.to_string(), "USD");
        assert_eq!(Currency::Other("ZAR".to_string()).to_string(), "ZAR");
    }

    #[test]
    fn test_empty_code_error() {
        let result: Result<Currency, _> = "".parse();
        assert!(matches!(result, Err(CurrencyError::EmptyCode)));
    }

    #[test]
    fn test_invalid_format_error() {
        assert!(matches!(
            "US".parse::<Currency>(),
            Err(CurrencyError::InvalidFormat(_))
        ));
        assert!(matches!(
            "USDT".parse::<Currency>(),
            Err(CurrencyError::InvalidFormat(_))
        ));
        assert!(matches!(
            "U5D".parse::<Currency>(),
            Err(CurrencyError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_serde_roundtrip() {
        let currencies = vec![Currency::Usd, Currency::Eur, Currency::Other("ZAR".to_string())];

        for currency in currencies {
            let json = serde_json::to_string(&currency).unwrap();
            let parsed: Currency = serde_json::from_str(&json).unwrap();
            assert_eq!(currency, parsed);
        }
    }
}
