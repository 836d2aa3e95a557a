//! Rates taken from a "latest rates" snapshot.
//!
//! The snapshot format is the one served by common free currency APIs:
//!
//! ```json
//! { "data": { "USD": 1, "EUR": 0.92, "SGD": 1.35 } }
//! ```
//!
//! Every rate is quoted against the same provider base, so the rate from
//! `base` to `target` is `data[target] / data[base]`. A payload carrying an
//! `"error"` object is rejected.

use crate::core::currency::CurrencyCode;
use crate::fx::{FxError, RateProvider};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct Payload {
    #[serde(default)]
    data: Option<HashMap<String, f64>>,
    #[serde(default)]
    error: Option<ProviderMessage>,
}

#[derive(Debug, Deserialize)]
struct ProviderMessage {
    #[serde(default)]
    message: Option<String>,
}

/// Rates quoted against a single provider base, as of one point in time.
#[derive(Debug, Clone, Default)]
pub struct RateSnapshot {
    quotes: HashMap<CurrencyCode, Decimal>,
}

impl RateSnapshot {
    /// Parse a snapshot payload.
    pub fn from_json(json: &str) -> Result<Self, FxError> {
        let payload: Payload = serde_json::from_str(json)
            .map_err(|e| FxError::Provider(format!("malformed rate payload: {}", e)))?;

        if let Some(error) = payload.error {
            return Err(FxError::Provider(
                error
                    .message
                    .unwrap_or_else(|| "unknown API error".to_string()),
            ));
        }

        let data = payload
            .data
            .filter(|d| !d.is_empty())
            .ok_or_else(|| FxError::Provider("no exchange rate data found".to_string()))?;

        let mut quotes = HashMap::with_capacity(data.len());
        for (code, value) in data {
            let quote = Decimal::from_f64(value).ok_or_else(|| {
                FxError::Provider(format!("unrepresentable rate {} for {}", value, code))
            })?;
            quotes.insert(CurrencyCode::new(code.to_ascii_uppercase()), quote);
        }
        Ok(Self { quotes })
    }

    /// Read and parse a snapshot file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FxError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            FxError::Provider(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Currencies quoted in this snapshot.
    pub fn currencies(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.quotes.keys()
    }

    fn quote(&self, code: &CurrencyCode) -> Result<Decimal, FxError> {
        self.quotes
            .get(code)
            .copied()
            .ok_or_else(|| FxError::UnknownCurrency(code.clone()))
    }
}

impl RateProvider for RateSnapshot {
    fn rate(&self, base: &CurrencyCode, target: &CurrencyCode) -> Result<Decimal, FxError> {
        let base_quote = self.quote(base)?;
        let target_quote = self.quote(target)?;
        if base_quote <= Decimal::ZERO {
            return Err(FxError::InvalidRate {
                from: base.clone(),
                to: target.clone(),
                rate: base_quote,
            });
        }
        Ok(target_quote / base_quote)
    }
}
