//! Exchange-rate lookup.
//!
//! The ledger never computes rates itself. A [`RateProvider`] is handed to
//! each balance query, which keeps the lookup out of global state and lets
//! tests substitute a fixed [`table::FxRateTable`].

pub mod snapshot;
pub mod table;

use crate::core::currency::CurrencyCode;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors arising from FX rate lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    #[error("no FX rate available for {from} -> {to}")]
    RateNotFound {
        from: CurrencyCode,
        to: CurrencyCode,
    },

    #[error("unknown currency {0}")]
    UnknownCurrency(CurrencyCode),

    #[error("FX rate must be positive, got {rate} for {from} -> {to}")]
    InvalidRate {
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    },

    #[error("rate provider error: {0}")]
    Provider(String),
}

/// Source of point-in-time exchange rates.
///
/// `rate(base, target)` is the number of `target` units one `base` unit buys.
/// Implementations may block on I/O; callers bound the call if needed.
pub trait RateProvider {
    fn rate(&self, base: &CurrencyCode, target: &CurrencyCode) -> Result<Decimal, FxError>;
}

impl<T: RateProvider + ?Sized> RateProvider for &T {
    fn rate(&self, base: &CurrencyCode, target: &CurrencyCode) -> Result<Decimal, FxError> {
        (**self).rate(base, target)
    }
}

/// Provider used when no rate source is configured: every lookup fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRates;

impl RateProvider for NoRates {
    fn rate(&self, base: &CurrencyCode, target: &CurrencyCode) -> Result<Decimal, FxError> {
        Err(FxError::RateNotFound {
            from: base.clone(),
            to: target.clone(),
        })
    }
}
