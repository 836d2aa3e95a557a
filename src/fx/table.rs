use crate::core::currency::CurrencyCode;
use crate::fx::{FxError, RateProvider};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Fixed table of exchange rates.
///
/// Stores direct rates and their inverses. Mostly used as a deterministic
/// provider in tests and demos.
///
/// # Examples
///
/// ```
/// use split_ledger::core::currency::CurrencyCode;
/// use split_ledger::fx::table::FxRateTable;
/// use split_ledger::fx::RateProvider;
/// use rust_decimal_macros::dec;
///
/// let mut rates = FxRateTable::new();
/// rates.set_rate(CurrencyCode::new("SGD"), CurrencyCode::new("EUR"), dec!(0.5)).unwrap();
///
/// let rate = rates.rate(&CurrencyCode::new("EUR"), &CurrencyCode::new("SGD")).unwrap();
/// assert_eq!(rate, dec!(2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FxRateTable {
    /// Direct rates: (from, to) -> rate.
    rates: HashMap<(CurrencyCode, CurrencyCode), Decimal>,
}

impl FxRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a direct exchange rate: 1 unit of `from` = `rate` units of `to`.
    pub fn set_rate(
        &mut self,
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    ) -> Result<(), FxError> {
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate { from, to, rate });
        }
        self.rates.insert((from.clone(), to.clone()), rate);
        self.rates.insert((to, from), Decimal::ONE / rate);
        Ok(())
    }

    /// Builder-style [`Self::set_rate`].
    pub fn with_rate(mut self, from: &str, to: &str, rate: Decimal) -> Result<Self, FxError> {
        self.set_rate(CurrencyCode::new(from), CurrencyCode::new(to), rate)?;
        Ok(self)
    }
}

impl RateProvider for FxRateTable {
    fn rate(&self, base: &CurrencyCode, target: &CurrencyCode) -> Result<Decimal, FxError> {
        if base == target {
            return Ok(Decimal::ONE);
        }
        self.rates
            .get(&(base.clone(), target.clone()))
            .copied()
            .ok_or_else(|| FxError::RateNotFound {
                from: base.clone(),
                to: target.clone(),
            })
    }
}
