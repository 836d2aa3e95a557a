//! Orchestration of recording expenses and answering balance queries.

use crate::core::balance::{BalanceAccumulator, Balances};
use crate::core::currency::{Conversion, CurrencyCode};
use crate::core::expense::{ExpenseDraft, ExpenseId, ExpenseRecord};
use crate::core::participant::{GroupId, ParticipantId};
use crate::error::{AmountOverflow, Result, ValidationError};
use crate::fx::{FxError, RateProvider};
use crate::settlement::engine::{SettlementEngine, SettlementInstruction};
use crate::store::{CurrencySettings, ExpenseStore};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Balances and settlement for one group, in one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Currency every figure below is denominated in.
    pub currency: CurrencyCode,
    /// Set when figures were converted out of the home currency.
    pub conversion: Option<Conversion>,
    /// Net balance per participant.
    pub balances: Balances,
    /// Payments that settle every balance.
    pub instructions: Vec<SettlementInstruction>,
    /// Total amount fronted per payer.
    pub expenditures: BTreeMap<ParticipantId, Decimal>,
}

/// Result of a balance query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BalanceOutcome {
    /// The group has no recorded expenses. Not a failure.
    NoExpenses,
    Computed(BalanceSummary),
}

impl BalanceOutcome {
    pub fn summary(&self) -> Option<&BalanceSummary> {
        match self {
            BalanceOutcome::NoExpenses => None,
            BalanceOutcome::Computed(summary) => Some(summary),
        }
    }
}

/// Records expenses and computes who owes whom.
///
/// Holds no derived state: every query re-reads the group's records, so
/// the service may be shared freely across threads when its stores allow.
///
/// # Examples
///
/// ```
/// use split_ledger::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let service = LedgerService::new(InMemoryExpenseStore::new(), InMemoryCurrencySettings::new());
/// let group = GroupId::new("trip");
/// service.set_currency(&group, "sgd").unwrap();
/// service
///     .record_expense(&group, ExpenseDraft::new("Dinner", "A", dec!(90), ["A", "B", "C"]))
///     .unwrap();
///
/// let outcome = service.compute_balances(&group, None, &NoRates).unwrap();
/// assert_eq!(outcome.summary().unwrap().instructions.len(), 2);
/// ```
#[derive(Debug)]
pub struct LedgerService<S, C> {
    expenses: S,
    currencies: C,
    engine: SettlementEngine,
}

impl<S: ExpenseStore, C: CurrencySettings> LedgerService<S, C> {
    pub fn new(expenses: S, currencies: C) -> Self {
        Self::with_engine(expenses, currencies, SettlementEngine::default())
    }

    pub fn with_engine(expenses: S, currencies: C, engine: SettlementEngine) -> Self {
        Self {
            expenses,
            currencies,
            engine,
        }
    }

    pub fn engine(&self) -> &SettlementEngine {
        &self.engine
    }

    /// Set the home currency of a group. Accepts any case, e.g. `"sgd"`.
    pub fn set_currency(&self, group: &GroupId, code: &str) -> Result<CurrencyCode> {
        let currency = CurrencyCode::parse(code).map_err(|e| {
            warn!("rejected currency '{}' for group {}", code, group);
            e
        })?;
        self.currencies.set(group, currency.clone())?;
        info!("group {} currency set to {}", group, currency);
        Ok(currency)
    }

    /// Home currency of a group, if one has been set.
    pub fn currency(&self, group: &GroupId) -> Result<Option<CurrencyCode>> {
        Ok(self.currencies.get(group)?)
    }

    /// Validate and persist an expense.
    ///
    /// Fails with [`ValidationError::CurrencyNotSet`] until the group has a
    /// home currency.
    pub fn record_expense(&self, group: &GroupId, draft: ExpenseDraft) -> Result<ExpenseId> {
        if self.currencies.get(group)?.is_none() {
            warn!("rejected expense for group {}: no currency set", group);
            return Err(ValidationError::CurrencyNotSet(group.clone()).into());
        }

        let expense = draft.validate(group.clone()).map_err(|e| {
            warn!("rejected expense for group {}: {}", group, e);
            e
        })?;
        let amount = expense.amount();
        let id = self.expenses.append(expense)?;
        info!("recorded expense {} of {} for group {}", id, amount, group);
        Ok(id)
    }

    /// All expense records of a group, in insertion order.
    pub fn expenses(&self, group: &GroupId) -> Result<Vec<ExpenseRecord>> {
        Ok(self.expenses.fetch_all(group)?)
    }

    /// Compute balances and settlement instructions for a group.
    ///
    /// With a `target` currency, the rate from the home currency is looked
    /// up once and every raw expense amount is converted before shares are
    /// taken, so expenditures are reported in the target currency too. A
    /// failed lookup fails the whole query. A group with no expenses yields
    /// [`BalanceOutcome::NoExpenses`] without consulting `rates`.
    pub fn compute_balances(
        &self,
        group: &GroupId,
        target: Option<&CurrencyCode>,
        rates: &dyn RateProvider,
    ) -> Result<BalanceOutcome> {
        let records = self.expenses.fetch_all(group)?;
        if records.is_empty() {
            debug!("group {} has no expenses", group);
            return Ok(BalanceOutcome::NoExpenses);
        }

        let home = self
            .currencies
            .get(group)?
            .ok_or_else(|| ValidationError::CurrencyNotSet(group.clone()))?;

        let (currency, conversion, records) = match target {
            Some(target) if *target != home => {
                let rate = rates.rate(&home, target).map_err(|e| {
                    warn!("rate lookup {} -> {} failed: {}", home, target, e);
                    e
                })?;
                if rate <= Decimal::ZERO {
                    return Err(FxError::InvalidRate {
                        from: home,
                        to: target.clone(),
                        rate,
                    }
                    .into());
                }
                debug!("converting group {} from {} to {} at {}", group, home, target, rate);
                let converted = records
                    .iter()
                    .map(|r| r.converted(rate))
                    .collect::<std::result::Result<Vec<ExpenseRecord>, AmountOverflow>>()
                    .map_err(|e| {
                        warn!("converting group {} to {} overflowed", group, target);
                        e
                    })?;
                let conversion = Conversion {
                    from: home,
                    to: target.clone(),
                    rate,
                };
                (target.clone(), Some(conversion), converted)
            }
            _ => (home, None, records),
        };

        let accumulation = BalanceAccumulator::accumulate(&records).map_err(|e| {
            warn!("balances of group {} overflowed", group);
            e
        })?;
        let instructions = self.engine.settle(&accumulation.balances);
        debug!(
            "group {}: {} records, {} instructions",
            group,
            records.len(),
            instructions.len()
        );

        Ok(BalanceOutcome::Computed(BalanceSummary {
            currency,
            conversion,
            balances: accumulation.balances,
            instructions,
            expenditures: accumulation.expenditures,
        }))
    }
}
