use crate::core::expense::ExpenseRecord;
use crate::core::participant::ParticipantId;
use crate::error::AmountOverflow;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net balance of each participant in a group.
///
/// A positive balance means the participant is owed money (net creditor).
/// A negative balance means the participant owes money (net debtor).
///
/// Balances are derived data: they are recomputed from the expense records
/// on every query and never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances {
    positions: BTreeMap<ParticipantId, Decimal>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `amount` from `debtor` to `creditor`.
    ///
    /// On overflow neither balance changes.
    pub fn transfer(
        &mut self,
        debtor: &ParticipantId,
        creditor: &ParticipantId,
        amount: Decimal,
    ) -> Result<(), AmountOverflow> {
        let debited = self
            .balance(debtor)
            .checked_sub(amount)
            .ok_or(AmountOverflow)?;
        let before = if creditor == debtor {
            debited
        } else {
            self.balance(creditor)
        };
        let credited = before.checked_add(amount).ok_or(AmountOverflow)?;

        self.positions.insert(debtor.clone(), debited);
        self.positions.insert(creditor.clone(), credited);
        Ok(())
    }

    /// Apply one expense: every participant other than the payer owes the
    /// payer one share.
    pub fn apply_expense(&mut self, record: &ExpenseRecord) -> Result<(), AmountOverflow> {
        let share = record.share();
        for participant in record.participants() {
            if participant == record.payer() {
                continue;
            }
            self.transfer(participant, record.payer(), share)?;
        }
        Ok(())
    }

    /// Net balance of a participant; zero for participants never seen.
    pub fn balance(&self, participant: &ParticipantId) -> Decimal {
        self.positions
            .get(participant)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// All balances, ordered by participant.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Decimal)> {
        self.positions.iter().map(|(p, &v)| (p, v))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of all balances. Zero for any balances produced by accumulation.
    pub fn total(&self) -> Decimal {
        self.positions.values().copied().sum()
    }

    /// Whether every balance is within `tolerance` of zero.
    pub fn is_settled(&self, tolerance: Decimal) -> bool {
        self.positions.values().all(|v| v.abs() <= tolerance)
    }

    /// Number of participants whose balance exceeds `tolerance` in magnitude.
    pub fn open_count(&self, tolerance: Decimal) -> usize {
        self.positions
            .values()
            .filter(|v| v.abs() > tolerance)
            .count()
    }

    /// Total amount that has to change hands: sum of positive balances.
    pub fn total_outstanding(&self) -> Decimal {
        self.positions
            .values()
            .filter(|v| **v > Decimal::ZERO)
            .sum()
    }
}

impl FromIterator<(ParticipantId, Decimal)> for Balances {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, Decimal)>>(iter: T) -> Self {
        let mut balances = Balances::new();
        for (participant, amount) in iter {
            *balances
                .positions
                .entry(participant)
                .or_insert(Decimal::ZERO) += amount;
        }
        balances
    }
}

/// Output of [`BalanceAccumulator::accumulate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Accumulation {
    /// Net balance per participant.
    pub balances: Balances,
    /// Total amount fronted per payer, not netted.
    pub expenditures: BTreeMap<ParticipantId, Decimal>,
}

/// Folds a group's expense records into net balances.
pub struct BalanceAccumulator;

impl BalanceAccumulator {
    /// Accumulate balances and per-payer expenditures.
    ///
    /// # Algorithm
    ///
    /// For each record, `share = amount / |participants|`. Each participant
    /// other than the payer is debited one share and the payer credited the
    /// same. The payer's expenditure grows by the full amount.
    ///
    /// The result does not depend on record order beyond Decimal rounding
    /// in the last digit.
    ///
    /// Fails with [`AmountOverflow`] when the group's total spend does not
    /// fit in a `Decimal`. Every balance and expenditure is bounded by that
    /// total.
    pub fn accumulate<'a, I>(records: I) -> Result<Accumulation, AmountOverflow>
    where
        I: IntoIterator<Item = &'a ExpenseRecord>,
    {
        let mut accumulation = Accumulation::default();
        let mut total = Decimal::ZERO;
        for record in records {
            total = total.checked_add(record.amount()).ok_or(AmountOverflow)?;
            accumulation.balances.apply_expense(record)?;

            let spent = accumulation
                .expenditures
                .entry(record.payer().clone())
                .or_insert(Decimal::ZERO);
            *spent = spent.checked_add(record.amount()).ok_or(AmountOverflow)?;
        }
        Ok(accumulation)
    }
}
