//! Stress testing utilities for the ledger.
//!
//! Generates random groups of expenses to exercise accumulation and
//! settlement at scale.

use crate::core::expense::{ExpenseDraft, ExpenseId, ExpenseRecord};
use crate::core::participant::GroupId;
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Number of people in the group.
    pub participant_count: usize,
    /// Number of expenses to generate.
    pub expense_count: usize,
    /// Smallest amount, in cents.
    pub min_cents: i64,
    /// Largest amount, in cents.
    pub max_cents: i64,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            participant_count: 6,
            expense_count: 20,
            min_cents: 100,
            max_cents: 50_000,
        }
    }
}

/// Generate a random group of valid expense records.
///
/// Every expense has a random payer and a random non-empty subset of the
/// group as participants, which may or may not include the payer.
pub fn generate_random_group(config: &GroupConfig) -> Vec<ExpenseRecord> {
    let mut rng = rand::thread_rng();
    let group = GroupId::new("stress");
    let people: Vec<String> = (0..config.participant_count.max(1))
        .map(|i| format!("P{:03}", i))
        .collect();
    let min = config.min_cents.max(1);
    let max = config.max_cents.max(min);

    let mut records = Vec::with_capacity(config.expense_count);
    let mut id = ExpenseId::new(0);
    for n in 0..config.expense_count {
        let payer = people[rng.gen_range(0..people.len())].clone();
        let share_count = rng.gen_range(1..=people.len());
        let participants: Vec<String> = people
            .choose_multiple(&mut rng, share_count)
            .cloned()
            .collect();
        let amount = Decimal::new(rng.gen_range(min..=max), 2);

        let Ok(expense) = ExpenseDraft::new(format!("expense {}", n), payer, amount, participants)
            .validate(group.clone())
        else {
            continue;
        };
        id = id.next();
        records.push(expense.into_record(id, Utc::now()));
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::balance::BalanceAccumulator;
    use crate::settlement::engine::{SettlementEngine, DEFAULT_TOLERANCE};

    #[test]
    fn test_random_group_generation() {
        let config = GroupConfig {
            participant_count: 5,
            expense_count: 15,
            ..Default::default()
        };

        let records = generate_random_group(&config);
        assert_eq!(records.len(), 15);
        assert!(records.iter().all(|r| r.amount() > Decimal::ZERO));
        assert!(records.iter().all(|r| !r.participants().is_empty()));
    }

    #[test]
    fn test_random_group_settles() {
        let config = GroupConfig {
            participant_count: 20,
            expense_count: 100,
            ..Default::default()
        };

        let records = generate_random_group(&config);
        let accumulation = BalanceAccumulator::accumulate(&records).unwrap();
        let engine = SettlementEngine::default();
        let instructions = engine.settle(&accumulation.balances);

        let open = accumulation.balances.open_count(DEFAULT_TOLERANCE);
        assert!(instructions.len() < open.max(1));
        let residual = SettlementEngine::residual(&accumulation.balances, &instructions).unwrap();
        assert!(residual.is_settled(DEFAULT_TOLERANCE));
    }
}
