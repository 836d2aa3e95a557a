use crate::core::balance::Balances;
use crate::core::participant::ParticipantId;
use crate::error::AmountOverflow;
use crate::report::format_amount;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Balances within this distance of zero are treated as settled.
pub const DEFAULT_TOLERANCE: Decimal = dec!(0.000000001);

/// A directive that `from` pays `to` the given `amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementInstruction {
    pub from: ParticipantId,
    pub to: ParticipantId,
    /// Always positive.
    pub amount: Decimal,
}

impl fmt::Display for SettlementInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} owes {} {}", self.from, self.to, format_amount(self.amount))
    }
}

/// Order in which creditors and debtors are paired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchingPolicy {
    /// Pair the largest creditor with the largest debtor first.
    ///
    /// Both sides are sorted by magnitude, descending; equal magnitudes
    /// are ordered by participant id, ascending.
    #[default]
    LargestFirst,
    /// Both sides kept in participant-id order and consumed from the back,
    /// with partially settled parties pushed back onto their list.
    LastInFirstOut,
}

/// Converts net balances into pairwise payment instructions.
///
/// Greedy netting: each round pairs one creditor with one debtor and
/// settles `min(credit, debt)` between them, fully resolving at least one
/// of the two. For `n` participants with a non-zero balance at most `n - 1`
/// instructions are produced. The instruction count is small in practice
/// but not provably minimal.
///
/// # Examples
///
/// ```
/// use split_ledger::core::balance::Balances;
/// use split_ledger::core::participant::ParticipantId;
/// use split_ledger::settlement::engine::SettlementEngine;
/// use rust_decimal_macros::dec;
///
/// let balances: Balances = vec![
///     (ParticipantId::new("A"), dec!(60)),
///     (ParticipantId::new("B"), dec!(-30)),
///     (ParticipantId::new("C"), dec!(-30)),
/// ]
/// .into_iter()
/// .collect();
///
/// let instructions = SettlementEngine::default().settle(&balances);
/// assert_eq!(instructions.len(), 2);
/// assert!(instructions.iter().all(|i| i.to.as_str() == "A"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementEngine {
    policy: MatchingPolicy,
    tolerance: Decimal,
}

impl Default for SettlementEngine {
    fn default() -> Self {
        Self::new(MatchingPolicy::default(), DEFAULT_TOLERANCE)
    }
}

impl SettlementEngine {
    pub fn new(policy: MatchingPolicy, tolerance: Decimal) -> Self {
        Self {
            policy,
            tolerance: tolerance.abs(),
        }
    }

    pub fn with_policy(policy: MatchingPolicy) -> Self {
        Self::new(policy, DEFAULT_TOLERANCE)
    }

    pub fn policy(&self) -> MatchingPolicy {
        self.policy
    }

    pub fn tolerance(&self) -> Decimal {
        self.tolerance
    }

    /// Compute settlement instructions for a set of balances.
    ///
    /// Participants whose balance is within the tolerance of zero take no
    /// part in matching, so no zero-amount instruction is ever emitted.
    pub fn settle(&self, balances: &Balances) -> Vec<SettlementInstruction> {
        let mut creditors = Vec::new();
        let mut debtors = Vec::new();
        for (participant, balance) in balances.iter() {
            if balance > self.tolerance {
                creditors.push((participant.clone(), balance));
            } else if balance < -self.tolerance {
                debtors.push((participant.clone(), -balance));
            }
        }

        debug!(
            "settling {} creditors against {} debtors ({:?})",
            creditors.len(),
            debtors.len(),
            self.policy
        );

        match self.policy {
            MatchingPolicy::LargestFirst => self.match_largest_first(creditors, debtors),
            MatchingPolicy::LastInFirstOut => self.match_last_in_first_out(creditors, debtors),
        }
    }

    /// Balances left over after every instruction has been paid.
    ///
    /// Each payment raises the payer's balance and lowers the payee's by the
    /// instruction amount. For instructions produced by [`Self::settle`] the
    /// result is zero for everyone, within the tolerance.
    pub fn residual(
        balances: &Balances,
        instructions: &[SettlementInstruction],
    ) -> Result<Balances, AmountOverflow> {
        let mut residual = balances.clone();
        for instruction in instructions {
            residual.transfer(&instruction.to, &instruction.from, instruction.amount)?;
        }
        Ok(residual)
    }

    fn match_largest_first(
        &self,
        mut creditors: Vec<(ParticipantId, Decimal)>,
        mut debtors: Vec<(ParticipantId, Decimal)>,
    ) -> Vec<SettlementInstruction> {
        let by_magnitude = |a: &(ParticipantId, Decimal), b: &(ParticipantId, Decimal)| {
            b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
        };
        creditors.sort_by(by_magnitude);
        debtors.sort_by(by_magnitude);

        let mut instructions = Vec::new();
        let (mut ci, mut di) = (0, 0);
        while ci < creditors.len() && di < debtors.len() {
            let amount = creditors[ci].1.min(debtors[di].1);
            instructions.push(SettlementInstruction {
                from: debtors[di].0.clone(),
                to: creditors[ci].0.clone(),
                amount,
            });

            creditors[ci].1 -= amount;
            debtors[di].1 -= amount;

            if creditors[ci].1 <= self.tolerance {
                ci += 1;
            }
            if debtors[di].1 <= self.tolerance {
                di += 1;
            }
        }
        instructions
    }

    fn match_last_in_first_out(
        &self,
        mut creditors: Vec<(ParticipantId, Decimal)>,
        mut debtors: Vec<(ParticipantId, Decimal)>,
    ) -> Vec<SettlementInstruction> {
        let mut instructions = Vec::new();
        while !creditors.is_empty() && !debtors.is_empty() {
            let (Some((creditor, credit)), Some((debtor, debt))) = (creditors.pop(), debtors.pop())
            else {
                break;
            };

            let amount = credit.min(debt);
            instructions.push(SettlementInstruction {
                from: debtor.clone(),
                to: creditor.clone(),
                amount,
            });

            if credit - amount > self.tolerance {
                creditors.push((creditor, credit - amount));
            }
            if debt - amount > self.tolerance {
                debtors.push((debtor, debt - amount));
            }
        }
        instructions
    }
}
