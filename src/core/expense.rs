use crate::core::currency::convert;
use crate::core::participant::{GroupId, ParticipantId};
use crate::error::{AmountOverflow, ValidationError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Store-assigned identifier of an expense. Strictly increasing per store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(u64);

impl ExpenseId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The id that follows this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unvalidated expense input, as collected from a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub name: String,
    pub payer: String,
    pub amount: Decimal,
    pub participants: Vec<String>,
}

impl ExpenseDraft {
    pub fn new(
        name: impl Into<String>,
        payer: impl Into<String>,
        amount: Decimal,
        participants: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            payer: payer.into(),
            amount,
            participants: participants.into_iter().map(Into::into).collect(),
        }
    }

    /// Check the expense invariants and produce a [`NewExpense`].
    ///
    /// The payer does not have to be among the participants. When it is
    /// absent it is still credited for the full amount but owes no share.
    pub fn validate(self, group_id: GroupId) -> Result<NewExpense, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let payer = ParticipantId::parse(&self.payer)
            .ok_or_else(|| ValidationError::InvalidParticipant(self.payer.clone()))?;

        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }

        if self.participants.is_empty() {
            return Err(ValidationError::NoParticipants);
        }

        let mut seen = HashSet::new();
        let mut participants = Vec::with_capacity(self.participants.len());
        for raw in &self.participants {
            let participant = ParticipantId::parse(raw)
                .ok_or_else(|| ValidationError::InvalidParticipant(raw.clone()))?;
            if !seen.insert(participant.clone()) {
                return Err(ValidationError::DuplicateParticipant(participant));
            }
            participants.push(participant);
        }

        Ok(NewExpense {
            group_id,
            name: name.to_string(),
            payer,
            amount: self.amount,
            participants,
        })
    }
}

/// A validated expense waiting for the store to assign it an id.
///
/// Only obtainable through [`ExpenseDraft::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    group_id: GroupId,
    name: String,
    payer: ParticipantId,
    amount: Decimal,
    participants: Vec<ParticipantId>,
}

impl NewExpense {
    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Turn this into a stored record.
    pub fn into_record(self, id: ExpenseId, recorded_at: DateTime<Utc>) -> ExpenseRecord {
        ExpenseRecord {
            id,
            group_id: self.group_id,
            name: self.name,
            payer: self.payer,
            amount: self.amount,
            participants: self.participants,
            recorded_at,
        }
    }
}

/// A shared expense: `payer` fronted `amount` on behalf of `participants`.
///
/// Records are immutable once stored. The amount is denominated in the
/// group's home currency at creation time.
///
/// # Examples
///
/// ```
/// use split_ledger::core::expense::{ExpenseDraft, ExpenseId};
/// use split_ledger::core::participant::GroupId;
/// use rust_decimal_macros::dec;
///
/// let record = ExpenseDraft::new("Dinner", "A", dec!(90), ["A", "B", "C"])
///     .validate(GroupId::new("trip"))
///     .unwrap()
///     .into_record(ExpenseId::new(1), chrono::Utc::now());
///
/// assert_eq!(record.share(), dec!(30));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    id: ExpenseId,
    group_id: GroupId,
    name: String,
    payer: ParticipantId,
    amount: Decimal,
    participants: Vec<ParticipantId>,
    recorded_at: DateTime<Utc>,
}

impl ExpenseRecord {
    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Each participant's equal part of the amount. Zero for a record
    /// with no participants.
    pub fn share(&self) -> Decimal {
        match self.participants.len() {
            0 => Decimal::ZERO,
            n => self.amount / Decimal::from(n),
        }
    }

    /// A copy of this record with the amount rescaled by `rate`.
    pub fn converted(&self, rate: Decimal) -> Result<Self, AmountOverflow> {
        Ok(Self {
            amount: convert(self.amount, rate)?,
            ..self.clone()
        })
    }

    /// Check the invariants every recorded expense satisfies.
    ///
    /// Records read back from storage did not pass through
    /// [`ExpenseDraft::validate`] in this process, so they are checked
    /// against the same rules before use.
    pub fn check(&self) -> Result<(), ValidationError> {
        ExpenseDraft::new(
            self.name.as_str(),
            self.payer.as_str(),
            self.amount,
            self.participants.iter().map(ParticipantId::as_str),
        )
        .validate(self.group_id.clone())
        .map(|_| ())
    }
}
