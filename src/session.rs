//! Step-by-step collection of an expense from a conversational front end.
//!
//! A session walks through name, payer, amount and participants, then hands
//! a complete [`ExpenseDraft`] to the caller, which records it through
//! [`crate::service::LedgerService`]. Sessions live outside the ledger: the
//! ledger only ever sees finished drafts.

use crate::core::expense::ExpenseDraft;
use crate::core::participant::GroupId;
use log::debug;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::hash::Hash;
use std::str::FromStr;
use thiserror::Error;

/// Where a session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingName,
    AwaitingPayer,
    AwaitingAmount,
    AwaitingParticipants,
    Done,
}

/// Input that does not fit the session's current step.
///
/// None of these move the session; the caller re-prompts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("expected input for {expected:?}, session is in {actual:?}")]
    WrongStep {
        expected: SessionState,
        actual: SessionState,
    },

    #[error("please provide a valid expense name")]
    EmptyName,

    #[error("please choose who paid")]
    EmptyPayer,

    #[error("'{0}' is not a valid number")]
    NotANumber(String),

    #[error("amount cannot be less than or equal to 0")]
    NonPositiveAmount,

    #[error("select at least one participant")]
    NoParticipants,
}

/// One pending expense entry for one group.
#[derive(Debug, Clone)]
pub struct ExpenseSession {
    group: GroupId,
    state: SessionState,
    name: String,
    payer: String,
    amount: Decimal,
    selected: Vec<String>,
}

impl ExpenseSession {
    pub fn new(group: GroupId) -> Self {
        Self {
            group,
            state: SessionState::AwaitingName,
            name: String::new(),
            payer: String::new(),
            amount: Decimal::ZERO,
            selected: Vec::new(),
        }
    }

    pub fn group(&self) -> &GroupId {
        &self.group
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Participants currently selected, in selection order.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    fn require_step(&self, expected: SessionState) -> Result<(), SessionError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SessionError::WrongStep {
                expected,
                actual: self.state,
            })
        }
    }

    pub fn provide_name(&mut self, text: &str) -> Result<(), SessionError> {
        self.require_step(SessionState::AwaitingName)?;
        let name = text.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyName);
        }
        self.name = name.to_string();
        self.state = SessionState::AwaitingPayer;
        Ok(())
    }

    pub fn choose_payer(&mut self, payer: &str) -> Result<(), SessionError> {
        self.require_step(SessionState::AwaitingPayer)?;
        let payer = payer.trim();
        if payer.is_empty() {
            return Err(SessionError::EmptyPayer);
        }
        self.payer = payer.to_string();
        self.state = SessionState::AwaitingAmount;
        Ok(())
    }

    pub fn provide_amount(&mut self, text: &str) -> Result<(), SessionError> {
        self.require_step(SessionState::AwaitingAmount)?;
        let text = text.trim();
        let amount = Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|_| SessionError::NotANumber(text.to_string()))?;
        if amount <= Decimal::ZERO {
            return Err(SessionError::NonPositiveAmount);
        }
        self.amount = amount;
        self.state = SessionState::AwaitingParticipants;
        Ok(())
    }

    /// Select a participant, or deselect one already selected.
    ///
    /// Returns whether the participant is selected afterwards.
    pub fn toggle_participant(&mut self, participant: &str) -> Result<bool, SessionError> {
        self.require_step(SessionState::AwaitingParticipants)?;
        let participant = participant.trim();
        if let Some(pos) = self.selected.iter().position(|p| p == participant) {
            self.selected.remove(pos);
            Ok(false)
        } else {
            self.selected.push(participant.to_string());
            Ok(true)
        }
    }

    /// Complete the session and produce the draft.
    pub fn finish(&mut self) -> Result<ExpenseDraft, SessionError> {
        self.require_step(SessionState::AwaitingParticipants)?;
        if self.selected.is_empty() {
            return Err(SessionError::NoParticipants);
        }
        self.state = SessionState::Done;
        Ok(ExpenseDraft {
            name: std::mem::take(&mut self.name),
            payer: std::mem::take(&mut self.payer),
            amount: self.amount,
            participants: std::mem::take(&mut self.selected),
        })
    }
}

/// Pending sessions, at most one per user.
#[derive(Debug)]
pub struct SessionRegistry<U> {
    sessions: Mutex<HashMap<U, ExpenseSession>>,
}

impl<U> Default for SessionRegistry<U> {
    fn default() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl<U: Eq + Hash + Clone + std::fmt::Debug> SessionRegistry<U> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session for `user`, replacing any session already pending.
    pub fn start(&self, user: U, group: GroupId) {
        debug!("starting expense session for {:?} in group {}", user, group);
        self.sessions.lock().insert(user, ExpenseSession::new(group));
    }

    /// Current step of `user`'s session, if any.
    pub fn state(&self, user: &U) -> Option<SessionState> {
        self.sessions.lock().get(user).map(ExpenseSession::state)
    }

    /// Run `step` against `user`'s session.
    ///
    /// Returns `None` when the user has no pending session.
    pub fn with_session<R>(
        &self,
        user: &U,
        step: impl FnOnce(&mut ExpenseSession) -> R,
    ) -> Option<R> {
        self.sessions.lock().get_mut(user).map(step)
    }

    /// Finish `user`'s session. On success the session is removed and the
    /// group and draft are returned; on failure it stays pending.
    pub fn complete(&self, user: &U) -> Option<Result<(GroupId, ExpenseDraft), SessionError>> {
        let mut sessions = self.sessions.lock();
        let session = sessions.get_mut(user)?;
        match session.finish() {
            Ok(draft) => {
                let group = session.group().clone();
                sessions.remove(user);
                Some(Ok((group, draft)))
            }
            Err(e) => Some(Err(e)),
        }
    }

    /// Drop `user`'s session, e.g. after an error upstream.
    pub fn cancel(&self, user: &U) -> bool {
        self.sessions.lock().remove(user).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
