//! Error types for the ledger.

use crate::core::participant::{GroupId, ParticipantId};
use crate::fx::FxError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Malformed input to expense recording or currency configuration.
///
/// Raised before anything reaches a store, so a rejected call never
/// leaves partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expense name must not be empty")]
    EmptyName,

    #[error("'{0}' is not a valid participant")]
    InvalidParticipant(String),

    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("an expense needs at least one participant")]
    NoParticipants,

    #[error("participant {0} is listed more than once")]
    DuplicateParticipant(ParticipantId),

    #[error("no currency set for group {0}")]
    CurrencyNotSet(GroupId),

    #[error("'{0}' is not a valid currency code")]
    InvalidCurrency(String),
}

/// An amount left the range `Decimal` can represent.
///
/// Each amount is validated on its own, so sums, shares and converted
/// amounts across a group can still overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("amount exceeds the representable range")]
pub struct AmountOverflow;

/// Failure of the persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt store: {0}")]
    Corrupt(String),
}

/// Top-level error returned by [`crate::service::LedgerService`].
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("exchange rate unavailable: {0}")]
    RateUnavailable(#[from] FxError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("cannot compute balances: {0}")]
    Overflow(#[from] AmountOverflow),

    #[error("invalid configuration: {0}")]
    Config(String),
}
