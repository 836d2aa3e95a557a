//! Persistence collaborators: expense records and per-group currency settings.
//!
//! Both traits take `&self`; implementations guard their state internally so
//! a single store can serve many groups from many threads.

pub mod file;
pub mod memory;

use crate::core::currency::CurrencyCode;
use crate::core::expense::{ExpenseId, ExpenseRecord, NewExpense};
use crate::core::participant::GroupId;
use crate::error::StorageError;

/// Durable, append-only collection of expense records per group.
pub trait ExpenseStore {
    /// Persist one expense and return its newly assigned id.
    ///
    /// The write is durable once this returns `Ok`. On `Err` nothing has
    /// been recorded.
    fn append(&self, expense: NewExpense) -> Result<ExpenseId, StorageError>;

    /// All records of a group, in insertion order. Empty when the group has
    /// none.
    fn fetch_all(&self, group: &GroupId) -> Result<Vec<ExpenseRecord>, StorageError>;
}

/// Home currency of each group. Unset until explicitly configured.
pub trait CurrencySettings {
    fn get(&self, group: &GroupId) -> Result<Option<CurrencyCode>, StorageError>;

    fn set(&self, group: &GroupId, currency: CurrencyCode) -> Result<(), StorageError>;
}

impl<T: ExpenseStore + ?Sized> ExpenseStore for &T {
    fn append(&self, expense: NewExpense) -> Result<ExpenseId, StorageError> {
        (**self).append(expense)
    }

    fn fetch_all(&self, group: &GroupId) -> Result<Vec<ExpenseRecord>, StorageError> {
        (**self).fetch_all(group)
    }
}

impl<T: CurrencySettings + ?Sized> CurrencySettings for &T {
    fn get(&self, group: &GroupId) -> Result<Option<CurrencyCode>, StorageError> {
        (**self).get(group)
    }

    fn set(&self, group: &GroupId, currency: CurrencyCode) -> Result<(), StorageError> {
        (**self).set(group, currency)
    }
}
