use crate::core::currency::CurrencyCode;
use crate::core::expense::{ExpenseId, ExpenseRecord, NewExpense};
use crate::core::participant::GroupId;
use crate::error::StorageError;
use crate::store::{CurrencySettings, ExpenseStore};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Inner {
    last_id: u64,
    groups: HashMap<GroupId, Vec<ExpenseRecord>>,
}

/// Process-local expense store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryExpenseStore {
    inner: RwLock<Inner>,
}

impl InMemoryExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all groups.
    pub fn len(&self) -> usize {
        self.inner.read().groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ExpenseStore for InMemoryExpenseStore {
    fn append(&self, expense: NewExpense) -> Result<ExpenseId, StorageError> {
        let mut inner = self.inner.write();
        let id = ExpenseId::new(inner.last_id).next();
        inner.last_id = id.value();
        let record = expense.into_record(id, Utc::now());
        inner
            .groups
            .entry(record.group_id().clone())
            .or_default()
            .push(record);
        Ok(id)
    }

    fn fetch_all(&self, group: &GroupId) -> Result<Vec<ExpenseRecord>, StorageError> {
        Ok(self
            .inner
            .read()
            .groups
            .get(group)
            .cloned()
            .unwrap_or_default())
    }
}

/// Process-local currency settings.
#[derive(Debug, Default)]
pub struct InMemoryCurrencySettings {
    currencies: RwLock<HashMap<GroupId, CurrencyCode>>,
}

impl InMemoryCurrencySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CurrencySettings for InMemoryCurrencySettings {
    fn get(&self, group: &GroupId) -> Result<Option<CurrencyCode>, StorageError> {
        Ok(self.currencies.read().get(group).cloned())
    }

    fn set(&self, group: &GroupId, currency: CurrencyCode) -> Result<(), StorageError> {
        self.currencies.write().insert(group.clone(), currency);
        Ok(())
    }
}
