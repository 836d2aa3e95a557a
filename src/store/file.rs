//! JSON-file backed stores.
//!
//! Each store keeps its whole document in memory and rewrites the file on
//! every change. Writes go to a temporary sibling file which is synced and
//! then renamed over the original, so a crash never leaves a half-written
//! document behind.

use crate::core::currency::CurrencyCode;
use crate::core::expense::{ExpenseId, ExpenseRecord, NewExpense};
use crate::core::participant::GroupId;
use crate::error::StorageError;
use crate::store::{CurrencySettings, ExpenseStore};
use chrono::Utc;
use log::{debug, warn};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let written = write_synced(&tmp, contents).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&tmp) {
            debug!("could not remove {}: {}", tmp.display(), cleanup);
        }
        return Err(e.into());
    }

    // The document is already in place; a failed directory sync is only logged.
    if let Err(e) = sync_dir(parent) {
        warn!("could not sync directory {}: {}", parent.display(), e);
    }
    Ok(())
}

fn write_synced(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Persist the directory entry created by a rename.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

fn read_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StorageError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ExpenseDocument {
    last_id: u64,
    expenses: Vec<ExpenseRecord>,
}

/// Expense store persisted as a single JSON document.
#[derive(Debug)]
pub struct JsonFileExpenseStore {
    path: PathBuf,
    document: RwLock<ExpenseDocument>,
}

impl JsonFileExpenseStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let document: ExpenseDocument = read_or_default(&path)?;

        let mut previous = 0;
        for record in &document.expenses {
            let id = record.id().value();
            if id <= previous || id > document.last_id {
                return Err(StorageError::Corrupt(format!(
                    "expense id {} out of sequence in {}",
                    id,
                    path.display()
                )));
            }
            record.check().map_err(|e| {
                StorageError::Corrupt(format!(
                    "expense {} in {} is invalid: {}",
                    record.id(),
                    path.display(),
                    e
                ))
            })?;
            previous = id;
        }

        debug!(
            "opened expense store {} with {} records",
            path.display(),
            document.expenses.len()
        );
        Ok(Self {
            path,
            document: RwLock::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExpenseStore for JsonFileExpenseStore {
    fn append(&self, expense: NewExpense) -> Result<ExpenseId, StorageError> {
        let mut document = self.document.write();
        let previous_last = document.last_id;
        let id = ExpenseId::new(previous_last).next();

        document.last_id = id.value();
        document.expenses.push(expense.into_record(id, Utc::now()));

        let written = serde_json::to_vec_pretty(&*document)
            .map_err(StorageError::from)
            .and_then(|bytes| write_atomically(&self.path, &bytes));
        if let Err(e) = written {
            document.expenses.pop();
            document.last_id = previous_last;
            return Err(e);
        }
        Ok(id)
    }

    fn fetch_all(&self, group: &GroupId) -> Result<Vec<ExpenseRecord>, StorageError> {
        Ok(self
            .document
            .read()
            .expenses
            .iter()
            .filter(|r| r.group_id() == group)
            .cloned()
            .collect())
    }
}

/// Documents written before per-group currencies existed lack
/// `group_currencies` and load as an empty mapping.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct SettingsDocument {
    #[serde(default)]
    group_currencies: BTreeMap<GroupId, CurrencyCode>,
}

/// Currency settings persisted as `{"group_currencies": {...}}`.
#[derive(Debug)]
pub struct JsonFileCurrencySettings {
    path: PathBuf,
    document: RwLock<SettingsDocument>,
}

impl JsonFileCurrencySettings {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let document = read_or_default(&path)?;
        Ok(Self {
            path,
            document: RwLock::new(document),
        })
    }
}

impl CurrencySettings for JsonFileCurrencySettings {
    fn get(&self, group: &GroupId) -> Result<Option<CurrencyCode>, StorageError> {
        Ok(self.document.read().group_currencies.get(group).cloned())
    }

    fn set(&self, group: &GroupId, currency: CurrencyCode) -> Result<(), StorageError> {
        let mut document = self.document.write();
        let previous = document
            .group_currencies
            .insert(group.clone(), currency);

        let written = serde_json::to_vec_pretty(&*document)
            .map_err(StorageError::from)
            .and_then(|bytes| write_atomically(&self.path, &bytes));
        if let Err(e) = written {
            match previous {
                Some(old) => document.group_currencies.insert(group.clone(), old),
                None => document.group_currencies.remove(group),
            };
            return Err(e);
        }
        Ok(())
    }
}
