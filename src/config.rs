//! Configuration for the ledger

use crate::error::{LedgerError, Result};
use crate::settlement::engine::{MatchingPolicy, SettlementEngine, DEFAULT_TOLERANCE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding `expenses.json` and `config.json`
    pub data_dir: PathBuf,

    /// Settlement configuration
    pub settlement: SettlementConfig,

    /// Exchange-rate configuration
    pub rates: RatesConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            settlement: SettlementConfig::default(),
            rates: RatesConfig::default(),
        }
    }
}

/// Settlement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Pairing order of creditors and debtors
    pub policy: MatchingPolicy,

    /// Balances this close to zero count as settled
    pub tolerance: Decimal,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            policy: MatchingPolicy::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SettlementConfig {
    pub fn engine(&self) -> SettlementEngine {
        SettlementEngine::new(self.policy, self.tolerance)
    }
}

/// Exchange-rate configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatesConfig {
    /// Rate snapshot file (`{"data": {...}}`)
    pub snapshot_path: Option<PathBuf>,
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| LedgerError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(data_dir) = std::env::var("SPLIT_LEDGER_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(rates) = std::env::var("SPLIT_LEDGER_RATES") {
            config.rates.snapshot_path = Some(PathBuf::from(rates));
        }

        Ok(config)
    }

    /// Path of the expense document.
    pub fn expenses_path(&self) -> PathBuf {
        self.data_dir.join("expenses.json")
    }

    /// Path of the per-group currency document.
    pub fn currencies_path(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    fn validate(&self) -> Result<()> {
        if self.settlement.tolerance < Decimal::ZERO {
            return Err(LedgerError::Config(format!(
                "settlement.tolerance must not be negative, got {}",
                self.settlement.tolerance
            )));
        }
        Ok(())
    }
}
