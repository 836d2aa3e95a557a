//! # split-ledger
//!
//! Shared-expense ledger and debt settlement engine.
//!
//! Members of a group record who paid for what and who shared the cost.
//! The engine folds those records into net balances and computes a short
//! list of payments that settles everyone, optionally re-expressed in a
//! different currency.
//!
//! ## Architecture
//!
//! - **core** — Participants, currencies, expense records, balance accumulation
//! - **settlement** — Greedy netting of balances into payment instructions
//! - **fx** — Exchange-rate providers (fixed tables, rate snapshots)
//! - **store** — Expense and currency-setting persistence (memory, JSON files)
//! - **service** — `LedgerService`, orchestrating record and query requests
//! - **report** — Text rendering of balance queries
//! - **session** — Step-by-step expense entry for conversational front ends
//! - **simulation** — Random expense generation

pub mod config;
pub mod core;
pub mod error;
pub mod fx;
pub mod report;
pub mod service;
pub mod session;
pub mod settlement;
pub mod simulation;
pub mod store;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balance::{BalanceAccumulator, Balances};
    pub use crate::core::currency::CurrencyCode;
    pub use crate::core::expense::{ExpenseDraft, ExpenseId, ExpenseRecord};
    pub use crate::core::participant::{GroupId, ParticipantId};
    pub use crate::error::{LedgerError, ValidationError};
    pub use crate::fx::table::FxRateTable;
    pub use crate::fx::{NoRates, RateProvider};
    pub use crate::service::{BalanceOutcome, BalanceSummary, LedgerService};
    pub use crate::settlement::engine::{MatchingPolicy, SettlementEngine, SettlementInstruction};
    pub use crate::store::memory::{InMemoryCurrencySettings, InMemoryExpenseStore};
    pub use crate::store::{CurrencySettings, ExpenseStore};
}
