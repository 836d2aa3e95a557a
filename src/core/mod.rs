//! Foundational types: participants, currencies, expenses and balances.

pub mod balance;
pub mod currency;
pub mod expense;
pub mod participant;
