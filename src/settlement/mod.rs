//! Debt settlement: turning net balances into payment instructions.

pub mod engine;
