//! Core domain entities
//!
//! Accounts, clients, transactions and history. These are pure data
//! structures with the business rules - no I/O and no logging.

pub mod account;
pub mod client;
pub mod history;
pub mod result;
pub mod statement;
mod transaction;

pub use account::{Account, AccountNumber, WithdrawalLimits, WithdrawalPolicy, DEFAULT_AGENCY};
pub use client::{Client, NewClient, TaxId};
pub use history::{History, HistoryEntry, TIMESTAMP_FORMAT};
pub use statement::{format_amount, Statement};
pub use transaction::{Transaction, TransactionKind};
