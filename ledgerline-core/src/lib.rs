//! Ledgerline Core - account, transaction and history engine
//!
//! - **domain**: Accounts, clients, transactions, history and their rules
//! - **services**: Registry of clients and accounts, statements, event logging
//! - **config**: Settings loaded from the ledger directory

pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod services;

use std::path::{Path, PathBuf};

use anyhow::Result;

use config::Config;
use services::Registry;

// Re-export commonly used types at crate root
pub use domain::result::{Error, TransactionError};
pub use domain::{
    Account, AccountNumber, Client, History, HistoryEntry, NewClient, Statement, TaxId,
    Transaction, TransactionKind, WithdrawalLimits, WithdrawalPolicy,
};
pub use services::{EntryPoint, LogEvent, LoggingService, StatementService};

/// Main context for Ledgerline operations
///
/// Holds the configuration and the registry of the running ledger. Ledger
/// state lives only as long as the context.
pub struct LedgerContext {
    pub config: Config,
    pub registry: Registry,
    ledger_dir: PathBuf,
}

impl LedgerContext {
    /// Create a new context from the settings in `ledger_dir`
    pub fn new(ledger_dir: &Path) -> Result<Self> {
        let config = Config::load(ledger_dir)?;
        let registry = Registry::new(config.account_settings());

        Ok(Self {
            config,
            registry,
            ledger_dir: ledger_dir.to_path_buf(),
        })
    }

    /// Open the event log if logging is enabled
    pub fn logger(&self, entry_point: EntryPoint, app_version: &str) -> Option<LoggingService> {
        if !self.config.logging_enabled {
            return None;
        }
        LoggingService::new(&self.ledger_dir, entry_point, app_version).ok()
    }

    pub fn ledger_dir(&self) -> &Path {
        &self.ledger_dir
    }
}
