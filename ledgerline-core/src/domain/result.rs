//! Result and error types for the core library

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use super::account::AccountNumber;

/// Business-rule failures of a deposit, withdrawal or transaction execution.
///
/// These are expected, recoverable outcomes. A failing operation never
/// mutates balance, withdrawal count or history.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionError {
    #[error("Invalid amount: {amount}")]
    InvalidAmount { amount: Decimal },

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Withdrawal of {amount} exceeds the per-withdrawal limit of {limit}")]
    WithdrawLimitExceeded { amount: Decimal, limit: Decimal },

    #[error("Maximum number of withdrawals ({max}) reached")]
    WithdrawCountExceeded { max: u32 },

    #[error("Account {account} is not owned by this client")]
    AccountNotOwned { account: AccountNumber },
}

impl TransactionError {
    /// Stable tag for the failure, safe to log
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::WithdrawLimitExceeded { .. } => "withdraw_limit_exceeded",
            Self::WithdrawCountExceeded { .. } => "withdraw_count_exceeded",
            Self::AccountNotOwned { .. } => "account_not_owned",
        }
    }
}

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lock poisoned: {0}")]
    Lock(String),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Stable tag for the error category, safe to log
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::Config(_) => "config",
            Self::Lock(_) => "lock",
            Self::Transaction(e) => e.kind(),
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Csv(_) => "csv",
        }
    }

    /// The business-rule failure behind this error, if any
    pub fn as_transaction(&self) -> Option<&TransactionError> {
        match self {
            Self::Transaction(e) => Some(e),
            _ => None,
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
