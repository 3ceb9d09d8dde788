//! Transaction domain model

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::Account;
use super::history::HistoryEntry;
use super::result::TransactionError;

/// Kind tag shared by transactions and history entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => f.write_str("Deposit"),
            TransactionKind::Withdraw => f.write_str("Withdraw"),
        }
    }
}

/// An intent to move money into or out of an account.
///
/// The amount is not validated here; the account's rules decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "lowercase")]
pub enum Transaction {
    Deposit(Decimal),
    Withdraw(Decimal),
}

impl Transaction {
    pub fn deposit(amount: Decimal) -> Self {
        Transaction::Deposit(amount)
    }

    pub fn withdraw(amount: Decimal) -> Self {
        Transaction::Withdraw(amount)
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            Transaction::Deposit(_) => TransactionKind::Deposit,
            Transaction::Withdraw(_) => TransactionKind::Withdraw,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            Transaction::Deposit(amount) | Transaction::Withdraw(amount) => *amount,
        }
    }

    /// Apply this transaction to `account`.
    ///
    /// On success the account's history gains exactly one entry, which is
    /// returned. On failure neither balance nor history change.
    pub fn apply<'a>(
        &self,
        account: &'a mut Account,
    ) -> Result<&'a HistoryEntry, TransactionError> {
        match *self {
            Transaction::Deposit(amount) => account.deposit(amount)?,
            Transaction::Withdraw(amount) => account.withdraw(amount)?,
        }
        Ok(account.record(HistoryEntry::now(self.kind(), self.amount())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{AccountNumber, WithdrawalPolicy};
    use crate::domain::client::TaxId;

    fn account() -> Account {
        Account::open(
            AccountNumber::new(1),
            TaxId::parse("12345678900").unwrap(),
            WithdrawalPolicy::Standard,
        )
    }

    #[test]
    fn test_deposit_records_history() {
        let mut account = account();
        let entry = Transaction::deposit(Decimal::new(1000, 0))
            .apply(&mut account)
            .unwrap()
            .clone();

        assert_eq!(entry.kind, TransactionKind::Deposit);
        assert_eq!(entry.amount, Decimal::new(1000, 0));
        assert_eq!(account.balance(), Decimal::new(1000, 0));
        assert_eq!(account.history().len(), 1);
    }

    #[test]
    fn test_failed_withdraw_records_nothing() {
        let mut account = account();
        let err = Transaction::withdraw(Decimal::new(10, 0))
            .apply(&mut account)
            .unwrap_err();

        assert!(matches!(err, TransactionError::InsufficientFunds { .. }));
        assert!(account.history().is_empty());
    }

    #[test]
    fn test_kind_and_amount() {
        let tx = Transaction::withdraw(Decimal::new(2550, 2));
        assert_eq!(tx.kind(), TransactionKind::Withdraw);
        assert_eq!(tx.amount().to_string(), "25.50");
        assert_eq!(tx.kind().to_string(), "Withdraw");
    }
}
