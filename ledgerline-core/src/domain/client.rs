//! Client domain model

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::account::{Account, AccountNumber};
use super::history::HistoryEntry;
use super::result::{Error, TransactionError};
use super::transaction::Transaction;

/// Normalized tax identifier: ASCII digits only
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    /// Parse a tax id, dropping common separators (`.`, `-`, `/`, spaces).
    ///
    /// `"123.456.789-00"` and `"12345678900"` are the same id.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        static SEPARATORS: OnceLock<Regex> = OnceLock::new();
        let separators =
            SEPARATORS.get_or_init(|| Regex::new(r"[\s./-]+").expect("separator pattern is valid"));

        let digits = separators.replace_all(raw.trim(), "").to_string();
        if digits.is_empty() {
            return Err(Error::validation("tax id cannot be empty"));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::validation(format!("tax id must contain only digits: {raw}")));
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registration data for a new client, as typed by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewClient {
    pub tax_id: String,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
}

/// An identity owning one or more accounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Client {
    tax_id: TaxId,
    name: String,
    birth_date: Option<NaiveDate>,
    address: Option<String>,
    accounts: Vec<AccountNumber>,
}

impl Client {
    pub fn new(tax_id: TaxId, name: impl Into<String>) -> Self {
        Self {
            tax_id,
            name: name.into(),
            birth_date: None,
            address: None,
            accounts: Vec::new(),
        }
    }

    /// Build a client from registration data, validating it
    pub fn register(new_client: NewClient) -> Result<Self, Error> {
        let tax_id = TaxId::parse(&new_client.tax_id)?;
        let name = new_client.name.trim();
        if name.is_empty() {
            return Err(Error::validation("client name cannot be empty"));
        }

        let mut client = Self::new(tax_id, name);
        client.birth_date = new_client.birth_date;
        client.address = new_client
            .address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());
        Ok(client)
    }

    pub fn tax_id(&self) -> &TaxId {
        &self.tax_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Numbers of the accounts this client owns, in the order they were added
    pub fn own_accounts(&self) -> &[AccountNumber] {
        &self.accounts
    }

    pub fn owns(&self, number: AccountNumber) -> bool {
        self.accounts.contains(&number)
    }

    /// Register ownership of `account`. The account must have been opened
    /// for this client.
    pub fn add_account(&mut self, account: &Account) -> Result<(), TransactionError> {
        if account.owner() != &self.tax_id {
            return Err(TransactionError::AccountNotOwned {
                account: account.number(),
            });
        }
        if !self.owns(account.number()) {
            self.accounts.push(account.number());
        }
        Ok(())
    }

    /// Submit `transaction` against one of this client's accounts.
    ///
    /// This is the single ownership check in front of every balance or
    /// history change.
    pub fn execute<'a>(
        &self,
        account: &'a mut Account,
        transaction: Transaction,
    ) -> Result<&'a HistoryEntry, TransactionError> {
        if !self.owns(account.number()) || account.owner() != &self.tax_id {
            return Err(TransactionError::AccountNotOwned {
                account: account.number(),
            });
        }
        transaction.apply(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::WithdrawalLimits;
    use rust_decimal::Decimal;

    fn client(tax_id: &str) -> Client {
        Client::new(TaxId::parse(tax_id).unwrap(), "Maria Silva")
    }

    #[test]
    fn test_tax_id_normalization() {
        assert_eq!(TaxId::parse("123.456.789-00").unwrap().as_str(), "12345678900");
        assert_eq!(TaxId::parse(" 12345678900 ").unwrap().as_str(), "12345678900");
        assert!(TaxId::parse("").is_err());
        assert!(TaxId::parse("12a45").is_err());
    }

    #[test]
    fn test_register_validates_name() {
        let result = Client::register(NewClient {
            tax_id: "123".to_string(),
            name: "   ".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_add_account_rejects_foreign_account() {
        let mut maria = client("111");
        let joao_account = Account::checking(
            AccountNumber::new(7),
            TaxId::parse("222").unwrap(),
            WithdrawalLimits::default(),
        );

        let err = maria.add_account(&joao_account).unwrap_err();
        assert_eq!(err, TransactionError::AccountNotOwned { account: AccountNumber::new(7) });
        assert!(maria.own_accounts().is_empty());
    }

    #[test]
    fn test_add_account_is_idempotent() {
        let mut maria = client("111");
        let account = Account::checking(
            AccountNumber::new(1),
            maria.tax_id().clone(),
            WithdrawalLimits::default(),
        );
        maria.add_account(&account).unwrap();
        maria.add_account(&account).unwrap();
        assert_eq!(maria.own_accounts(), &[AccountNumber::new(1)]);
    }

    #[test]
    fn test_execute_on_foreign_account_fails() {
        let maria = client("111");
        let mut joao = client("222");
        let mut account = Account::checking(
            AccountNumber::new(1),
            joao.tax_id().clone(),
            WithdrawalLimits::default(),
        );
        joao.add_account(&account).unwrap();

        let err = maria
            .execute(&mut account, Transaction::deposit(Decimal::new(100, 0)))
            .unwrap_err();

        assert!(matches!(err, TransactionError::AccountNotOwned { .. }));
        assert_eq!(account.balance(), Decimal::ZERO);
        assert!(account.history().is_empty());
    }

    #[test]
    fn test_execute_on_own_account() {
        let mut maria = client("111");
        let mut account = Account::checking(
            AccountNumber::new(1),
            maria.tax_id().clone(),
            WithdrawalLimits::default(),
        );
        maria.add_account(&account).unwrap();

        let entry = maria
            .execute(&mut account, Transaction::deposit(Decimal::new(100, 0)))
            .unwrap();
        assert_eq!(entry.amount, Decimal::new(100, 0));
        assert_eq!(account.balance(), Decimal::new(100, 0));
    }
}
