//! Account domain model

use std::fmt;

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::client::TaxId;
use super::history::{History, HistoryEntry};
use super::result::TransactionError;

/// Branch code given to accounts when none is configured
pub const DEFAULT_AGENCY: &str = "0001";

/// Sequential account number assigned by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNumber(u32);

impl AccountNumber {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-withdrawal ceiling and lifetime withdrawal cap of a limited account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalLimits {
    pub per_withdrawal_limit: Decimal,
    pub max_withdrawals: u32,
}

impl Default for WithdrawalLimits {
    fn default() -> Self {
        Self {
            per_withdrawal_limit: Decimal::new(500, 0),
            max_withdrawals: 3,
        }
    }
}

/// Extra preconditions an account applies to withdrawals before the
/// balance rules run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WithdrawalPolicy {
    Standard,
    Limited(WithdrawalLimits),
}

impl WithdrawalPolicy {
    /// Check the policy against a withdrawal of `amount` when `performed`
    /// withdrawals already succeeded. Amount ceiling first, then the count.
    pub fn check(&self, amount: Decimal, performed: u32) -> Result<(), TransactionError> {
        match self {
            WithdrawalPolicy::Standard => Ok(()),
            WithdrawalPolicy::Limited(limits) => {
                if amount > limits.per_withdrawal_limit {
                    return Err(TransactionError::WithdrawLimitExceeded {
                        amount,
                        limit: limits.per_withdrawal_limit,
                    });
                }
                if performed >= limits.max_withdrawals {
                    return Err(TransactionError::WithdrawCountExceeded {
                        max: limits.max_withdrawals,
                    });
                }
                Ok(())
            }
        }
    }

    pub fn limits(&self) -> Option<&WithdrawalLimits> {
        match self {
            WithdrawalPolicy::Standard => None,
            WithdrawalPolicy::Limited(limits) => Some(limits),
        }
    }
}

/// A balance-holding account owned by exactly one client
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    number: AccountNumber,
    agency: String,
    owner: TaxId,
    balance: Decimal,
    policy: WithdrawalPolicy,
    /// Lifetime count of successful withdrawals; never reset
    withdrawals_performed: u32,
    history: History,
    opened_at: DateTime<Local>,
}

impl Account {
    /// Open an empty account bound to `owner`
    pub fn open(number: AccountNumber, owner: TaxId, policy: WithdrawalPolicy) -> Self {
        Self {
            number,
            agency: DEFAULT_AGENCY.to_string(),
            owner,
            balance: Decimal::ZERO,
            policy,
            withdrawals_performed: 0,
            history: History::new(),
            opened_at: Local::now(),
        }
    }

    /// Open a checking account: withdrawals are capped per transaction and in count
    pub fn checking(number: AccountNumber, owner: TaxId, limits: WithdrawalLimits) -> Self {
        Self::open(number, owner, WithdrawalPolicy::Limited(limits))
    }

    pub fn with_agency(mut self, agency: impl Into<String>) -> Self {
        self.agency = agency.into();
        self
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn agency(&self) -> &str {
        &self.agency
    }

    pub fn owner(&self) -> &TaxId {
        &self.owner
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn policy(&self) -> &WithdrawalPolicy {
        &self.policy
    }

    pub fn withdrawals_performed(&self) -> u32 {
        self.withdrawals_performed
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn opened_at(&self) -> DateTime<Local> {
        self.opened_at
    }

    /// Add `amount` to the balance. Does not write history.
    ///
    /// An amount the balance cannot absorb without overflowing is rejected
    /// as invalid.
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), TransactionError> {
        if amount <= Decimal::ZERO {
            return Err(TransactionError::InvalidAmount { amount });
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(TransactionError::InvalidAmount { amount })?;
        Ok(())
    }

    /// Take `amount` from the balance after the withdrawal policy and the
    /// balance rules pass. Does not write history.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), TransactionError> {
        self.policy.check(amount, self.withdrawals_performed)?;

        if amount <= Decimal::ZERO {
            return Err(TransactionError::InvalidAmount { amount });
        }
        if amount > self.balance {
            return Err(TransactionError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(TransactionError::InvalidAmount { amount })?;
        self.withdrawals_performed = self.withdrawals_performed.saturating_add(1);
        Ok(())
    }

    pub(crate) fn record(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        self.history.append(entry)
    }
}
