//! Account statement domain model

use chrono::{DateTime, Local};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::account::{Account, AccountNumber};
use super::history::HistoryEntry;

/// Point-in-time copy of an account's history and balance
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub account: AccountNumber,
    pub agency: String,
    pub holder: String,
    pub entries: Vec<HistoryEntry>,
    pub balance: Decimal,
    pub generated_at: DateTime<Local>,
}

impl Statement {
    pub fn for_account(account: &Account, holder: impl Into<String>) -> Self {
        Self {
            account: account.number(),
            agency: account.agency().to_string(),
            holder: holder.into(),
            entries: account.history().entries().cloned().collect(),
            balance: account.balance(),
            generated_at: Local::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render an amount with exactly two fractional digits
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::new(1000, 0)), "1000.00");
        assert_eq!(format_amount(Decimal::new(2550, 2)), "25.50");
        assert_eq!(format_amount(Decimal::new(12345, 3)), "12.35");
    }
}
