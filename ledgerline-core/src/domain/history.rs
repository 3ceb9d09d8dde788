//! Account history domain model

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::TransactionKind;

/// Rendering format for history timestamps (day/month/year, 24-hour clock)
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// One recorded effect of a successful transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub recorded_at: DateTime<Local>,
}

impl HistoryEntry {
    pub fn new(kind: TransactionKind, amount: Decimal, recorded_at: DateTime<Local>) -> Self {
        Self {
            kind,
            amount,
            recorded_at,
        }
    }

    /// Create an entry stamped with the current wall-clock time
    pub fn now(kind: TransactionKind, amount: Decimal) -> Self {
        Self::new(kind, amount, Local::now())
    }

    /// Timestamp rendered as `dd/mm/yyyy HH:MM:SS`
    pub fn formatted_timestamp(&self) -> String {
        self.recorded_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Append-only, time-ordered log of one account's successful transactions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the end of the log.
    ///
    /// Timestamps never go backwards: if the clock stepped back since the
    /// previous entry, the new entry takes the previous timestamp.
    pub fn append(&mut self, mut entry: HistoryEntry) -> &HistoryEntry {
        if let Some(last) = self.entries.last() {
            if entry.recorded_at < last.recorded_at {
                entry.recorded_at = last.recorded_at;
            }
        }
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Entries in insertion order. Each call starts again from the first entry.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> + '_ {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
