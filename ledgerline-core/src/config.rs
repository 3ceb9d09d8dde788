//! Configuration management
//!
//! Settings live in `settings.json` inside the ledger directory:
//! ```json
//! {
//!   "accounts": { "agency": "0001", "perWithdrawalLimit": "500", "maxWithdrawals": 3 },
//!   "logging": { "enabled": true }
//! }
//! ```
//! Keys the CLI does not manage are kept when the file is saved.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{WithdrawalLimits, DEFAULT_AGENCY};

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    accounts: AccountSection,
    #[serde(default)]
    logging: LoggingSection,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    agency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    per_withdrawal_limit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_withdrawals: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoggingSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    enabled: Option<bool>,
}

/// Settings applied to every account the registry opens
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSettings {
    pub agency: String,
    pub limits: WithdrawalLimits,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            agency: DEFAULT_AGENCY.to_string(),
            limits: WithdrawalLimits::default(),
        }
    }
}

/// Ledgerline configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub accounts: AccountSettings,
    pub logging_enabled: bool,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            accounts: AccountSettings::default(),
            logging_enabled: true,
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the ledger directory
    ///
    /// Environment variables take precedence over the file:
    /// `LEDGERLINE_WITHDRAW_LIMIT`, `LEDGERLINE_MAX_WITHDRAWALS`, `LEDGERLINE_LOGGING`.
    /// Values that don't parse (or a negative limit) fall back to the defaults.
    pub fn load(ledger_dir: &Path) -> Result<Self> {
        let settings_path = ledger_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let defaults = WithdrawalLimits::default();

        let per_withdrawal_limit = env_parse::<Decimal>("LEDGERLINE_WITHDRAW_LIMIT")
            .or(raw.accounts.per_withdrawal_limit)
            .filter(|limit| *limit >= Decimal::ZERO)
            .unwrap_or(defaults.per_withdrawal_limit);

        let max_withdrawals = env_parse::<u32>("LEDGERLINE_MAX_WITHDRAWALS")
            .or(raw.accounts.max_withdrawals)
            .unwrap_or(defaults.max_withdrawals);

        let agency = raw
            .accounts
            .agency
            .clone()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AGENCY.to_string());

        let logging_enabled = match std::env::var("LEDGERLINE_LOGGING").ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.logging.enabled.unwrap_or(true),
        };

        Ok(Self {
            accounts: AccountSettings {
                agency,
                limits: WithdrawalLimits {
                    per_withdrawal_limit,
                    max_withdrawals,
                },
            },
            logging_enabled,
            _raw_settings: raw,
        })
    }

    /// Save config to the ledger directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self, ledger_dir: &Path) -> Result<()> {
        let settings_path = ledger_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            self._raw_settings.clone()
        };

        settings.accounts.agency = Some(self.accounts.agency.clone());
        settings.accounts.per_withdrawal_limit = Some(self.accounts.limits.per_withdrawal_limit);
        settings.accounts.max_withdrawals = Some(self.accounts.limits.max_withdrawals);
        settings.logging.enabled = Some(self.logging_enabled);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Account settings handed to the registry
    pub fn account_settings(&self) -> AccountSettings {
        self.accounts.clone()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
