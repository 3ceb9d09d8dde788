//! Statement service - account statements and their exports

use std::io::Write;

use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{format_amount, AccountNumber, Statement};
use crate::services::registry::{lock, Registry};

/// One CSV row of an exported statement
#[derive(Debug, Serialize)]
struct StatementRow<'a> {
    kind: &'static str,
    amount: String,
    recorded_at: &'a str,
}

/// Builds statements from the registry and writes them out
pub struct StatementService;

impl StatementService {
    /// Statement of one account with the holder's name filled in
    pub fn statement(registry: &Registry, number: AccountNumber) -> Result<Statement> {
        let shared = registry
            .account(number)?
            .ok_or_else(|| Error::not_found(format!("account {number}")))?;
        // Release the account before touching the client map
        let (mut statement, owner) = {
            let account = lock(&shared)?;
            (Statement::for_account(&account, ""), account.owner().clone())
        };

        statement.holder = registry
            .find_client(&owner)?
            .map(|c| c.name().to_string())
            .unwrap_or_default();

        Ok(statement)
    }

    /// Write the statement entries as CSV, in history order
    ///
    /// Columns: `kind,amount,recorded_at`. Amounts carry two decimals and
    /// timestamps use `dd/mm/yyyy HH:MM:SS`.
    pub fn write_csv<W: Write>(statement: &Statement, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for entry in &statement.entries {
            let recorded_at = entry.formatted_timestamp();
            csv_writer.serialize(StatementRow {
                kind: entry.kind.as_str(),
                amount: format_amount(entry.amount),
                recorded_at: &recorded_at,
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_json(statement: &Statement) -> Result<String> {
        Ok(serde_json::to_string_pretty(statement)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccountSettings;
    use crate::domain::{NewClient, Transaction};
    use rust_decimal::Decimal;

    fn funded_registry() -> (Registry, AccountNumber) {
        let registry = Registry::new(AccountSettings::default());
        let client = registry
            .register_client(NewClient {
                tax_id: "111".to_string(),
                name: "Maria".to_string(),
                ..Default::default()
            })
            .unwrap();
        let number = registry.open_account(client.tax_id()).unwrap();
        registry
            .execute(client.tax_id(), number, Transaction::deposit(Decimal::new(1000, 0)))
            .unwrap();
        registry
            .execute(client.tax_id(), number, Transaction::withdraw(Decimal::new(2550, 2)))
            .unwrap();
        (registry, number)
    }

    #[test]
    fn test_statement_copies_history() {
        let (registry, number) = funded_registry();
        let statement = StatementService::statement(&registry, number).unwrap();

        assert_eq!(statement.holder, "Maria");
        assert_eq!(statement.agency, "0001");
        assert_eq!(statement.entries.len(), 2);
        assert_eq!(statement.balance, Decimal::new(97450, 2));
    }

    #[test]
    fn test_csv_export_keeps_order() {
        let (registry, number) = funded_registry();
        let statement = StatementService::statement(&registry, number).unwrap();

        let mut out = Vec::new();
        StatementService::write_csv(&statement, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines[0], "kind,amount,recorded_at");
        assert!(lines[1].starts_with("deposit,1000.00,"));
        assert!(lines[2].starts_with("withdraw,25.50,"));
    }

    #[test]
    fn test_json_export() {
        let (registry, number) = funded_registry();
        let statement = StatementService::statement(&registry, number).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&StatementService::to_json(&statement).unwrap()).unwrap();

        assert_eq!(json["account"], 1);
        assert_eq!(json["entries"][0]["kind"], "deposit");
        assert_eq!(json["entries"][1]["amount"], "25.50");
    }

    #[test]
    fn test_unknown_account() {
        let registry = Registry::new(AccountSettings::default());
        assert!(StatementService::statement(&registry, AccountNumber::new(9)).is_err());
    }
}
