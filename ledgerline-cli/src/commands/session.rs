//! Session command - interactive banking menu
//!
//! Clients and accounts live only for the length of the session.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use colored::Colorize;
use dialoguer::{Input, Select};
use rust_decimal::Decimal;

use super::{get_context, get_logger, log_command, log_error, log_event};
use crate::output;
use ledgerline_core::domain::format_amount;
use ledgerline_core::services::{AccountSummary, Registry, OUTCOME_OK};
use ledgerline_core::{
    AccountNumber, EntryPoint, Error, LogEvent, LoggingService, NewClient, StatementService,
    TaxId, Transaction,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    Deposit,
    Withdraw,
    Statement,
    ExportStatement,
    NewClient,
    NewAccount,
    ListAccounts,
    Quit,
}

impl MenuOption {
    const ALL: [MenuOption; 8] = [
        MenuOption::Deposit,
        MenuOption::Withdraw,
        MenuOption::Statement,
        MenuOption::ExportStatement,
        MenuOption::NewClient,
        MenuOption::NewAccount,
        MenuOption::ListAccounts,
        MenuOption::Quit,
    ];

    fn label(&self) -> &'static str {
        match self {
            MenuOption::Deposit => "[d]  Deposit",
            MenuOption::Withdraw => "[s]  Withdraw",
            MenuOption::Statement => "[e]  Statement",
            MenuOption::ExportStatement => "[x]  Export statement",
            MenuOption::NewClient => "[nu] New client",
            MenuOption::NewAccount => "[nc] New account",
            MenuOption::ListAccounts => "[lc] List accounts",
            MenuOption::Quit => "[q]  Quit",
        }
    }

    fn command(&self) -> &'static str {
        match self {
            MenuOption::Deposit => "deposit",
            MenuOption::Withdraw => "withdraw",
            MenuOption::Statement => "statement",
            MenuOption::ExportStatement => "export_statement",
            MenuOption::NewClient => "new_client",
            MenuOption::NewAccount => "new_account",
            MenuOption::ListAccounts => "list_accounts",
            MenuOption::Quit => "quit",
        }
    }
}

pub fn run() -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger(&ctx, EntryPoint::Session);
    log_event(&logger, LogEvent::new("session_started"));

    let labels: Vec<&str> = MenuOption::ALL.iter().map(|o| o.label()).collect();

    loop {
        println!();
        let choice = Select::new()
            .with_prompt("Menu")
            .items(&labels)
            .default(0)
            .interact()?;
        let option = MenuOption::ALL[choice];

        if option == MenuOption::Quit {
            break;
        }

        log_command(&logger, option.command());

        let result = match option {
            MenuOption::Deposit => transact(&ctx.registry, &logger, option, Transaction::deposit),
            MenuOption::Withdraw => transact(&ctx.registry, &logger, option, Transaction::withdraw),
            MenuOption::Statement => show_statement(&ctx.registry),
            MenuOption::ExportStatement => export_statement(&ctx.registry),
            MenuOption::NewClient => new_client(&ctx.registry),
            MenuOption::NewAccount => new_account(&ctx.registry, &logger),
            MenuOption::ListAccounts => list_accounts(&ctx.registry),
            MenuOption::Quit => Ok(()),
        };

        // Failures are reported and the menu comes back
        if let Err(e) = result {
            log_error(
                &logger,
                &format!("{}_failed", option.command()),
                failure_kind(&e),
            );
            output::error(&format!("Operation failed: {}", e));
        }
    }

    log_event(&logger, LogEvent::new("session_finished"));
    Ok(())
}

/// Ask for a tax id and resolve the registered client
fn prompt_client(registry: &Registry) -> Result<TaxId> {
    let raw: String = Input::new().with_prompt("Client tax id").interact_text()?;
    let tax_id = TaxId::parse(&raw)?;
    if registry.find_client(&tax_id)?.is_none() {
        return Err(anyhow!("Client not found"));
    }
    Ok(tax_id)
}

/// Pick one of the client's accounts; asks only when there is more than one
fn prompt_account(registry: &Registry, tax_id: &TaxId) -> Result<AccountNumber> {
    let accounts = registry.client_accounts(tax_id)?;
    match accounts.as_slice() {
        [] => Err(anyhow!("Client has no accounts")),
        [only] => Ok(only.number),
        many => {
            let items: Vec<String> = many
                .iter()
                .map(|a| format!("Agency {} / Account {}", a.agency, a.number))
                .collect();
            let choice = Select::new()
                .with_prompt("Account")
                .items(&items)
                .default(0)
                .interact()?;
            Ok(many[choice].number)
        }
    }
}

fn transact(
    registry: &Registry,
    logger: &Option<LoggingService>,
    option: MenuOption,
    make: fn(Decimal) -> Transaction,
) -> Result<()> {
    let tax_id = prompt_client(registry)?;
    let number = prompt_account(registry, &tax_id)?;
    let raw: String = Input::new().with_prompt("Amount").interact_text()?;
    let amount = parse_amount(&raw)?;

    let event = LogEvent::new(format!("{}_requested", option.command()))
        .with_command(option.command())
        .with_account(number);

    match registry.execute(&tax_id, number, make(amount)) {
        Ok(entry) => {
            log_event(logger, event.with_outcome(OUTCOME_OK));
            output::success(&format!(
                "{} of {} completed",
                entry.kind,
                format_amount(entry.amount)
            ));
            Ok(())
        }
        Err(Error::Transaction(rejection)) => {
            log_event(logger, event.with_rejection(&rejection));
            output::error(&rejection_message(&rejection));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Category of a failed menu operation; error text may carry client data
fn failure_kind(error: &anyhow::Error) -> &'static str {
    error
        .downcast_ref::<Error>()
        .map(Error::kind)
        .unwrap_or("input")
}

fn rejection_message(rejection: &ledgerline_core::TransactionError) -> String {
    use ledgerline_core::TransactionError::*;
    match rejection {
        InvalidAmount { .. } => "Operation failed: invalid amount.".to_string(),
        InsufficientFunds { available, .. } => format!(
            "Operation failed: insufficient funds (available {}).",
            format_amount(*available)
        ),
        WithdrawLimitExceeded { limit, .. } => format!(
            "Operation failed: withdrawal exceeds the limit of {}.",
            format_amount(*limit)
        ),
        WithdrawCountExceeded { max } => {
            format!("Operation failed: maximum number of withdrawals ({}) reached.", max)
        }
        AccountNotOwned { account } => {
            format!("Operation failed: account {} does not belong to this client.", account)
        }
    }
}

fn show_statement(registry: &Registry) -> Result<()> {
    let tax_id = prompt_client(registry)?;
    let number = prompt_account(registry, &tax_id)?;
    let statement = StatementService::statement(registry, number)?;

    println!();
    println!(
        "{}",
        format!("Statement - agency {} / account {}", statement.agency, statement.account).bold()
    );

    if statement.is_empty() {
        println!("No movements were made.");
    } else {
        let mut table = output::create_table();
        table.set_header(vec!["Kind", "Amount", "Date"]);
        for entry in &statement.entries {
            table.add_row(vec![
                entry.kind.to_string(),
                format_amount(entry.amount),
                entry.formatted_timestamp(),
            ]);
        }
        println!("{}", table);
    }

    println!("Current balance: {}", format_amount(statement.balance).bold());
    Ok(())
}

fn export_statement(registry: &Registry) -> Result<()> {
    let tax_id = prompt_client(registry)?;
    let number = prompt_account(registry, &tax_id)?;
    let statement = StatementService::statement(registry, number)?;

    let default_name = format!("statement-{}.csv", number);
    let path: String = Input::new()
        .with_prompt("Export to (.csv or .json)")
        .default(default_name)
        .interact_text()?;
    let path = PathBuf::from(path);

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        std::fs::write(&path, StatementService::to_json(&statement)?)
            .with_context(|| format!("Failed to write {:?}", path))?;
    } else {
        let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
        StatementService::write_csv(&statement, BufWriter::new(file))?;
    }

    output::success(&format!(
        "Exported {} entries to {}",
        statement.entries.len(),
        path.display()
    ));
    Ok(())
}

fn new_client(registry: &Registry) -> Result<()> {
    let tax_id: String = Input::new()
        .with_prompt("Tax id (digits only)")
        .interact_text()?;
    let name: String = Input::new().with_prompt("Full name").interact_text()?;
    let birth_date: String = Input::new()
        .with_prompt("Birth date (dd-mm-yyyy, optional)")
        .allow_empty(true)
        .interact_text()?;
    let address: String = Input::new()
        .with_prompt("Address (street, number - district - city/state, optional)")
        .allow_empty(true)
        .interact_text()?;

    let client = registry.register_client(NewClient {
        tax_id,
        name,
        birth_date: parse_birth_date(&birth_date)?,
        address: Some(address),
    });

    match client {
        Ok(client) => {
            output::success(&format!("Client {} created", client.name()));
            Ok(())
        }
        Err(Error::Conflict(_)) => {
            output::warning("A client with this tax id already exists.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

fn new_account(registry: &Registry, logger: &Option<LoggingService>) -> Result<()> {
    let tax_id = prompt_client(registry)?;
    let number = registry.open_account(&tax_id)?;
    log_event(
        logger,
        LogEvent::new("account_opened")
            .with_command(MenuOption::NewAccount.command())
            .with_account(number),
    );

    let limits = registry.settings().limits;
    output::success(&format!("Account {} created", number));
    output::info(&format!(
        "Withdrawals limited to {} each, {} in total",
        format_amount(limits.per_withdrawal_limit),
        limits.max_withdrawals
    ));
    Ok(())
}

fn list_accounts(registry: &Registry) -> Result<()> {
    let accounts = registry.accounts()?;
    if accounts.is_empty() {
        println!("No accounts yet.");
        return Ok(());
    }
    println!("{}", accounts_table(&accounts));
    Ok(())
}

fn accounts_table(accounts: &[AccountSummary]) -> comfy_table::Table {
    let mut table = output::create_table();
    table.set_header(vec!["Agency", "Account", "Holder", "Balance", "Withdrawals"]);
    for account in accounts {
        table.add_row(vec![
            account.agency.clone(),
            account.number.to_string(),
            account.holder.clone(),
            format_amount(account.balance),
            account.withdrawals_performed.to_string(),
        ]);
    }
    table
}

/// Parse a user-typed amount; accepts `,` as the decimal separator
fn parse_amount(raw: &str) -> Result<Decimal> {
    let normalized = raw.trim().replace(',', ".");
    let amount = Decimal::from_str(&normalized)
        .map_err(|_| anyhow!("Invalid amount: {}", raw.trim()))?;
    if amount.normalize().scale() > 2 {
        return Err(anyhow!("Amounts have at most two decimal places"));
    }
    Ok(amount)
}

fn parse_birth_date(raw: &str) -> Result<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%d-%m-%Y")
        .map(Some)
        .map_err(|_| anyhow!("Invalid date format. Use dd-mm-yyyy"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_uses_error_category() {
        let err: anyhow::Error = TaxId::parse("12a").unwrap_err().into();
        assert_eq!(failure_kind(&err), "validation");

        let err = parse_amount("abc").unwrap_err();
        assert_eq!(failure_kind(&err), "input");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1000").unwrap(), Decimal::new(1000, 0));
        assert_eq!(parse_amount(" 25,50 ").unwrap(), Decimal::new(2550, 2));
        assert_eq!(parse_amount("-10").unwrap(), Decimal::new(-10, 0));
        assert_eq!(parse_amount("1.500").unwrap(), Decimal::new(15, 1));
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("1.005").is_err());
    }

    #[test]
    fn test_parse_birth_date() {
        assert_eq!(parse_birth_date("").unwrap(), None);
        assert_eq!(
            parse_birth_date("07-03-1990").unwrap(),
            NaiveDate::from_ymd_opt(1990, 3, 7)
        );
        assert!(parse_birth_date("1990-03-07").is_err());
    }

    #[test]
    fn test_rejection_message_uses_two_decimals() {
        let msg = rejection_message(&ledgerline_core::TransactionError::WithdrawLimitExceeded {
            amount: Decimal::new(600, 0),
            limit: Decimal::new(500, 0),
        });
        assert_eq!(msg, "Operation failed: withdrawal exceeds the limit of 500.00.");
    }
}
