//! Config command - show the effective configuration

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::get_context;
use ledgerline_core::domain::format_amount;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show settings after environment overrides
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show { json } => {
            let ctx = get_context()?;
            let accounts = &ctx.config.accounts;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "ledgerDir": ctx.ledger_dir().to_string_lossy(),
                        "accounts": accounts,
                        "logging": { "enabled": ctx.config.logging_enabled },
                    }))?
                );
                return Ok(());
            }

            println!("{}", "Ledgerline Configuration".bold());
            println!("  Directory: {}", ctx.ledger_dir().display());
            println!("  Agency: {}", accounts.agency);
            println!(
                "  Per-withdrawal limit: {}",
                format_amount(accounts.limits.per_withdrawal_limit)
            );
            println!("  Maximum withdrawals: {}", accounts.limits.max_withdrawals);
            println!(
                "  Logging: {}",
                if ctx.config.logging_enabled {
                    "on".green()
                } else {
                    "off".yellow()
                }
            );
            Ok(())
        }
    }
}
