//! CLI command implementations

pub mod config;
pub mod logs;
pub mod session;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use ledgerline_core::{EntryPoint, LedgerContext, LogEvent, LoggingService};

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Log a menu command, ignoring any errors
pub fn log_command(logger: &Option<LoggingService>, command: &str) {
    if let Some(l) = logger {
        let _ = l.log_command(command);
    }
}

/// Log a failed operation, ignoring any errors
pub fn log_error(logger: &Option<LoggingService>, event: &str, message: &str) {
    if let Some(l) = logger {
        let _ = l.log_error(event, message);
    }
}

/// Get the ledger directory from environment or default
pub fn get_ledger_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("LEDGERLINE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".ledgerline"))
        .ok_or_else(|| anyhow!("Could not find home directory; set LEDGERLINE_DIR"))
}

/// Create the ledger directory if needed and build a fresh context
pub fn get_context() -> Result<LedgerContext> {
    let ledger_dir = get_ledger_dir()?;

    std::fs::create_dir_all(&ledger_dir)
        .with_context(|| format!("Failed to create ledger directory: {:?}", ledger_dir))?;

    LedgerContext::new(&ledger_dir).context("Failed to initialize ledger context")
}

/// Open the event log for the given entry point, if enabled and available
pub fn get_logger(ctx: &LedgerContext, entry_point: EntryPoint) -> Option<LoggingService> {
    ctx.logger(entry_point, env!("CARGO_PKG_VERSION"))
}
