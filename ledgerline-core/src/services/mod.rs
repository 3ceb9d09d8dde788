//! Service layer - business logic orchestration
//!
//! Services coordinate the domain for the CLI. Each service focuses on a
//! specific use case or feature area.

pub mod logging;
pub mod registry;
mod statement;

pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService, OUTCOME_OK};
pub use registry::{AccountSummary, Registry, SharedAccount};
pub use statement::StatementService;
