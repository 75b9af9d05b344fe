//! Scan cycle subsystem.
//!
//! # Data Flow
//! ```text
//! MnemonicGenerator → WalletDeriver → ChainBalanceClient × N (concurrent)
//!     → record.rs (ScanRecord, match decision)
//!     → report.rs (match) | sink (miss)
//! ```
//!
//! # Design Decisions
//! - A match is any chain reporting Ok with a non-zero balance
//! - Exhausted chains count as zero for the decision but stay visible
//! - A record is reported or persisted, never both, never neither

pub mod orchestrator;
pub mod record;
pub mod report;
pub mod types;

pub use orchestrator::ScanOrchestrator;
pub use record::{MissRecord, ScanRecord};
pub use report::{ConsoleReporter, MatchReporter};
pub use types::{CycleOutcome, CyclePhase, RunStats, RunSummary, ScanError, StopReason};
