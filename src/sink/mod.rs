//! Result sink subsystem.
//!
//! # Data Flow
//! ```text
//! ScanRecord (miss)
//!     → line.rs (pipe-delimited line)
//!     → file.rs (single append-mode write)
//!
//! scan-ledger binary
//!     → line.rs (parse every line back for inspection)
//! ```

pub mod file;
pub mod line;

use std::path::PathBuf;
use thiserror::Error;

use crate::scan::ScanRecord;

pub use file::FileSink;
pub use line::{format_record, parse_line, LineBalance, LineError, RecordLine};

/// A miss record could not be persisted.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to append to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Durable destination for miss records.
pub trait ResultSink {
    /// Append one record. Must not read back or rewrite earlier records.
    fn append(&self, record: &ScanRecord) -> Result<(), SinkError>;
}
