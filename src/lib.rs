//! Seed Phrase Balance Scanner Library

pub mod chains;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod scan;
pub mod sink;
pub mod wallet;

pub use config::schema::ScannerConfig;
pub use lifecycle::Shutdown;
pub use scan::ScanOrchestrator;
