//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, human or JSON)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Console / log aggregation
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (chain, attempt, address) on every event
//! - Private keys never reach a log event
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
