//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config + credentials → HTTP client → chain clients → orchestrator
//!
//! Shutdown (shutdown.rs):
//!     Signal received → loop finishes current cycle → summary → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - A cycle in flight is never interrupted

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::{spawn_signal_handler, wait_for_shutdown_signal};
pub use startup::{build_chain_clients, build_http_client, build_orchestrator, StartupError};
