//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ScannerConfig (validated, immutable)
//!
//! environment (+ .env)
//!     → credentials.rs (one API key per keyed chain)
//!     → injected into each ChainBalanceClient at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Missing credentials are fatal before the first cycle

pub mod credentials;
pub mod loader;
pub mod schema;
pub mod validation;

pub use credentials::Credentials;
pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    BackoffStrategy, ChainConfig, DerivationFailurePolicy, ObservabilityConfig, RateLimitConfig,
    RequestStyle, RetryConfig, ScanConfig, ScannerConfig, SinkConfig, TimeoutConfig,
};
