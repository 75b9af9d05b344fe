//! Multi-chain balance resolution.
//!
//! # Data Flow
//! ```text
//! ChainConfig (endpoint, style, decimals) + API key
//!     → client.rs (ChainQuery → GET ?module=account / POST eth_getBalance)
//!     → units.rs (decimal or hex integer → NativeAmount)
//!     → types.rs (ChainBalanceResult: Ok or Exhausted)
//! ```
//!
//! # Design Decisions
//! - One parameterized client type; chains differ only by descriptor
//! - Clients share nothing mutable except an optional provider bucket
//! - Exhausted is a value, not an error

pub mod client;
pub mod types;
pub mod units;

pub use client::{ChainBalanceClient, ChainQuery};
pub use types::{BalanceOutcome, ChainBalanceResult, ChainError, UNKNOWN_BALANCE};
pub use units::NativeAmount;
