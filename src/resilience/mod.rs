//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Balance query to a chain endpoint:
//!     → rate_limit.rs (wait for the provider's token)
//!     → request with per-attempt timeout
//!     → On failure: retries.rs (attempt cap, pause from backoff.rs)
//!     → On exhaustion: caller degrades to an Exhausted result
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Fixed pause by default, exponential + jitter available
//! - Rate limiting delays requests, it never drops them

pub mod backoff;
pub mod rate_limit;
pub mod retries;

pub use rate_limit::{ProviderBucket, ProviderRateLimiter};
pub use retries::{Exhausted, RetryPolicy};
