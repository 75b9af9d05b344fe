//! Balance query results and error definitions.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::chains::units::NativeAmount;

/// Errors from a single balance query attempt. All are retryable.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Connection, TLS, or body decoding failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The attempt did not complete in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Endpoint answered with a non-2xx status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Body had no usable `result` field.
    #[error("response has no result field")]
    MissingResult,

    /// Endpoint answered 200 but refused the query (JSON-RPC `error`,
    /// explorer `status` "0").
    #[error("query rejected: {0}")]
    Rejected(String),

    /// `result` was present but not an integer balance.
    #[error("unusable balance value '{0}'")]
    InvalidBalance(String),
}

/// Terminal state of a balance query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BalanceOutcome {
    /// The endpoint returned a balance.
    Ok,
    /// Every attempt failed. The balance is unknown, not zero.
    Exhausted,
}

impl BalanceOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceOutcome::Ok => "ok",
            BalanceOutcome::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for BalanceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering used for a balance that could not be fetched.
pub const UNKNOWN_BALANCE: &str = "n/a";

/// One chain's answer for one wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainBalanceResult {
    /// Chain identifier.
    pub chain: String,
    /// Display unit.
    pub symbol: String,
    /// Balance; zero when exhausted.
    pub amount: NativeAmount,
    pub outcome: BalanceOutcome,
    /// Attempts made to reach the terminal state.
    pub attempts: u32,
}

impl ChainBalanceResult {
    pub fn ok(chain: &str, symbol: &str, amount: NativeAmount, attempts: u32) -> Self {
        Self {
            chain: chain.to_string(),
            symbol: symbol.to_string(),
            amount,
            outcome: BalanceOutcome::Ok,
            attempts,
        }
    }

    pub fn exhausted(chain: &str, symbol: &str, decimals: u8, attempts: u32) -> Self {
        Self {
            chain: chain.to_string(),
            symbol: symbol.to_string(),
            amount: NativeAmount::zero(decimals),
            outcome: BalanceOutcome::Exhausted,
            attempts,
        }
    }

    /// A confirmed, non-zero balance.
    pub fn is_funded(&self) -> bool {
        self.outcome == BalanceOutcome::Ok && !self.amount.is_zero()
    }

    pub fn is_exhausted(&self) -> bool {
        self.outcome == BalanceOutcome::Exhausted
    }

    /// Balance text for records and reports: the amount, or `n/a` when exhausted.
    pub fn display_balance(&self) -> String {
        match self.outcome {
            BalanceOutcome::Ok => self.amount.to_string(),
            BalanceOutcome::Exhausted => UNKNOWN_BALANCE.to_string(),
        }
    }
}

impl fmt::Display for ChainBalanceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.display_balance(), self.symbol)
    }
}
