//! Cycle outcomes, run accounting and error definitions.

use alloy::primitives::Address;
use std::io;
use thiserror::Error;

use crate::chains::ChainBalanceResult;
use crate::scan::record::{MissRecord, ScanRecord};
use crate::sink::SinkError;
use crate::wallet::{DerivationError, MnemonicError};

/// Errors that end a cycle early.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The phrase generator misbehaved. Fatal to the run.
    #[error("mnemonic generation failed: {0}")]
    Generation(#[from] MnemonicError),

    /// The phrase could not be turned into a wallet. Fatal to the cycle.
    #[error(transparent)]
    Derivation(#[from] DerivationError),

    /// The miss record for `address` was not persisted.
    #[error("scan record for {address} lost: {source}")]
    Persistence {
        address: Address,
        #[source]
        source: SinkError,
    },

    /// A funded wallet could not be shown. The record rides along so the
    /// caller can still surface it.
    #[error("match report for {} failed: {source}", .record.wallet().address())]
    Report {
        record: Box<ScanRecord>,
        #[source]
        source: io::Error,
    },
}

/// Stage of a scan cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Generating,
    Deriving,
    Querying,
    Aggregating,
    Done,
}

/// Result of a completed cycle.
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// At least one chain confirmed a non-zero balance; reported, not persisted.
    Match(ScanRecord),
    /// No funds found; appended to the sink. The key is already gone.
    Miss(MissRecord),
}

impl CycleOutcome {
    pub fn address(&self) -> Address {
        match self {
            CycleOutcome::Match(record) => record.wallet().address(),
            CycleOutcome::Miss(miss) => miss.address(),
        }
    }

    pub fn balances(&self) -> &[ChainBalanceResult] {
        match self {
            CycleOutcome::Match(record) => record.balances(),
            CycleOutcome::Miss(miss) => miss.balances(),
        }
    }

    /// Result for a chain by name.
    pub fn get(&self, chain: &str) -> Option<&ChainBalanceResult> {
        self.balances().iter().find(|b| b.chain == chain)
    }

    pub fn is_match(&self) -> bool {
        matches!(self, CycleOutcome::Match(_))
    }
}

/// Counters kept across cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Cycles started, failed ones included.
    pub cycles: u64,
    pub misses: u64,
    pub matches: u64,
    pub derivation_failures: u64,
    /// Misses the sink failed to persist.
    pub records_lost: u64,
    pub consecutive_sink_failures: u32,
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    MaxCycles,
    Matched,
    Shutdown,
}

/// Final state of a run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub stats: RunStats,
    pub reason: StopReason,
}
