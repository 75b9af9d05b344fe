//! Aggregated outcome of one scan cycle.

use alloy::primitives::Address;
use std::time::SystemTime;

use crate::chains::ChainBalanceResult;
use crate::wallet::{Mnemonic, Wallet};

/// Wallet, phrase, and every chain's answer for one completed cycle.
///
/// Immutable once built. Exactly one of: reported as a match, or appended to
/// the sink as a miss.
#[derive(Debug, Clone)]
pub struct ScanRecord {
    wallet: Wallet,
    mnemonic: Mnemonic,
    balances: Vec<ChainBalanceResult>,
    timestamp: SystemTime,
}

impl ScanRecord {
    /// `balances` keeps the configured chain order.
    pub fn new(wallet: Wallet, mnemonic: Mnemonic, balances: Vec<ChainBalanceResult>) -> Self {
        Self {
            wallet,
            mnemonic,
            balances,
            timestamp: SystemTime::now(),
        }
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn mnemonic(&self) -> &Mnemonic {
        &self.mnemonic
    }

    pub fn balances(&self) -> &[ChainBalanceResult] {
        &self.balances
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// Result for a chain by name.
    pub fn get(&self, chain: &str) -> Option<&ChainBalanceResult> {
        self.balances.iter().find(|b| b.chain == chain)
    }

    /// Any chain confirmed a non-zero balance. Exhausted chains count as zero.
    pub fn is_match(&self) -> bool {
        self.balances.iter().any(ChainBalanceResult::is_funded)
    }

    /// Chains whose balance is unknown.
    pub fn exhausted_chains(&self) -> impl Iterator<Item = &str> {
        self.balances
            .iter()
            .filter(|b| b.is_exhausted())
            .map(|b| b.chain.as_str())
    }

    /// Keep only what a persisted miss may expose; the private key is dropped here.
    pub fn into_miss(self) -> MissRecord {
        MissRecord {
            address: self.wallet.address(),
            balances: self.balances,
            timestamp: self.timestamp,
        }
    }
}

/// What survives a miss cycle once its line is written: no key, no phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissRecord {
    address: Address,
    balances: Vec<ChainBalanceResult>,
    timestamp: SystemTime,
}

impl MissRecord {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn balances(&self) -> &[ChainBalanceResult] {
        &self.balances
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    pub fn get(&self, chain: &str) -> Option<&ChainBalanceResult> {
        self.balances.iter().find(|b| b.chain == chain)
    }
}
