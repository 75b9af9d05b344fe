//! Wallet subsystem.
//!
//! # Data Flow
//! ```text
//! OS RNG (256 bits by default)
//!     → mnemonic.rs (BIP-39 encode, checksum + length validation)
//!     → derive.rs (BIP-44 path → address + private key)
//!     → Wallet, scoped to one scan cycle
//! ```
//!
//! # Security Constraints
//! - Never log private keys or phrases
//! - Keys leave this module only inside a match report

pub mod derive;
pub mod mnemonic;

pub use derive::{DerivationError, Wallet, WalletDeriver, DEFAULT_DERIVATION_PATH};
pub use mnemonic::{EntropySource, Mnemonic, MnemonicError, MnemonicGenerator};
