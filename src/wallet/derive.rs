//! Wallet derivation from a validated mnemonic.
//!
//! # Security
//! - The private key lives only inside `Wallet` for the duration of a cycle
//! - `Debug` never prints the key; only the match report does

use alloy::primitives::{Address, B256};
use alloy::signers::local::coins_bip39::English;
use alloy::signers::local::{LocalSignerError, MnemonicBuilder};
use std::fmt;
use thiserror::Error;

use crate::wallet::mnemonic::Mnemonic;

/// Standard BIP-44 path for the first Ethereum account.
pub const DEFAULT_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// Deriving a wallet from a phrase failed.
#[derive(Debug, Error)]
#[error("wallet derivation failed: {0}")]
pub struct DerivationError(#[from] LocalSignerError);

/// Address and private key for one derived account.
///
/// The address is shared by every EVM-compatible chain.
#[derive(Clone, PartialEq, Eq)]
pub struct Wallet {
    address: Address,
    private_key: B256,
}

impl Wallet {
    pub fn address(&self) -> Address {
        self.address
    }

    /// `0x`-prefixed hex private key. Only for match reports.
    pub fn private_key_hex(&self) -> String {
        alloy::hex::encode_prefixed(self.private_key)
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Derives wallets along a fixed HD path.
#[derive(Debug, Clone)]
pub struct WalletDeriver {
    derivation_path: String,
}

impl WalletDeriver {
    pub fn new(derivation_path: impl Into<String>) -> Self {
        Self {
            derivation_path: derivation_path.into(),
        }
    }

    pub fn derivation_path(&self) -> &str {
        &self.derivation_path
    }

    /// Derive the wallet for `mnemonic`. Never substitutes a zero address.
    pub fn derive(&self, mnemonic: &Mnemonic) -> Result<Wallet, DerivationError> {
        let signer = MnemonicBuilder::<English>::default()
            .phrase(mnemonic.phrase())
            .derivation_path(&self.derivation_path)?
            .build()?;

        Ok(Wallet {
            address: signer.address(),
            private_key: signer.to_bytes(),
        })
    }
}

impl Default for WalletDeriver {
    fn default() -> Self {
        Self::new(DEFAULT_DERIVATION_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known development mnemonic (Anvil / Hardhat default accounts)
    const TEST_PHRASE: &str = "test test test test test test test test test test test junk";

    #[test]
    fn test_known_vector() {
        let wallet = WalletDeriver::default()
            .derive(&Mnemonic::parse(TEST_PHRASE).unwrap())
            .unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
        assert_eq!(
            wallet.private_key_hex(),
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
        );
    }

    #[test]
    fn test_second_account_path() {
        let wallet = WalletDeriver::new("m/44'/60'/0'/0/1")
            .derive(&Mnemonic::parse(TEST_PHRASE).unwrap())
            .unwrap();
        assert_eq!(
            wallet.address().to_string().to_lowercase(),
            "0x70997970c51812dc3a010c7d01b50e0d17dc79c8"
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let mnemonic = Mnemonic::parse(TEST_PHRASE).unwrap();
        let deriver = WalletDeriver::default();
        let first = deriver.derive(&mnemonic).unwrap();
        let second = deriver.derive(&mnemonic).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.private_key_hex(), second.private_key_hex());
    }

    #[test]
    fn test_invalid_path() {
        let mnemonic = Mnemonic::parse(TEST_PHRASE).unwrap();
        let result = WalletDeriver::new("not/a/path").derive(&mnemonic);
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let wallet = WalletDeriver::default()
            .derive(&Mnemonic::parse(TEST_PHRASE).unwrap())
            .unwrap();
        let debug = format!("{wallet:?}");
        assert!(debug.contains("redacted"));
        assert!(!debug.contains("ac0974bec"));
    }
}
