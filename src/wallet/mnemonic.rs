//! Seed phrase generation and validation.

use bip39::Language;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::fmt;
use thiserror::Error;

use crate::config::validation::SUPPORTED_WORD_COUNTS;

/// Errors produced while generating or accepting a phrase.
#[derive(Debug, Error)]
pub enum MnemonicError {
    /// Checksum or wordlist validation failed.
    #[error("invalid mnemonic: {0}")]
    Invalid(#[from] bip39::Error),

    /// The phrase parsed but its length is outside policy.
    #[error("mnemonic has {0} words, expected 12, 15, 18, 21 or 24")]
    WordCount(usize),

    /// The generator never produced an acceptable phrase.
    #[error("no valid mnemonic after {attempts} attempts")]
    AttemptsExhausted { attempts: u32 },
}

/// A checksum-validated BIP-39 phrase (English wordlist).
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    phrase: String,
    word_count: usize,
}

impl Mnemonic {
    /// Accept a phrase only if it passes the wordlist checksum and length policy.
    pub fn parse(phrase: &str) -> Result<Self, MnemonicError> {
        let inner = bip39::Mnemonic::parse_in_normalized(Language::English, phrase.trim())?;
        let word_count = inner.word_count();
        if !SUPPORTED_WORD_COUNTS.contains(&word_count) {
            return Err(MnemonicError::WordCount(word_count));
        }
        Ok(Self {
            phrase: inner.to_string(),
            word_count,
        })
    }

    /// Space-separated words.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phrase)
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("word_count", &self.word_count)
            .finish_non_exhaustive()
    }
}

/// Cryptographically secure randomness for phrase entropy.
pub trait EntropySource: RngCore + CryptoRng + Send {}

impl<T: RngCore + CryptoRng + Send> EntropySource for T {}

/// Entropy bytes for a BIP-39 phrase of `word_count` words (24 words = 256 bits).
pub fn entropy_bytes(word_count: usize) -> usize {
    word_count * 4 / 3
}

/// Produces random phrases that already passed validation.
pub struct MnemonicGenerator {
    rng: Box<dyn EntropySource>,
    word_count: usize,
    max_attempts: u32,
}

impl MnemonicGenerator {
    /// Generator backed by the operating system's RNG.
    pub fn new(word_count: usize, max_attempts: u32) -> Self {
        Self::with_rng(OsRng, word_count, max_attempts)
    }

    /// Generator backed by a caller-supplied RNG.
    pub fn with_rng<R: EntropySource + 'static>(
        rng: R,
        word_count: usize,
        max_attempts: u32,
    ) -> Self {
        Self {
            rng: Box::new(rng),
            word_count,
            max_attempts,
        }
    }

    /// Generate a phrase, regenerating when validation rejects a candidate.
    ///
    /// Rejection should never happen with a working wordlist library; the cap
    /// turns a misbehaving one into an error instead of a spin.
    pub fn generate(&mut self) -> Result<Mnemonic, MnemonicError> {
        let max_attempts = self.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            match self.candidate().and_then(|phrase| Mnemonic::parse(&phrase)) {
                Ok(mnemonic) => return Ok(mnemonic),
                Err(e) => {
                    tracing::warn!(attempt = attempt, error = %e, "Generated mnemonic rejected");
                }
            }
        }
        Err(MnemonicError::AttemptsExhausted {
            attempts: max_attempts,
        })
    }

    fn candidate(&mut self) -> Result<String, MnemonicError> {
        let mut entropy = vec![0u8; entropy_bytes(self.word_count)];
        self.rng.fill_bytes(&mut entropy);
        let mnemonic = bip39::Mnemonic::from_entropy_in(Language::English, &entropy)?;
        entropy.fill(0);
        Ok(mnemonic.to_string())
    }
}

impl fmt::Debug for MnemonicGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicGenerator")
            .field("word_count", &self.word_count)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}
