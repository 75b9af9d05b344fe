//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts > 0, supported word counts)
//! - Detect duplicate chain names and malformed endpoints
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ScannerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::ScannerConfig;

/// Word counts defined by BIP-39.
pub const SUPPORTED_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("scan.word_count {0} is not one of 12, 15, 18, 21, 24")]
    WordCount(usize),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("no chains configured")]
    NoChains,

    #[error("duplicate chain name '{0}'")]
    DuplicateChain(String),

    #[error("chain '{name}' has invalid endpoint '{endpoint}'")]
    Endpoint { name: String, endpoint: String },

    #[error("chain '{0}' has decimals above 77")]
    Decimals(String),

    #[error("sink.path is empty")]
    EmptySinkPath,
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ScannerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !SUPPORTED_WORD_COUNTS.contains(&config.scan.word_count) {
        errors.push(ValidationError::WordCount(config.scan.word_count));
    }
    if config.scan.max_generation_attempts == 0 {
        errors.push(ValidationError::Zero("scan.max_generation_attempts"));
    }
    if config.scan.max_consecutive_sink_failures == 0 {
        errors.push(ValidationError::Zero("scan.max_consecutive_sink_failures"));
    }
    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::Zero("retries.max_attempts"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.rate_limit.enabled && config.rate_limit.requests_per_second == 0 {
        errors.push(ValidationError::Zero("rate_limit.requests_per_second"));
    }
    if config.sink.path.trim().is_empty() {
        errors.push(ValidationError::EmptySinkPath);
    }

    if config.chains.is_empty() {
        errors.push(ValidationError::NoChains);
    }
    let mut seen = HashSet::new();
    for chain in &config.chains {
        if !seen.insert(chain.name.as_str()) {
            errors.push(ValidationError::DuplicateChain(chain.name.clone()));
        }
        let scheme_ok = url::Url::parse(&chain.endpoint)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !scheme_ok {
            errors.push(ValidationError::Endpoint {
                name: chain.name.clone(),
                endpoint: chain.endpoint.clone(),
            });
        }
        // 10^78 overflows U256.
        if chain.decimals > 77 {
            errors.push(ValidationError::Decimals(chain.name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
