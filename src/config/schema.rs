//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the scanner.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the scanner.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Scan loop settings (entropy policy, delays, halting rules).
    pub scan: ScanConfig,

    /// Retry policy applied to every balance query.
    pub retries: RetryConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Per-provider rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Where miss records are appended.
    pub sink: SinkConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Chains queried for every derived wallet, in record order.
    pub chains: Vec<ChainConfig>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            scan: ScanConfig::default(),
            retries: RetryConfig::default(),
            timeouts: TimeoutConfig::default(),
            rate_limit: RateLimitConfig::default(),
            sink: SinkConfig::default(),
            observability: ObservabilityConfig::default(),
            chains: default_chains(),
        }
    }
}

/// What to do when a derived wallet cannot be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivationFailurePolicy {
    /// Log, skip the cycle, keep scanning.
    Continue,
    /// Stop the run with the error.
    Halt,
}

/// Scan loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Mnemonic length in words (12, 15, 18, 21 or 24).
    pub word_count: usize,

    /// Regeneration cap when a generated phrase fails validation.
    pub max_generation_attempts: u32,

    /// BIP-44 path used for every derived wallet.
    pub derivation_path: String,

    /// Pause between cycles in milliseconds.
    pub cycle_delay_ms: u64,

    /// Stop after this many cycles (unbounded when absent).
    pub max_cycles: Option<u64>,

    /// Stop the loop once a funded wallet is reported.
    pub halt_on_match: bool,

    /// Policy for derivation failures.
    pub on_derivation_error: DerivationFailurePolicy,

    /// Consecutive sink failures tolerated before the run stops.
    pub max_consecutive_sink_failures: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            word_count: 24,
            max_generation_attempts: 10,
            derivation_path: "m/44'/60'/0'/0/0".to_string(),
            cycle_delay_ms: 1000,
            max_cycles: None,
            halt_on_match: true,
            on_derivation_error: DerivationFailurePolicy::Continue,
            max_consecutive_sink_failures: 3,
        }
    }
}

/// Delay strategy between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    /// Same pause before every retry.
    Fixed,
    /// Doubling pause with jitter, capped at `max_delay_ms`.
    Exponential,
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per balance query, including the first.
    pub max_attempts: u32,

    /// Pause between attempts in milliseconds (base delay for exponential).
    pub delay_ms: u64,

    /// Upper bound for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Delay strategy.
    pub strategy: BackoffStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
            max_delay_ms: 8000,
            strategy: BackoffStrategy::Fixed,
        }
    }
}

/// Timeout configuration for outbound calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Per-attempt request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 10,
        }
    }
}

/// Rate limiting configuration, applied per provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Sustained requests per second per provider.
    pub requests_per_second: u32,

    /// Burst capacity.
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            requests_per_second: 5,
            burst_size: 5,
        }
    }
}

/// Result sink configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Append-only file receiving one line per miss.
    pub path: String,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            path: "scan_results.txt".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit JSON log lines instead of the human format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// How a chain's balance endpoint is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStyle {
    /// Etherscan-family `GET ?module=account&action=balance`.
    Explorer,
    /// JSON-RPC `eth_getBalance` over POST.
    Rpc,
}

/// A single chain to query.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChainConfig {
    /// Chain identifier used in logs and metrics.
    pub name: String,

    /// Display unit written next to the balance (e.g. "ETH").
    pub symbol: String,

    /// Balance endpoint URL.
    pub endpoint: String,

    /// Request style for the endpoint.
    pub style: RequestStyle,

    /// Environment variable holding the API key. `None` for keyless endpoints.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Fractional exponent between the smallest unit and the display unit.
    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Rate-limit group. Defaults to the endpoint host.
    #[serde(default)]
    pub provider: Option<String>,
}

fn default_decimals() -> u8 {
    18
}

impl ChainConfig {
    fn explorer(name: &str, symbol: &str, endpoint: &str, key_env: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            endpoint: endpoint.to_string(),
            style: RequestStyle::Explorer,
            api_key_env: Some(key_env.to_string()),
            decimals: default_decimals(),
            provider: None,
        }
    }

    /// Rate-limit group for this chain: the explicit provider, else the endpoint host.
    pub fn provider_key(&self) -> String {
        if let Some(provider) = &self.provider {
            return provider.clone();
        }
        url::Url::parse(&self.endpoint)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| self.endpoint.clone())
    }
}

/// Ethereum, BNB Smart Chain, Polygon, Arbitrum and Avalanche C-Chain.
pub fn default_chains() -> Vec<ChainConfig> {
    vec![
        ChainConfig::explorer(
            "ethereum",
            "ETH",
            "https://api.etherscan.io/api",
            "ETHERSCAN_KEY",
        ),
        ChainConfig::explorer("bsc", "BNB", "https://api.bscscan.com/api", "BSCSCAN_KEY"),
        ChainConfig::explorer(
            "polygon",
            "MATIC",
            "https://api.polygonscan.com/api",
            "POLYGONSCAN_KEY",
        ),
        ChainConfig::explorer("arbitrum", "ETH", "https://api.arbiscan.io/api", "ARBISCAN_KEY"),
        ChainConfig {
            name: "avalanche".to_string(),
            symbol: "AVAX".to_string(),
            endpoint: "https://api.avax.network/ext/bc/C/rpc".to_string(),
            style: RequestStyle::Rpc,
            api_key_env: None,
            decimals: default_decimals(),
            provider: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScannerConfig::default();
        assert_eq!(config.scan.word_count, 24);
        assert_eq!(config.retries.max_attempts, 3);
        assert_eq!(config.retries.delay_ms, 1000);
        assert_eq!(config.scan.cycle_delay_ms, 1000);
        assert_eq!(config.chains.len(), 5);
        assert!(config.chains.iter().all(|c| c.decimals == 18));
    }

    #[test]
    fn test_default_chain_credentials() {
        let chains = default_chains();
        let keyed: Vec<_> = chains.iter().filter_map(|c| c.api_key_env.as_deref()).collect();
        assert_eq!(keyed, vec!["ETHERSCAN_KEY", "BSCSCAN_KEY", "POLYGONSCAN_KEY", "ARBISCAN_KEY"]);
        assert_eq!(chains[4].style, RequestStyle::Rpc);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ScannerConfig = toml::from_str(
            r#"
            [scan]
            cycle_delay_ms = 250
            on_derivation_error = "halt"

            [retries]
            strategy = "exponential"
            "#,
        )
        .unwrap();
        assert_eq!(config.scan.cycle_delay_ms, 250);
        assert_eq!(config.scan.word_count, 24);
        assert_eq!(config.scan.on_derivation_error, DerivationFailurePolicy::Halt);
        assert_eq!(config.retries.strategy, BackoffStrategy::Exponential);
        assert_eq!(config.chains.len(), 5);
    }

    #[test]
    fn test_custom_chain_list() {
        let config: ScannerConfig = toml::from_str(
            r#"
            [[chains]]
            name = "optimism"
            symbol = "ETH"
            endpoint = "https://api-optimistic.etherscan.io/api"
            style = "explorer"
            api_key_env = "OPTIMISM_ETHERSCAN_KEY"
            "#,
        )
        .unwrap();
        assert_eq!(config.chains.len(), 1);
        assert_eq!(config.chains[0].decimals, 18);
        assert_eq!(config.chains[0].provider_key(), "api-optimistic.etherscan.io");
    }

    #[test]
    fn test_explicit_provider_key() {
        let mut chain = default_chains().remove(0);
        chain.provider = Some("etherscan".to_string());
        assert_eq!(chain.provider_key(), "etherscan");
    }
}
