//! Startup wiring.
//!
//! Builds every scan subsystem from a validated config and resolved credentials.
//! Any failure here is fatal and happens before the first cycle.

use std::time::Duration;
use thiserror::Error;

use crate::chains::ChainBalanceClient;
use crate::config::{Credentials, ScannerConfig};
use crate::resilience::{ProviderRateLimiter, RetryPolicy};
use crate::scan::{MatchReporter, ScanOrchestrator};
use crate::sink::FileSink;
use crate::wallet::{MnemonicGenerator, WalletDeriver};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Shared HTTP client with the configured connect timeout.
pub fn build_http_client(config: &ScannerConfig) -> Result<reqwest::Client, StartupError> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
        .user_agent(concat!("seed-scanner/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// One balance client per configured chain, in config order.
///
/// Chains sharing a provider share one token bucket when rate limiting is on.
pub fn build_chain_clients(
    config: &ScannerConfig,
    credentials: &Credentials,
    http: &reqwest::Client,
) -> Vec<ChainBalanceClient> {
    let retry = RetryPolicy::from(&config.retries);
    let request_timeout = Duration::from_secs(config.timeouts.request_secs);
    let mut limiter = ProviderRateLimiter::new(config.rate_limit.clone());

    let clients: Vec<ChainBalanceClient> = config
        .chains
        .iter()
        .map(|chain| {
            let bucket = limiter.bucket_for(&chain.provider_key());
            ChainBalanceClient::new(
                chain.clone(),
                credentials.get(&chain.name).map(str::to_string),
                http.clone(),
                retry,
                request_timeout,
            )
            .with_rate_limit(bucket)
        })
        .collect();

    tracing::info!(
        chains = clients.len(),
        providers = limiter.provider_count(),
        rate_limited = config.rate_limit.enabled,
        "Chain clients ready"
    );
    clients
}

/// Assemble the orchestrator writing misses to the configured file.
pub fn build_orchestrator<R: MatchReporter>(
    config: &ScannerConfig,
    credentials: &Credentials,
    reporter: R,
) -> Result<ScanOrchestrator<FileSink, R>, StartupError> {
    let http = build_http_client(config)?;
    let clients = build_chain_clients(config, credentials, &http);

    let generator =
        MnemonicGenerator::new(config.scan.word_count, config.scan.max_generation_attempts);
    let deriver = WalletDeriver::new(config.scan.derivation_path.clone());
    let sink = FileSink::new(&config.sink.path);

    tracing::info!(
        word_count = config.scan.word_count,
        derivation_path = %config.scan.derivation_path,
        sink = %config.sink.path,
        "Scanner assembled"
    );

    Ok(ScanOrchestrator::new(
        generator,
        deriver,
        clients,
        sink,
        reporter,
        config.scan.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateLimitConfig;
    use std::collections::HashMap;

    fn test_credentials(config: &ScannerConfig) -> Credentials {
        let env: HashMap<&str, &str> = [
            ("ETHERSCAN_KEY", "e"),
            ("BSCSCAN_KEY", "b"),
            ("POLYGONSCAN_KEY", "p"),
            ("ARBISCAN_KEY", "a"),
        ]
        .into_iter()
        .collect();
        Credentials::resolve(&config.chains, |var| env.get(var).map(|v| v.to_string())).unwrap()
    }

    #[test]
    fn test_clients_follow_config_order() {
        let config = ScannerConfig::default();
        let http = build_http_client(&config).unwrap();
        let clients = build_chain_clients(&config, &test_credentials(&config), &http);

        let names: Vec<&str> = clients.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["ethereum", "bsc", "polygon", "arbitrum", "avalanche"]);
    }

    #[test]
    fn test_build_orchestrator() {
        let mut config = ScannerConfig::default();
        config.rate_limit = RateLimitConfig {
            enabled: true,
            ..RateLimitConfig::default()
        };
        let credentials = test_credentials(&config);
        let orchestrator =
            build_orchestrator(&config, &credentials, crate::scan::ConsoleReporter).unwrap();
        assert_eq!(orchestrator.stats().cycles, 0);
        assert_eq!(orchestrator.sink().path(), std::path::Path::new(&config.sink.path));
    }
}
