//! Balance client for one configured chain.
//!
//! # Responsibilities
//! - Build the explorer GET or JSON-RPC POST for a wallet address
//! - Enforce a per-attempt timeout and the retry policy
//! - Normalize the raw integer into the chain's display unit
//! - Degrade to an Exhausted result instead of failing the cycle

use alloy::primitives::{Address, U256};
use reqwest::RequestBuilder;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;

use crate::chains::types::{ChainBalanceResult, ChainError};
use crate::chains::units::{parse_decimal_wei, parse_hex_wei, NativeAmount};
use crate::config::{ChainConfig, RequestStyle};
use crate::observability::metrics;
use crate::resilience::{ProviderBucket, RetryPolicy};

/// Body shape shared by explorer and JSON-RPC responses.
#[derive(Debug, Deserialize)]
struct BalanceResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    /// Explorer success flag, "1" or "0".
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    /// JSON-RPC error object.
    #[serde(default)]
    error: Option<serde_json::Value>,
}

impl BalanceResponse {
    /// The raw balance string, or why the body carries none.
    fn into_balance(self, style: RequestStyle) -> Result<String, ChainError> {
        if let Some(error) = self.error {
            let reason = error
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(ChainError::Rejected(reason));
        }
        if style == RequestStyle::Explorer && self.status.as_deref() == Some("0") {
            let reason = self
                .result
                .as_ref()
                .and_then(|r| r.as_str())
                .or(self.message.as_deref())
                .unwrap_or("status 0")
                .to_string();
            return Err(ChainError::Rejected(reason));
        }

        let result = self.result.ok_or(ChainError::MissingResult)?;
        match result {
            serde_json::Value::String(value) => Ok(value),
            _ => Err(ChainError::MissingResult),
        }
    }
}

/// One outbound balance request, built fresh per attempt.
#[derive(Debug)]
pub struct ChainQuery<'a> {
    pub chain: &'a ChainConfig,
    pub address: String,
    pub api_key: Option<&'a str>,
}

impl ChainQuery<'_> {
    fn into_request(self, http: &reqwest::Client) -> RequestBuilder {
        match self.chain.style {
            RequestStyle::Explorer => {
                let mut params = vec![
                    ("module", "account"),
                    ("action", "balance"),
                    ("address", self.address.as_str()),
                ];
                if let Some(key) = self.api_key {
                    params.push(("apikey", key));
                }
                http.get(&self.chain.endpoint).query(&params)
            }
            RequestStyle::Rpc => http.post(&self.chain.endpoint).json(&serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "eth_getBalance",
                "params": [self.address, "latest"],
            })),
        }
    }
}

/// Queries a single chain's balance endpoint.
#[derive(Clone)]
pub struct ChainBalanceClient {
    chain: ChainConfig,
    api_key: Option<String>,
    http: reqwest::Client,
    retry: RetryPolicy,
    request_timeout: Duration,
    rate_limit: Option<ProviderBucket>,
}

impl ChainBalanceClient {
    /// Create a client for `chain`.
    ///
    /// # Arguments
    /// * `chain` - Endpoint descriptor
    /// * `api_key` - Credential for explorer-style chains that need one
    /// * `http` - Shared HTTP client
    /// * `retry` - Attempt cap and delay strategy
    /// * `request_timeout` - Deadline for each attempt
    pub fn new(
        chain: ChainConfig,
        api_key: Option<String>,
        http: reqwest::Client,
        retry: RetryPolicy,
        request_timeout: Duration,
    ) -> Self {
        Self {
            chain,
            api_key,
            http,
            retry,
            request_timeout,
            rate_limit: None,
        }
    }

    /// Share a provider token bucket with other clients.
    pub fn with_rate_limit(mut self, bucket: Option<ProviderBucket>) -> Self {
        self.rate_limit = bucket;
        self
    }

    pub fn name(&self) -> &str {
        &self.chain.name
    }

    pub fn symbol(&self) -> &str {
        &self.chain.symbol
    }

    /// Fetch the balance of `address`, retrying per policy.
    ///
    /// Never fails: exhausting every attempt yields an Exhausted result so one
    /// unreachable chain cannot abort the cycle.
    pub async fn fetch_balance(&self, address: Address) -> ChainBalanceResult {
        let mut attempts = 0;
        let outcome = self
            .retry
            .run(&self.chain.name, |attempt| {
                attempts = attempt;
                self.query_once(address, attempt)
            })
            .await;

        match outcome {
            Ok(raw) => {
                metrics::record_chain_query(&self.chain.name, "ok");
                let amount = NativeAmount::new(raw, self.chain.decimals);
                tracing::debug!(
                    chain = %self.chain.name,
                    attempts = attempts,
                    balance = %amount,
                    "Balance fetched"
                );
                ChainBalanceResult::ok(&self.chain.name, &self.chain.symbol, amount, attempts)
            }
            Err(exhausted) => {
                metrics::record_chain_query(&self.chain.name, "exhausted");
                tracing::warn!(
                    chain = %self.chain.name,
                    attempts = exhausted.attempts,
                    error = %exhausted.last_error,
                    "Balance query exhausted, recording as unknown"
                );
                ChainBalanceResult::exhausted(
                    &self.chain.name,
                    &self.chain.symbol,
                    self.chain.decimals,
                    exhausted.attempts,
                )
            }
        }
    }

    async fn query_once(&self, address: Address, attempt: u32) -> Result<U256, ChainError> {
        if attempt > 1 {
            metrics::record_retry(&self.chain.name);
        }
        if let Some(bucket) = &self.rate_limit {
            bucket.acquire().await;
        }

        match timeout(self.request_timeout, self.send(address)).await {
            Ok(result) => result,
            Err(_) => Err(ChainError::Timeout(self.request_timeout)),
        }
    }

    async fn send(&self, address: Address) -> Result<U256, ChainError> {
        let query = ChainQuery {
            chain: &self.chain,
            address: address.to_string(),
            api_key: self.api_key.as_deref(),
        };

        let response = query.into_request(&self.http).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ChainError::Status(status.as_u16()));
        }

        let body: BalanceResponse = response.json().await?;
        let value = body.into_balance(self.chain.style)?;

        match self.chain.style {
            RequestStyle::Explorer => parse_decimal_wei(&value),
            RequestStyle::Rpc => parse_hex_wei(&value),
        }
    }
}

impl std::fmt::Debug for ChainBalanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainBalanceClient")
            .field("chain", &self.chain.name)
            .field("endpoint", &self.chain.endpoint)
            .field("style", &self.chain.style)
            .field("has_api_key", &self.api_key.is_some())
            .field("max_attempts", &self.retry.max_attempts)
            .finish()
    }
}
