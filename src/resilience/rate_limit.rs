//! Per-provider request pacing.
//!
//! Chains served by the same provider (e.g. several Etherscan-family hosts
//! sharing one account) draw from one token bucket. A request waits for a
//! token instead of failing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::config::RateLimitConfig;

/// A simple token bucket rate limiter.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    /// Take a token, or report how long until one is available.
    fn try_acquire(&mut self, capacity: f64, refill_rate: f64) -> Result<(), Duration> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        // Refill tokens
        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64((1.0 - self.tokens) / refill_rate))
        }
    }
}

/// One provider's shared bucket.
#[derive(Debug, Clone)]
pub struct ProviderBucket {
    provider: String,
    bucket: Arc<Mutex<TokenBucket>>,
    rps: f64,
    burst: f64,
}

impl ProviderBucket {
    /// Wait until a request to this provider may be sent.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                match bucket.try_acquire(self.burst, self.rps) {
                    Ok(()) => return,
                    Err(wait) => wait,
                }
            };
            tracing::debug!(
                provider = %self.provider,
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                "Rate limited, waiting"
            );
            tokio::time::sleep(wait).await;
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }
}

/// Hands out one shared bucket per provider key.
#[derive(Debug)]
pub struct ProviderRateLimiter {
    buckets: HashMap<String, ProviderBucket>,
    config: RateLimitConfig,
}

impl ProviderRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: HashMap::new(),
            config,
        }
    }

    /// Bucket for `provider`, created on first use. `None` when disabled.
    pub fn bucket_for(&mut self, provider: &str) -> Option<ProviderBucket> {
        if !self.config.enabled {
            return None;
        }
        let rps = f64::from(self.config.requests_per_second.max(1));
        let burst = f64::from(self.config.burst_size.max(1));
        let bucket = self
            .buckets
            .entry(provider.to_string())
            .or_insert_with(|| ProviderBucket {
                provider: provider.to_string(),
                bucket: Arc::new(Mutex::new(TokenBucket::new(burst))),
                rps,
                burst,
            });
        Some(bucket.clone())
    }

    /// Number of distinct providers handed out so far.
    pub fn provider_count(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(rps: u32, burst: u32) -> RateLimitConfig {
        RateLimitConfig {
            enabled: true,
            requests_per_second: rps,
            burst_size: burst,
        }
    }

    #[test]
    fn test_bucket_drains_then_reports_wait() {
        let mut bucket = TokenBucket::new(2.0);
        assert!(bucket.try_acquire(2.0, 1.0).is_ok());
        assert!(bucket.try_acquire(2.0, 1.0).is_ok());
        let wait = bucket.try_acquire(2.0, 1.0).unwrap_err();
        assert!(wait <= Duration::from_secs(1));
    }

    #[test]
    fn test_disabled_limiter_hands_out_nothing() {
        let mut limiter = ProviderRateLimiter::new(RateLimitConfig::default());
        assert!(limiter.bucket_for("api.etherscan.io").is_none());
        assert_eq!(limiter.provider_count(), 0);
    }

    #[test]
    fn test_same_provider_shares_bucket() {
        let mut limiter = ProviderRateLimiter::new(enabled(5, 5));
        let a = limiter.bucket_for("etherscan").unwrap();
        let b = limiter.bucket_for("etherscan").unwrap();
        let c = limiter.bucket_for("avax").unwrap();
        assert!(Arc::ptr_eq(&a.bucket, &b.bucket));
        assert!(!Arc::ptr_eq(&a.bucket, &c.bucket));
        assert_eq!(limiter.provider_count(), 2);
    }

    #[tokio::test]
    async fn test_acquire_waits_for_refill() {
        let mut limiter = ProviderRateLimiter::new(enabled(20, 1));
        let bucket = limiter.bucket_for("p").unwrap();
        let start = Instant::now();
        bucket.acquire().await;
        bucket.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
