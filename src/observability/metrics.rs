//! Metrics collection and exposition.
//!
//! # Metrics
//! - `scanner_cycles_total` (counter): completed cycles by outcome (miss, match, derivation_error)
//! - `scanner_chain_queries_total` (counter): balance queries by chain and outcome (ok, exhausted)
//! - `scanner_retries_total` (counter): retried attempts by chain
//! - `scanner_records_lost_total` (counter): miss records the sink failed to persist
//! - `scanner_cycle_duration_seconds` (histogram): wall time of a full cycle
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
    {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_cycle(outcome: &'static str, started: Instant) {
    ::metrics::counter!("scanner_cycles_total", "outcome" => outcome).increment(1);
    ::metrics::histogram!("scanner_cycle_duration_seconds").record(started.elapsed().as_secs_f64());
}

pub fn record_chain_query(chain: &str, outcome: &'static str) {
    ::metrics::counter!(
        "scanner_chain_queries_total",
        "chain" => chain.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_retry(chain: &str) {
    ::metrics::counter!("scanner_retries_total", "chain" => chain.to_string()).increment(1);
}

pub fn record_lost_record() {
    ::metrics::counter!("scanner_records_lost_total").increment(1);
}
