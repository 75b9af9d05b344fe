//! Shared utilities for integration testing.
//!
//! Mock chains are axum servers on ephemeral ports. One server answers both
//! styles: GET as an explorer (`?module=account&action=balance`), POST as a
//! JSON-RPC node (`eth_getBalance`).

#![allow(dead_code)]

use alloy::primitives::U256;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::routing::any;
use axum::Router;
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use seed_scanner::config::{ChainConfig, RequestStyle, ScannerConfig};
use seed_scanner::scan::{MatchReporter, ScanRecord};

/// A request as seen by a mock chain.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: Method,
    pub query: HashMap<String, String>,
    pub body: String,
}

type Responder = dyn Fn(u32, &MockRequest) -> (u16, String) + Send + Sync;

struct MockState {
    hits: AtomicU32,
    requests: Mutex<Vec<MockRequest>>,
    responder: Box<Responder>,
}

/// Handle to a running mock chain.
#[derive(Clone)]
pub struct MockChain {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockChain {
    pub fn endpoint(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Requests received so far.
    pub fn hits(&self) -> u32 {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<MockRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> (StatusCode, String) {
    let request = MockRequest { method, query, body };
    let hit = state.hits.fetch_add(1, Ordering::SeqCst) + 1;
    let (status, body) = (state.responder)(hit, &request);
    state.requests.lock().unwrap().push(request);
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        body,
    )
}

/// Start a mock chain whose reply is computed from the 1-based hit number
/// and the request.
pub async fn start_programmable_chain<F>(responder: F) -> MockChain
where
    F: Fn(u32, &MockRequest) -> (u16, String) + Send + Sync + 'static,
{
    let state = Arc::new(MockState {
        hits: AtomicU32::new(0),
        requests: Mutex::new(Vec::new()),
        responder: Box::new(responder),
    });
    let app = Router::new()
        .route("/api", any(handle))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockChain { addr, state }
}

/// Balance reply in the style matching the request method.
pub fn balance_reply(request: &MockRequest, wei: U256) -> (u16, String) {
    if request.method == Method::POST {
        (200, format!(r#"{{"jsonrpc":"2.0","id":1,"result":"0x{wei:x}"}}"#))
    } else {
        (200, format!(r#"{{"status":"1","message":"OK","result":"{wei}"}}"#))
    }
}

/// A chain that always reports `wei`.
pub async fn start_balance_chain(wei: U256) -> MockChain {
    start_programmable_chain(move |_, request| balance_reply(request, wei)).await
}

/// A chain that always answers 500.
pub async fn start_failing_chain() -> MockChain {
    start_programmable_chain(|_, _| (500, "upstream unavailable".to_string())).await
}

/// 0.5 of an 18-decimal unit.
pub fn half_unit() -> U256 {
    U256::from(500_000_000_000_000_000u64)
}

pub fn chain_config(
    name: &str,
    symbol: &str,
    style: RequestStyle,
    mock: &MockChain,
) -> ChainConfig {
    ChainConfig {
        name: name.to_string(),
        symbol: symbol.to_string(),
        endpoint: mock.endpoint(),
        style,
        api_key_env: None,
        decimals: 18,
        provider: None,
    }
}

/// Config with short delays, writing misses to `sink`.
pub fn test_config(chains: Vec<ChainConfig>, sink: &Path) -> ScannerConfig {
    let mut config = ScannerConfig::default();
    config.chains = chains;
    config.sink.path = sink.display().to_string();
    config.scan.word_count = 12;
    config.scan.cycle_delay_ms = 5;
    config.retries.delay_ms = 10;
    config.timeouts.request_secs = 5;
    config
}

/// Reporter that keeps every match for inspection.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    matches: Arc<Mutex<Vec<ScanRecord>>>,
}

impl RecordingReporter {
    pub fn matches(&self) -> Vec<ScanRecord> {
        self.matches.lock().unwrap().clone()
    }
}

impl MatchReporter for RecordingReporter {
    fn report(&self, record: &ScanRecord) -> io::Result<()> {
        self.matches.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Reporter whose output channel is gone, like stdout on a closed pipe.
#[derive(Clone, Copy, Default)]
pub struct BrokenReporter;

impl MatchReporter for BrokenReporter {
    fn report(&self, _record: &ScanRecord) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
    }
}

/// Non-empty lines of a sink file; empty when the file does not exist.
pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}
