//! Seed Phrase Balance Scanner
//!
//! Generates random BIP-39 mnemonics, derives the first Ethereum-style account,
//! and checks its native balance on several EVM chains.
//!
//! # Architecture Overview
//!
//! ```text
//!     ┌──────────────────────────────────────────────────────────────────┐
//!     │                        SCAN ORCHESTRATOR                          │
//!     │                                                                   │
//!     │  ┌──────────┐   ┌──────────┐   ┌───────────────────────────────┐ │
//!     │  │  wallet  │──▶│  wallet  │──▶│ chains (one client per chain, │ │──▶ Explorer APIs
//!     │  │ generate │   │  derive  │   │ concurrent, retry + timeout)  │ │──▶ JSON-RPC nodes
//!     │  └──────────┘   └──────────┘   └──────────────┬────────────────┘ │
//!     │                                                │                  │
//!     │                                                ▼                  │
//!     │                                   ┌────────────────────────┐      │
//!     │                      match ◀──────│ scan record + decision │      │
//!     │                 (console report)  └───────────┬────────────┘      │
//!     │                                               │ miss               │
//!     │                                               ▼                    │
//!     │                                      sink (append-only file)      │
//!     │                                                                   │
//!     │  Cross-cutting: config · resilience · observability · lifecycle  │
//!     └──────────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use seed_scanner::config::{load_or_default, Credentials};
use seed_scanner::lifecycle::{build_orchestrator, spawn_signal_handler, Shutdown};
use seed_scanner::observability::{logging, metrics};
use seed_scanner::scan::{ConsoleReporter, ScanError};

#[derive(Parser)]
#[command(name = "seed-scanner")]
#[command(about = "Scan random mnemonics for funded EVM wallets", long_about = None)]
struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many cycles
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Override the miss record file
    #[arg(long)]
    sink: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(max_cycles) = cli.max_cycles {
        config.scan.max_cycles = Some(max_cycles);
    }
    if let Some(sink) = cli.sink {
        config.sink.path = sink;
    }

    logging::init_logging(&config.observability);
    tracing::info!("seed-scanner v{} starting", env!("CARGO_PKG_VERSION"));

    let credentials = match Credentials::from_env(&config.chains) {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::error!(error = %e, "Credential check failed");
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let mut orchestrator = match build_orchestrator(&config, &credentials, ConsoleReporter) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    let signals = spawn_signal_handler(shutdown.clone());

    let result = orchestrator.run(shutdown.subscribe()).await;
    signals.abort();

    match result {
        Ok(summary) => {
            println!(
                "Stopped ({:?}): {} cycles, {} misses, {} matches, \
                 {} derivation failures, {} records lost",
                summary.reason,
                summary.stats.cycles,
                summary.stats.misses,
                summary.stats.matches,
                summary.stats.derivation_failures,
                summary.stats.records_lost,
            );
            ExitCode::SUCCESS
        }
        Err(ScanError::Report { record, source }) => {
            eprintln!("Match report to stdout failed ({source}), writing it to stderr");
            if let Err(e) = ConsoleReporter::write_report(&record, &mut io::stderr().lock()) {
                tracing::error!(
                    address = %record.wallet().address(),
                    error = %e,
                    "Funded wallet could not be surfaced on stderr either"
                );
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "Scan run failed");
            eprintln!("Scan run failed: {e}");
            ExitCode::FAILURE
        }
    }
}
