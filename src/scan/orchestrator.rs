//! Scan loop driver.
//!
//! # Cycle
//! ```text
//! Generating → Deriving → Querying → Aggregating → Done
//!                  │                      │
//!                  └─ DerivationError     ├─ match → MatchReporter (failure is fatal)
//!                                         └─ miss  → ResultSink (key dropped)
//! ```
//!
//! Cycles never overlap. Within a cycle every chain is queried concurrently and
//! aggregation waits for all of them to reach Ok or Exhausted.

use futures_util::future::join_all;
use std::time::{Duration, Instant};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::chains::ChainBalanceClient;
use crate::config::{DerivationFailurePolicy, ScanConfig};
use crate::observability::metrics;
use crate::scan::record::ScanRecord;
use crate::scan::report::MatchReporter;
use crate::scan::types::{CycleOutcome, CyclePhase, RunStats, RunSummary, ScanError, StopReason};
use crate::sink::ResultSink;
use crate::wallet::{MnemonicGenerator, WalletDeriver};

/// Drives scan cycles until a match, a cycle limit, or shutdown.
pub struct ScanOrchestrator<S, R> {
    generator: MnemonicGenerator,
    deriver: WalletDeriver,
    clients: Vec<ChainBalanceClient>,
    sink: S,
    reporter: R,
    settings: ScanConfig,
    stats: RunStats,
}

impl<S: ResultSink, R: MatchReporter> ScanOrchestrator<S, R> {
    pub fn new(
        generator: MnemonicGenerator,
        deriver: WalletDeriver,
        clients: Vec<ChainBalanceClient>,
        sink: S,
        reporter: R,
        settings: ScanConfig,
    ) -> Self {
        Self {
            generator,
            deriver,
            clients,
            sink,
            reporter,
            settings,
            stats: RunStats::default(),
        }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Run one full cycle and update the run counters.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, ScanError> {
        let started = Instant::now();
        let result = self.cycle().await;
        self.stats.cycles += 1;

        match &result {
            Ok(CycleOutcome::Match(_)) => {
                self.stats.matches += 1;
                metrics::record_cycle("match", started);
            }
            Ok(CycleOutcome::Miss(_)) => {
                self.stats.misses += 1;
                self.stats.consecutive_sink_failures = 0;
                metrics::record_cycle("miss", started);
            }
            Err(ScanError::Derivation(_)) => {
                self.stats.derivation_failures += 1;
                metrics::record_cycle("derivation_error", started);
            }
            Err(ScanError::Persistence { .. }) => {
                self.stats.records_lost += 1;
                self.stats.consecutive_sink_failures += 1;
                metrics::record_lost_record();
                metrics::record_cycle("record_lost", started);
            }
            Err(ScanError::Generation(_)) => {
                metrics::record_cycle("generation_error", started);
            }
            Err(ScanError::Report { .. }) => {
                metrics::record_cycle("report_error", started);
            }
        }

        result
    }

    async fn cycle(&mut self) -> Result<CycleOutcome, ScanError> {
        let cycle = self.stats.cycles + 1;

        trace_phase(cycle, CyclePhase::Generating);
        let mnemonic = self.generator.generate()?;

        trace_phase(cycle, CyclePhase::Deriving);
        let wallet = self.deriver.derive(&mnemonic)?;
        let address = wallet.address();

        trace_phase(cycle, CyclePhase::Querying);
        let queries = self.clients.iter().map(|client| client.fetch_balance(address));
        let balances = join_all(queries).await;

        trace_phase(cycle, CyclePhase::Aggregating);
        let record = ScanRecord::new(wallet, mnemonic, balances);

        let outcome = if record.is_match() {
            tracing::info!(cycle = cycle, address = %address, "Funded wallet found");
            if let Err(source) = self.reporter.report(&record) {
                return Err(ScanError::Report {
                    record: Box::new(record),
                    source,
                });
            }
            CycleOutcome::Match(record)
        } else {
            if let Err(source) = self.sink.append(&record) {
                return Err(ScanError::Persistence { address, source });
            }
            let exhausted: Vec<&str> = record.exhausted_chains().collect();
            tracing::debug!(
                cycle = cycle,
                address = %address,
                exhausted = ?exhausted,
                "Miss recorded"
            );
            CycleOutcome::Miss(record.into_miss())
        };

        trace_phase(cycle, CyclePhase::Done);
        Ok(outcome)
    }

    /// Loop until a stop condition.
    ///
    /// Shutdown is honoured between cycles and during the inter-cycle delay; a
    /// cycle already in flight always completes. A closed shutdown channel is
    /// treated as a shutdown request.
    pub async fn run(
        &mut self,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<RunSummary, ScanError> {
        let delay = Duration::from_millis(self.settings.cycle_delay_ms);
        tracing::info!(
            chains = self.clients.len(),
            max_cycles = ?self.settings.max_cycles,
            cycle_delay_ms = self.settings.cycle_delay_ms,
            "Scan loop starting"
        );

        let reason = loop {
            if self.limit_reached() {
                break StopReason::MaxCycles;
            }
            match shutdown.try_recv() {
                Err(TryRecvError::Empty) => {}
                _ => break StopReason::Shutdown,
            }

            match self.run_cycle().await {
                Ok(CycleOutcome::Match(_)) if self.settings.halt_on_match => {
                    break StopReason::Matched
                }
                Ok(_) => {}
                Err(ScanError::Derivation(e)) => {
                    tracing::error!(error = %e, "Cycle aborted: wallet derivation failed");
                    if self.settings.on_derivation_error == DerivationFailurePolicy::Halt {
                        return Err(ScanError::Derivation(e));
                    }
                }
                Err(ScanError::Persistence { address, source }) => {
                    tracing::error!(
                        address = %address,
                        error = %source,
                        consecutive = self.stats.consecutive_sink_failures,
                        "Scan record lost: sink append failed"
                    );
                    let limit = self.settings.max_consecutive_sink_failures;
                    if self.stats.consecutive_sink_failures >= limit {
                        return Err(ScanError::Persistence { address, source });
                    }
                }
                Err(e @ ScanError::Report { .. }) => {
                    tracing::error!(error = %e, "Funded wallet could not be reported");
                    return Err(e);
                }
                Err(e @ ScanError::Generation(_)) => return Err(e),
            }

            if self.limit_reached() {
                break StopReason::MaxCycles;
            }
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.recv() => break StopReason::Shutdown,
            }
        };

        tracing::info!(
            reason = ?reason,
            cycles = self.stats.cycles,
            misses = self.stats.misses,
            matches = self.stats.matches,
            derivation_failures = self.stats.derivation_failures,
            records_lost = self.stats.records_lost,
            "Scan loop stopped"
        );
        Ok(RunSummary {
            stats: self.stats.clone(),
            reason,
        })
    }

    fn limit_reached(&self) -> bool {
        self.settings
            .max_cycles
            .is_some_and(|max| self.stats.cycles >= max)
    }
}

fn trace_phase(cycle: u64, phase: CyclePhase) {
    tracing::trace!(cycle = cycle, phase = ?phase, "Cycle phase");
}

impl<S, R> std::fmt::Debug for ScanOrchestrator<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanOrchestrator")
            .field("generator", &self.generator)
            .field("derivation_path", &self.deriver.derivation_path())
            .field("clients", &self.clients)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
