use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use seed_scanner::sink::{parse_line, RecordLine};
use seed_scanner::wallet::{Mnemonic, WalletDeriver, DEFAULT_DERIVATION_PATH};

#[derive(Parser)]
#[command(name = "scan-ledger")]
#[command(about = "Inspect the miss records written by seed-scanner", long_about = None)]
struct Cli {
    /// Record file to read
    #[arg(short, long, default_value = "scan_results.txt")]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count records and exhausted chain queries
    Summary,
    /// Check every line parses and its address matches its phrase
    Verify {
        /// Derivation path the scanner was run with
        #[arg(long, default_value = DEFAULT_DERIVATION_PATH)]
        derivation_path: String,
    },
}

#[derive(Default)]
struct Summary {
    records: usize,
    malformed: usize,
    funded: usize,
    exhausted_by_symbol: BTreeMap<String, usize>,
}

impl Summary {
    fn add(&mut self, record: &RecordLine) {
        self.records += 1;
        if record.balances.iter().any(|b| b.is_funded()) {
            self.funded += 1;
        }
        for balance in record.balances.iter().filter(|b| b.is_exhausted()) {
            *self.exhausted_by_symbol.entry(balance.symbol.clone()).or_default() += 1;
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let reader = BufReader::new(File::open(&cli.file)?);

    match cli.command {
        Commands::Summary => {
            let mut summary = Summary::default();
            for line in reader.lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                match parse_line(&line) {
                    Ok(record) => summary.add(&record),
                    Err(_) => summary.malformed += 1,
                }
            }

            println!("File:      {}", cli.file.display());
            println!("Records:   {}", summary.records);
            println!("Malformed: {}", summary.malformed);
            if summary.funded > 0 {
                println!("Funded:    {} (misses should never carry a balance)", summary.funded);
            }
            for (symbol, count) in &summary.exhausted_by_symbol {
                println!("Exhausted: {count} {symbol} queries");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify { derivation_path } => {
            let deriver = WalletDeriver::new(derivation_path);
            let mut failures = 0usize;
            let mut checked = 0usize;

            for (index, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                checked += 1;
                let line_no = index + 1;

                let record = match parse_line(&line) {
                    Ok(record) => record,
                    Err(e) => {
                        eprintln!("line {line_no}: {e}");
                        failures += 1;
                        continue;
                    }
                };
                let derived = Mnemonic::parse(&record.phrase)
                    .map_err(|e| e.to_string())
                    .and_then(|m| deriver.derive(&m).map_err(|e| e.to_string()));
                match derived {
                    Ok(wallet) if wallet.address() == record.address => {}
                    Ok(wallet) => {
                        eprintln!(
                            "line {line_no}: phrase derives {} but line records {}",
                            wallet.address(),
                            record.address
                        );
                        failures += 1;
                    }
                    Err(e) => {
                        eprintln!("line {line_no}: {e}");
                        failures += 1;
                    }
                }
            }

            println!("Checked {checked} records, {failures} failed");
            Ok(if failures == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}
