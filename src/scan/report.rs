//! Match reporting.

use std::io::{self, Write};

use crate::scan::ScanRecord;

/// Receives funded wallets. The report is the only place a private key is shown.
pub trait MatchReporter {
    /// Surface the match. An error means the operator never saw it.
    fn report(&self, record: &ScanRecord) -> io::Result<()>;
}

/// Prints the full match (phrase, private key, every balance) to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Write the report block to `out`.
    pub fn write_report(record: &ScanRecord, out: &mut impl Write) -> io::Result<()> {
        let wallet = record.wallet();
        writeln!(out, "==================== FUNDED WALLET ====================")?;
        writeln!(out, "Address:     {}", wallet.address())?;
        writeln!(out, "Private key: {}", wallet.private_key_hex())?;
        writeln!(out, "Mnemonic:    {}", record.mnemonic())?;
        for balance in record.balances() {
            writeln!(out, "  {:<12} {} ({})", balance.chain, balance, balance.outcome)?;
        }
        writeln!(out, "=======================================================")?;
        out.flush()
    }
}

impl MatchReporter for ConsoleReporter {
    fn report(&self, record: &ScanRecord) -> io::Result<()> {
        Self::write_report(record, &mut io::stdout().lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::{ChainBalanceResult, NativeAmount};
    use crate::wallet::{Mnemonic, WalletDeriver};
    use alloy::primitives::U256;

    #[test]
    fn test_report_contains_key_and_balances() {
        let mnemonic =
            Mnemonic::parse("test test test test test test test test test test test junk").unwrap();
        let wallet = WalletDeriver::default().derive(&mnemonic).unwrap();
        let one_unit = U256::from(10u64).pow(U256::from(18u64));
        let record = ScanRecord::new(
            wallet,
            mnemonic,
            vec![
                ChainBalanceResult::ok("ethereum", "ETH", NativeAmount::new(one_unit, 18), 1),
                ChainBalanceResult::exhausted("bsc", "BNB", 18, 3),
            ],
        );

        let mut out = Vec::new();
        ConsoleReporter::write_report(&record, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
        assert!(text.contains(key));
        assert!(text.contains("1.0 ETH (ok)"));
        assert!(text.contains("n/a BNB (exhausted)"));
        assert!(text.contains("junk"));
    }
}
