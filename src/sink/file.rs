//! Append-only file sink.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::scan::ScanRecord;
use crate::sink::line::format_record;
use crate::sink::{ResultSink, SinkError};

/// Appends one line per miss to a text file.
///
/// The file is opened in append mode for every record and each record is
/// written with a single `write_all`, so concurrent writers never interleave
/// partial lines and nothing is read back or rewritten.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for FileSink {
    fn append(&self, record: &ScanRecord) -> Result<(), SinkError> {
        let mut line = format_record(record);
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| SinkError::Io {
                path: self.path.clone(),
                source,
            })?;
        file.write_all(line.as_bytes())
            .map_err(|source| SinkError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::ChainBalanceResult;
    use crate::sink::line::parse_line;
    use crate::wallet::{MnemonicGenerator, WalletDeriver};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn miss(generator: &mut MnemonicGenerator) -> ScanRecord {
        let mnemonic = generator.generate().unwrap();
        let wallet = WalletDeriver::default().derive(&mnemonic).unwrap();
        ScanRecord::new(
            wallet,
            mnemonic,
            vec![ChainBalanceResult::exhausted("ethereum", "ETH", 18, 3)],
        )
    }

    #[test]
    fn test_n_appends_give_n_lines() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("results.txt"));
        let mut generator = MnemonicGenerator::with_rng(StdRng::seed_from_u64(3), 24, 10);

        let records: Vec<_> = (0..4).map(|_| miss(&mut generator)).collect();
        for record in &records {
            sink.append(record).unwrap();
        }

        let content = std::fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        for (line, record) in lines.iter().zip(&records) {
            let parsed = parse_line(line).unwrap();
            assert_eq!(parsed.address, record.wallet().address());
            assert_eq!(parsed.phrase, record.mnemonic().phrase());
        }
    }

    #[test]
    fn test_existing_content_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.txt");
        std::fs::write(&path, "previous line\n").unwrap();

        let sink = FileSink::new(&path);
        let mut generator = MnemonicGenerator::with_rng(StdRng::seed_from_u64(4), 12, 10);
        sink.append(&miss(&mut generator)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("previous line\n"));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_unwritable_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("missing-dir").join("results.txt"));
        let mut generator = MnemonicGenerator::with_rng(StdRng::seed_from_u64(5), 24, 10);
        let err = sink.append(&miss(&mut generator)).unwrap_err();
        assert!(err.to_string().contains("missing-dir"));
    }
}
