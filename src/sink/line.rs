//! Pipe-delimited record line.
//!
//! ```text
//! <address> || <mnemonic phrase> || <balance> <SYMBOL> || ...
//! ```
//!
//! One balance field per configured chain, in configured order. An exhausted
//! chain is written as `n/a <SYMBOL>`.

use alloy::primitives::Address;
use std::str::FromStr;
use thiserror::Error;

use crate::chains::UNKNOWN_BALANCE;
use crate::config::validation::SUPPORTED_WORD_COUNTS;
use crate::scan::ScanRecord;

/// Separator between fields of a record line.
pub const FIELD_SEPARATOR: &str = " || ";

/// A line that does not follow the record grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected at least 3 fields, found {0}")]
    TooFewFields(usize),

    #[error("invalid address '{0}'")]
    Address(String),

    #[error("phrase has {0} words")]
    Phrase(usize),

    #[error("invalid balance field '{0}'")]
    Balance(String),
}

/// One balance field of a parsed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBalance {
    /// Display-unit amount; `None` when the chain was exhausted.
    pub amount: Option<String>,
    pub symbol: String,
}

impl LineBalance {
    pub fn is_exhausted(&self) -> bool {
        self.amount.is_none()
    }

    /// A confirmed non-zero amount.
    pub fn is_funded(&self) -> bool {
        self.amount
            .as_deref()
            .is_some_and(|a| a.bytes().any(|b| (b'1'..=b'9').contains(&b)))
    }
}

/// A parsed record line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLine {
    pub address: Address,
    pub phrase: String,
    pub balances: Vec<LineBalance>,
}

/// Render a record as a single line (no trailing newline).
pub fn format_record(record: &ScanRecord) -> String {
    let mut fields = Vec::with_capacity(record.balances().len() + 2);
    fields.push(record.wallet().address().to_string());
    fields.push(record.mnemonic().phrase().to_string());
    fields.extend(record.balances().iter().map(ToString::to_string));
    fields.join(FIELD_SEPARATOR)
}

/// Parse a line written by [`format_record`].
pub fn parse_line(line: &str) -> Result<RecordLine, LineError> {
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(FIELD_SEPARATOR).collect();
    if fields.len() < 3 {
        return Err(LineError::TooFewFields(fields.len()));
    }

    let address =
        Address::from_str(fields[0].trim()).map_err(|_| LineError::Address(fields[0].to_string()))?;

    let phrase = fields[1].trim().to_string();
    let words = phrase.split_whitespace().count();
    if !SUPPORTED_WORD_COUNTS.contains(&words) {
        return Err(LineError::Phrase(words));
    }

    let balances = fields[2..]
        .iter()
        .map(|field| parse_balance(field))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RecordLine {
        address,
        phrase,
        balances,
    })
}

fn parse_balance(field: &str) -> Result<LineBalance, LineError> {
    let invalid = || LineError::Balance(field.to_string());
    let (amount, symbol) = field.trim().rsplit_once(' ').ok_or_else(invalid)?;
    if symbol.is_empty() {
        return Err(invalid());
    }

    let amount = if amount == UNKNOWN_BALANCE {
        None
    } else {
        let (whole, frac) = amount.split_once('.').ok_or_else(invalid)?;
        let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !digits(whole) || !digits(frac) {
            return Err(invalid());
        }
        Some(amount.to_string())
    };

    Ok(LineBalance {
        amount,
        symbol: symbol.to_string(),
    })
}
