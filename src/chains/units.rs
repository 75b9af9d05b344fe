//! Raw balance parsing and display-unit conversion.

use alloy::primitives::utils::format_units;
use alloy::primitives::U256;
use std::fmt;

use crate::chains::types::ChainError;

/// An exact balance: smallest-unit integer plus the chain's fractional exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeAmount {
    raw: U256,
    decimals: u8,
}

impl NativeAmount {
    pub fn new(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    pub fn zero(decimals: u8) -> Self {
        Self::new(U256::ZERO, decimals)
    }

    /// Balance in the smallest unit (wei).
    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }
}

/// Renders like ethers' `formatEther`: `0.0`, `1.0`, `0.5`, `12.345`.
impl fmt::Display for NativeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = match format_units(self.raw, self.decimals) {
            Ok(s) => s,
            Err(_) => return write!(f, "{}", self.raw),
        };
        match formatted.split_once('.') {
            Some((whole, frac)) => {
                let frac = frac.trim_end_matches('0');
                let frac = if frac.is_empty() { "0" } else { frac };
                write!(f, "{whole}.{frac}")
            }
            None => write!(f, "{formatted}.0"),
        }
    }
}

/// Parse an explorer-style balance (base-10 integer string).
pub fn parse_decimal_wei(value: &str) -> Result<U256, ChainError> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChainError::InvalidBalance(value.to_string()));
    }
    U256::from_str_radix(value, 10).map_err(|_| ChainError::InvalidBalance(value.to_string()))
}

/// Parse an RPC-style balance (`0x`-prefixed hex quantity).
pub fn parse_hex_wei(value: &str) -> Result<U256, ChainError> {
    let value = value.trim();
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| ChainError::InvalidBalance(value.to_string()))?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ChainError::InvalidBalance(value.to_string()));
    }
    U256::from_str_radix(digits, 16).map_err(|_| ChainError::InvalidBalance(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_ETHER_WEI: &str = "1000000000000000000";

    #[test]
    fn test_decimal_boundaries() {
        let zero = NativeAmount::new(parse_decimal_wei("0").unwrap(), 18);
        assert!(zero.is_zero());
        assert_eq!(zero.to_string(), "0.0");

        let one = NativeAmount::new(parse_decimal_wei(ONE_ETHER_WEI).unwrap(), 18);
        assert_eq!(one.to_string(), "1.0");
        assert_eq!(one.raw(), U256::from(10u64).pow(U256::from(18u64)));
    }

    #[test]
    fn test_hex_boundaries() {
        let zero = NativeAmount::new(parse_hex_wei("0x0").unwrap(), 18);
        assert_eq!(zero.to_string(), "0.0");

        let one = NativeAmount::new(parse_hex_wei("0xde0b6b3a7640000").unwrap(), 18);
        assert_eq!(one.to_string(), "1.0");
        assert_eq!(one.raw(), parse_decimal_wei(ONE_ETHER_WEI).unwrap());
    }

    #[test]
    fn test_fractional_and_large_values() {
        let half = NativeAmount::new(parse_decimal_wei("500000000000000000").unwrap(), 18);
        assert_eq!(half.to_string(), "0.5");

        let one_wei = NativeAmount::new(U256::from(1u64), 18);
        assert_eq!(one_wei.to_string(), "0.000000000000000001");

        let big = NativeAmount::new(parse_decimal_wei("12345000000000000000000").unwrap(), 18);
        assert_eq!(big.to_string(), "12345.0");
    }

    #[test]
    fn test_other_exponents() {
        assert_eq!(NativeAmount::new(U256::from(150u64), 2).to_string(), "1.5");
        assert_eq!(NativeAmount::new(U256::from(7u64), 0).to_string(), "7.0");
    }

    #[test]
    fn test_rejects_unusable_values() {
        assert!(parse_decimal_wei("").is_err());
        assert!(parse_decimal_wei("Max rate limit reached").is_err());
        assert!(parse_decimal_wei("-1").is_err());
        assert!(parse_decimal_wei("0x10").is_err());
        assert!(parse_hex_wei("10").is_err());
        assert!(parse_hex_wei("0x").is_err());
        assert!(parse_hex_wei("0xzz").is_err());
    }
}
