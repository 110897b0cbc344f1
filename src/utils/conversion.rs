//! Type conversion utilities.
//!
//! On-chain amounts are integers scaled by a token's decimals. Everything here
//! converts them into exact `BigDecimal` values; no floating point is involved.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::str::FromStr;

use crate::error::IndexerError;

// ============================================
// Scaling
// ============================================

/// Convert a raw integer amount into a decimal by dividing by 10^decimals.
///
/// # Example
/// ```
/// use num_bigint::BigInt;
/// let one = tally::utils::bigint_to_decimal(&BigInt::from(1_000_000u64), 6);
/// assert_eq!(one, bigdecimal::BigDecimal::from(1));
/// ```
pub fn bigint_to_decimal(amount: &BigInt, decimals: u8) -> BigDecimal {
    // Exact: only the scale changes
    BigDecimal::new(amount.clone(), decimals as i64)
}

/// Parse a big-endian hex string (with or without `0x`) and scale it by decimals.
///
/// An empty payload (`"0x"`) is zero, which is how empty call data decodes.
/// Only hex digits are accepted: raw amounts are unsigned.
pub fn hex_to_decimal(hex_string: &str, decimals: u8) -> Result<BigDecimal, IndexerError> {
    let digits = hex_string.strip_prefix("0x").unwrap_or(hex_string);
    if digits.is_empty() {
        return Ok(BigDecimal::zero());
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(IndexerError::InvalidAmount(hex_string.to_string()));
    }

    let value = BigInt::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| IndexerError::InvalidAmount(hex_string.to_string()))?;

    Ok(bigint_to_decimal(&value, decimals))
}

/// Parse a raw amount given either as a base-10 integer string or as `0x` hex,
/// then scale it by decimals.
pub fn parse_raw_amount(raw: &str, decimals: u8) -> Result<BigDecimal, IndexerError> {
    let trimmed = raw.trim();
    if trimmed.starts_with("0x") {
        return hex_to_decimal(trimmed, decimals);
    }

    let value =
        BigInt::from_str(trimmed).map_err(|_| IndexerError::InvalidAmount(raw.to_string()))?;
    if value.is_negative() {
        return Err(IndexerError::InvalidAmount(raw.to_string()));
    }

    Ok(bigint_to_decimal(&value, decimals))
}
