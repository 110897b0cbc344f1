//! Record identity helpers.

use alloy::primitives::{hex, Address};
use std::str::FromStr;

use crate::error::IndexerError;

/// Encode bytes as a lowercase hex string with 0x prefix.
pub fn hex_encode(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Validate an address and return its canonical lowercase form.
///
/// Every record key derived from an address goes through here, so lookups
/// never miss because of checksum casing.
pub fn normalize_address(address: &str) -> Result<String, IndexerError> {
    let parsed = Address::from_str(address.trim())
        .map_err(|_| IndexerError::InvalidAddress(address.to_string()))?;
    Ok(hex_encode(parsed.as_slice()))
}

/// Id of the (pool, token) pair record.
pub fn pool_token_id(pool_id: &str, token: &str) -> String {
    format!("{}-{}", pool_id, token)
}
