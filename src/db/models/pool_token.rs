use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::utils::pool_token_id;

/// A token bound to a pool (one per (pool, token) pair).
///
/// Primary Key: id = "{pool}-{token}"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolToken {
    pub id: String,
    pub pool_id: String,
    pub address: String,

    // Token metadata (copied from the bind event)
    pub symbol: String,
    pub name: String,
    pub decimals: u8,

    /// Amount held by the pool, already scaled by `decimals`
    pub balance: BigDecimal,
    pub denorm_weight: BigDecimal,
}

impl PoolToken {
    pub fn new(pool_id: &str, address: &str, symbol: String, name: String, decimals: u8) -> Self {
        Self {
            id: pool_token_id(pool_id, address),
            pool_id: pool_id.to_string(),
            address: address.to_string(),
            symbol,
            name,
            decimals,
            balance: BigDecimal::from(0),
            denorm_weight: BigDecimal::from(0),
        }
    }
}
