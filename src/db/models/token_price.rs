use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Global USD price of a token, backed by exactly one source pool.
///
/// Primary Key: id (token address)
///
/// The source is the most liquid pool that has ever offered a price for the
/// token. `pool_liquidity` and `pool_token_id` identify it and are kept
/// current even when the derived price is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPrice {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub price: BigDecimal,
    pub pool_liquidity: BigDecimal,
    /// Id of the winning (pool, token) pair, empty until first priced
    pub pool_token_id: String,
}

impl TokenPrice {
    /// Unpriced record with no source.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            symbol: String::new(),
            name: String::new(),
            decimals: 0,
            price: BigDecimal::from(0),
            pool_liquidity: BigDecimal::from(0),
            pool_token_id: String::new(),
        }
    }

    pub fn is_sourced_from(&self, pool_token_id: &str) -> bool {
        !self.pool_token_id.is_empty() && self.pool_token_id == pool_token_id
    }
}
