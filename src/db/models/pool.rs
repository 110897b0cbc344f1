use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weighted liquidity pool.
///
/// Primary Key: id (pool address)
///
/// `liquidity` is only ever written by the liquidity aggregator; everything
/// else is maintained by the event processor as binds and transfers happen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    pub controller: String,

    // Token membership (append-only, in bind order)
    pub tokens_list: Vec<String>,
    pub tokens_count: u32,
    /// Sum of the denormalized weights of every bound token
    pub total_weight: BigDecimal,

    /// Last computed total value of the pool in USD
    pub liquidity: BigDecimal,

    // Lifecycle
    pub finalized: bool,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub created_at_block: u64,
}

impl Pool {
    pub fn new(
        id: String,
        controller: String,
        created_at_block: u64,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            controller,
            tokens_list: Vec::new(),
            tokens_count: 0,
            total_weight: BigDecimal::from(0),
            liquidity: BigDecimal::from(0),
            finalized: false,
            active: true,
            created_at,
            created_at_block,
        }
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.tokens_list.iter().any(|t| t.eq_ignore_ascii_case(token))
    }

    /// A pool needs two tokens before a relative price means anything.
    pub fn is_priceable(&self) -> bool {
        !self.tokens_list.is_empty() && self.tokens_count >= 2
    }
}
