use anyhow::Context;
use serde::Deserialize;

/// A pool-state mutation at a ledger position.
///
/// Read from JSON lines, one event per line:
/// ```json
/// {"block":1,"log_index":0,"event":"balance_changed","pool":"0x..","token":"0x..","balance":"1000000"}
/// ```
/// Amounts are raw on-chain integers (decimal or `0x` hex). Balances are
/// scaled by the token's decimals, weights by 18.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LedgerEvent {
    pub block: u64,
    pub log_index: u64,
    #[serde(flatten)]
    pub kind: PoolEvent,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PoolEvent {
    PoolCreated {
        pool: String,
        controller: String,
        /// Block timestamp, unix seconds
        #[serde(default)]
        timestamp: Option<i64>,
    },
    Bind {
        pool: String,
        token: String,
        #[serde(default)]
        symbol: String,
        #[serde(default)]
        name: String,
        #[serde(default = "default_decimals")]
        decimals: u8,
        balance: String,
        denorm: String,
    },
    Rebind {
        pool: String,
        token: String,
        balance: String,
        denorm: String,
    },
    BalanceChanged {
        pool: String,
        token: String,
        balance: String,
    },
    Finalized {
        pool: String,
    },
    PoolRetired {
        pool: String,
    },
}

fn default_decimals() -> u8 {
    18
}

impl LedgerEvent {
    pub fn from_json(line: &str) -> anyhow::Result<Self> {
        serde_json::from_str(line).with_context(|| format!("Malformed ledger event: {}", line))
    }

    pub fn position(&self) -> (u64, u64) {
        (self.block, self.log_index)
    }
}

impl PoolEvent {
    pub fn pool(&self) -> &str {
        match self {
            PoolEvent::PoolCreated { pool, .. }
            | PoolEvent::Bind { pool, .. }
            | PoolEvent::Rebind { pool, .. }
            | PoolEvent::BalanceChanged { pool, .. }
            | PoolEvent::Finalized { pool }
            | PoolEvent::PoolRetired { pool } => pool,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PoolEvent::PoolCreated { .. } => "pool_created",
            PoolEvent::Bind { .. } => "bind",
            PoolEvent::Rebind { .. } => "rebind",
            PoolEvent::BalanceChanged { .. } => "balance_changed",
            PoolEvent::Finalized { .. } => "finalized",
            PoolEvent::PoolRetired { .. } => "pool_retired",
        }
    }

    /// Whether this event moves balances or weights, and so needs repricing.
    pub fn is_price_impacting(&self) -> bool {
        matches!(
            self,
            PoolEvent::Bind { .. } | PoolEvent::Rebind { .. } | PoolEvent::BalanceChanged { .. }
        )
    }
}
