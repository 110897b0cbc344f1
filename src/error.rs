use thiserror::Error;

/// Conditions that abort processing of the current ledger event.
///
/// Precondition misses (a pool with fewer than two tokens, a pool without an
/// anchor) are not errors and never show up here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IndexerError {
    #[error("pool {0} not found")]
    MissingPool(String),

    #[error("pool token {token} of pool {pool} not found")]
    MissingPoolToken { pool: String, token: String },

    #[error("token {token} is already bound to pool {pool}")]
    DuplicateToken { pool: String, token: String },

    #[error("event at {block}:{log_index} arrived after {last_block}:{last_log_index}")]
    OutOfOrder {
        block: u64,
        log_index: u64,
        last_block: u64,
        last_log_index: u64,
    },

    #[error("invalid amount {0:?}")]
    InvalidAmount(String),

    #[error("invalid address {0:?}")]
    InvalidAddress(String),
}
