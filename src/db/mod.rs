//! Persistence contract and backing stores.
//!
//! The core only ever talks to a [`Store`]. Loads are nullable; whether a
//! missing record is fine or fatal depends on the call site, which is what
//! [`Lookup`] makes explicit.

mod memory;
mod overlay;
pub mod models;

pub use memory::MemoryStore;
pub use overlay::Overlay;

use crate::{
    db::models::{Balancer, Pool, PoolToken, TokenPrice},
    error::IndexerError,
    utils::pool_token_id,
};

/// Keyed record storage. Saves are upserts and atomic per record.
pub trait Store {
    fn load_pool(&self, id: &str) -> anyhow::Result<Option<Pool>>;
    fn load_pool_token(&self, id: &str) -> anyhow::Result<Option<PoolToken>>;
    fn load_token_price(&self, token: &str) -> anyhow::Result<Option<TokenPrice>>;
    fn load_balancer(&self) -> anyhow::Result<Option<Balancer>>;

    fn save_pool(&mut self, pool: &Pool) -> anyhow::Result<()>;
    fn save_pool_token(&mut self, pool_token: &PoolToken) -> anyhow::Result<()>;
    fn save_token_price(&mut self, token_price: &TokenPrice) -> anyhow::Result<()>;
    fn save_balancer(&mut self, balancer: &Balancer) -> anyhow::Result<()>;
}

/// Outcome of loading a record, classified by what the caller expected.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    /// Absent, and absence is a legitimate state at this call site
    NotYetCreated,
    /// Absent where the record must already exist
    IntegrityViolation(IndexerError),
}

impl<T> Lookup<T> {
    /// Classify a load where absence is legitimate.
    pub fn optional(record: Option<T>) -> Self {
        match record {
            Some(record) => Lookup::Found(record),
            None => Lookup::NotYetCreated,
        }
    }

    /// Classify a load where absence means the data is corrupt.
    pub fn required(record: Option<T>, violation: impl FnOnce() -> IndexerError) -> Self {
        match record {
            Some(record) => Lookup::Found(record),
            None => Lookup::IntegrityViolation(violation()),
        }
    }
}

/// Result of a get-or-create.
#[derive(Debug, Clone, PartialEq)]
pub struct Upsert<T> {
    pub record: T,
    pub was_created: bool,
}

/// Load a pool that must exist.
pub fn require_pool<S: Store + ?Sized>(store: &S, id: &str) -> anyhow::Result<Pool> {
    let lookup = Lookup::required(store.load_pool(id)?, || {
        IndexerError::MissingPool(id.to_string())
    });
    into_present(lookup)
}

/// Load the (pool, token) record that must exist once the token is in the pool's list.
pub fn require_pool_token<S: Store + ?Sized>(
    store: &S,
    pool_id: &str,
    token: &str,
) -> anyhow::Result<PoolToken> {
    let lookup = Lookup::required(store.load_pool_token(&pool_token_id(pool_id, token))?, || {
        IndexerError::MissingPoolToken {
            pool: pool_id.to_string(),
            token: token.to_string(),
        }
    });
    into_present(lookup)
}

/// Load a token's price record, creating an unpriced one if none exists yet.
///
/// The new record is not saved; callers persist it only if they change it.
pub fn upsert_token_price<S: Store + ?Sized>(
    store: &S,
    token: &str,
) -> anyhow::Result<Upsert<TokenPrice>> {
    let upsert = match Lookup::optional(store.load_token_price(token)?) {
        Lookup::Found(record) => Upsert {
            record,
            was_created: false,
        },
        _ => Upsert {
            record: TokenPrice::new(token),
            was_created: true,
        },
    };
    Ok(upsert)
}

/// Load the aggregate, initialising it on first access.
pub fn load_or_init_balancer<S: Store + ?Sized>(store: &S) -> anyhow::Result<Balancer> {
    Ok(store.load_balancer()?.unwrap_or_default())
}

fn into_present<T>(lookup: Lookup<T>) -> anyhow::Result<T> {
    match lookup {
        Lookup::Found(record) => Ok(record),
        Lookup::IntegrityViolation(e) => Err(e.into()),
        Lookup::NotYetCreated => Err(anyhow::anyhow!("required record was classified as optional")),
    }
}
