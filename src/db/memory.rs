use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::db::{
    models::{Balancer, Pool, PoolToken, TokenPrice},
    Store,
};

/// In-process store backed by hash maps.
///
/// Serialises to a JSON snapshot of every record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemoryStore {
    pools: FxHashMap<String, Pool>,
    pool_tokens: FxHashMap<String, PoolToken>,
    token_prices: FxHashMap<String, TokenPrice>,
    balancer: Option<Balancer>,
}

impl MemoryStore {
    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.pools.values()
    }

    pub fn pool_tokens(&self) -> impl Iterator<Item = &PoolToken> {
        self.pool_tokens.values()
    }

    pub fn token_prices(&self) -> impl Iterator<Item = &TokenPrice> {
        self.token_prices.values()
    }

    pub fn balancer(&self) -> Option<&Balancer> {
        self.balancer.as_ref()
    }
}

impl Store for MemoryStore {
    fn load_pool(&self, id: &str) -> anyhow::Result<Option<Pool>> {
        Ok(self.pools.get(id).cloned())
    }

    fn load_pool_token(&self, id: &str) -> anyhow::Result<Option<PoolToken>> {
        Ok(self.pool_tokens.get(id).cloned())
    }

    fn load_token_price(&self, token: &str) -> anyhow::Result<Option<TokenPrice>> {
        Ok(self.token_prices.get(token).cloned())
    }

    fn load_balancer(&self) -> anyhow::Result<Option<Balancer>> {
        Ok(self.balancer.clone())
    }

    fn save_pool(&mut self, pool: &Pool) -> anyhow::Result<()> {
        self.pools.insert(pool.id.clone(), pool.clone());
        Ok(())
    }

    fn save_pool_token(&mut self, pool_token: &PoolToken) -> anyhow::Result<()> {
        self.pool_tokens
            .insert(pool_token.id.clone(), pool_token.clone());
        Ok(())
    }

    fn save_token_price(&mut self, token_price: &TokenPrice) -> anyhow::Result<()> {
        self.token_prices
            .insert(token_price.id.clone(), token_price.clone());
        Ok(())
    }

    fn save_balancer(&mut self, balancer: &Balancer) -> anyhow::Result<()> {
        self.balancer = Some(balancer.clone());
        Ok(())
    }
}
