use anyhow::Context;
use rustc_hash::FxHashMap;

use crate::db::{
    models::{Balancer, Pool, PoolToken, TokenPrice},
    Store,
};

/// Write buffer over another store.
///
/// Reads see pending writes first. Nothing reaches the inner store until
/// [`Overlay::commit`]; dropping the overlay discards every pending write.
/// One overlay wraps the processing of one ledger event.
pub struct Overlay<'a, S: Store> {
    inner: &'a mut S,
    pools: FxHashMap<String, Pool>,
    pool_tokens: FxHashMap<String, PoolToken>,
    token_prices: FxHashMap<String, TokenPrice>,
    balancer: Option<Balancer>,
}

impl<'a, S: Store> Overlay<'a, S> {
    pub fn new(inner: &'a mut S) -> Self {
        Self {
            inner,
            pools: FxHashMap::default(),
            pool_tokens: FxHashMap::default(),
            token_prices: FxHashMap::default(),
            balancer: None,
        }
    }

    /// Flush every pending write into the inner store.
    pub fn commit(self) -> anyhow::Result<()> {
        let Overlay {
            inner,
            pools,
            pool_tokens,
            token_prices,
            balancer,
        } = self;

        for pool in pools.values() {
            inner
                .save_pool(pool)
                .with_context(|| format!("Failed to save pool {}", pool.id))?;
        }
        for pool_token in pool_tokens.values() {
            inner
                .save_pool_token(pool_token)
                .with_context(|| format!("Failed to save pool token {}", pool_token.id))?;
        }
        for token_price in token_prices.values() {
            inner
                .save_token_price(token_price)
                .with_context(|| format!("Failed to save token price {}", token_price.id))?;
        }
        if let Some(balancer) = &balancer {
            inner
                .save_balancer(balancer)
                .context("Failed to save balancer")?;
        }

        Ok(())
    }
}

impl<'a, S: Store> Store for Overlay<'a, S> {
    fn load_pool(&self, id: &str) -> anyhow::Result<Option<Pool>> {
        match self.pools.get(id) {
            Some(pool) => Ok(Some(pool.clone())),
            None => self.inner.load_pool(id),
        }
    }

    fn load_pool_token(&self, id: &str) -> anyhow::Result<Option<PoolToken>> {
        match self.pool_tokens.get(id) {
            Some(pool_token) => Ok(Some(pool_token.clone())),
            None => self.inner.load_pool_token(id),
        }
    }

    fn load_token_price(&self, token: &str) -> anyhow::Result<Option<TokenPrice>> {
        match self.token_prices.get(token) {
            Some(token_price) => Ok(Some(token_price.clone())),
            None => self.inner.load_token_price(token),
        }
    }

    fn load_balancer(&self) -> anyhow::Result<Option<Balancer>> {
        match &self.balancer {
            Some(balancer) => Ok(Some(balancer.clone())),
            None => self.inner.load_balancer(),
        }
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
