use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::{
    db::{
        load_or_init_balancer,
        models::{Balancer, Pool, PoolToken, ReferenceAssets},
        require_pool, require_pool_token, Overlay, Store,
    },
    error::IndexerError,
    utils::{normalize_address, parse_raw_amount, WEIGHT_DECIMALS},
    worker::{
        events::{LedgerEvent, PoolEvent},
        liquidity::{recompute_liquidity, LiquidityUpdate},
        price_resolver::{PriceResolver, Resolution},
    },
};

/// Result of running price resolution and liquidity aggregation on a pool.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolUpdate {
    pub resolution: Resolution,
    pub liquidity: Option<LiquidityUpdate>,
}

/// Reprice a pool and refresh its liquidity contribution.
///
/// Always run as a pair, right after the pool's balances or weights change.
pub fn update_pool_liquidity<S: Store + ?Sized>(
    store: &mut S,
    assets: &ReferenceAssets,
    balancer: &mut Balancer,
    pool_id: &str,
) -> anyhow::Result<PoolUpdate> {
    let resolution = PriceResolver::new(assets).resolve(store, pool_id)?;
    let liquidity = recompute_liquidity(store, balancer, pool_id)?;

    Ok(PoolUpdate {
        resolution,
        liquidity,
    })
}

/// Counters over the events seen by a processor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorStats {
    pub applied: u64,
    pub rejected: u64,
}

/// Applies ledger events one at a time, in ledger order.
///
/// The processor is the single writer of the [`Balancer`] aggregate. Every
/// event is staged in an [`Overlay`] and committed only if it succeeds, so a
/// rejected event leaves the store and the aggregate exactly as they were.
pub struct EventProcessor<S: Store> {
    store: S,
    assets: ReferenceAssets,
    balancer: Balancer,
    last_position: Option<(u64, u64)>,
    stats: ProcessorStats,
}

impl<S: Store> EventProcessor<S> {
    pub fn new(store: S, assets: ReferenceAssets) -> anyhow::Result<Self> {
        let balancer = load_or_init_balancer(&store).context("Failed to load balancer")?;

        Ok(Self {
            store,
            assets,
            balancer,
            last_position: None,
            stats: ProcessorStats::default(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn balancer(&self) -> &Balancer {
        &self.balancer
    }

    pub fn assets(&self) -> &ReferenceAssets {
        &self.assets
    }

    pub fn stats(&self) -> ProcessorStats {
        self.stats
    }

    /// Apply one event. On error nothing from this event is persisted.
    pub fn process(&mut self, event: &LedgerEvent) -> anyhow::Result<()> {
        let result = self.try_process(event);
        if result.is_ok() {
            self.stats.applied += 1;
        } else {
            self.stats.rejected += 1;
        }
        result
    }

    fn try_process(&mut self, event: &LedgerEvent) -> anyhow::Result<()> {
        let position = event.position();
        if let Some((last_block, last_log_index)) = self.last_position {
            if position <= (last_block, last_log_index) {
                return Err(IndexerError::OutOfOrder {
                    block: event.block,
                    log_index: event.log_index,
                    last_block,
                    last_log_index,
                }
                .into());
            }
        }
        // The position is consumed even if the event fails below
        self.last_position = Some(position);

        let mut balancer = self.balancer.clone();
        let mut staged = Overlay::new(&mut self.store);

        apply_event(&mut staged, &self.assets, &mut balancer, event).with_context(|| {
            format!(
                "Failed to apply {} for pool {} at {}:{}",
                event.kind.name(),
                event.kind.pool(),
                event.block,
                event.log_index
            )
        })?;

        staged.commit()?;
        self.balancer = balancer;

        Ok(())
    }
}

fn apply_event<S: Store + ?Sized>(
    store: &mut S,
    assets: &ReferenceAssets,
    balancer: &mut Balancer,
    event: &LedgerEvent,
) -> anyhow::Result<()> {
    match &event.kind {
        PoolEvent::PoolCreated {
            pool,
            controller,
            timestamp,
        } => {
            let pool_id = normalize_address(pool)?;
            if store.load_pool(&pool_id)?.is_some() {
                warn!("Pool {} already exists, ignoring creation", pool_id);
                return Ok(());
            }

            let created_at = timestamp.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));
            let pool = Pool::new(
                pool_id,
                normalize_address(controller)?,
                event.block,
                created_at,
            );
            store.save_pool(&pool)?;

            balancer.pool_count += 1;
            store.save_balancer(balancer)?;
            debug!("Created pool {} at block {}", pool.id, event.block);
        },
        PoolEvent::Bind {
            pool,
            token,
            symbol,
            name,
            decimals,
            balance,
            denorm,
        } => {
            let mut pool = require_pool(store, &normalize_address(pool)?)?;
            let token = normalize_address(token)?;
            if pool.has_token(&token) {
                return Err(IndexerError::DuplicateToken {
                    pool: pool.id,
                    token,
                }
                .into());
            }

            let mut pool_token =
                PoolToken::new(&pool.id, &token, symbol.clone(), name.clone(), *decimals);
            pool_token.balance = parse_raw_amount(balance, *decimals)?;
            pool_token.denorm_weight = parse_raw_amount(denorm, WEIGHT_DECIMALS)?;

            pool.total_weight = &pool.total_weight + &pool_token.denorm_weight;
            pool.tokens_list.push(token);
            pool.tokens_count += 1;

            store.save_pool_token(&pool_token)?;
            store.save_pool(&pool)?;
        },
        PoolEvent::Rebind {
            pool,
            token,
            balance,
            denorm,
        } => {
            let mut pool = require_pool(store, &normalize_address(pool)?)?;
            let mut pool_token = require_pool_token(store, &pool.id, &normalize_address(token)?)?;

            let weight = parse_raw_amount(denorm, WEIGHT_DECIMALS)?;
            pool.total_weight = &(&pool.total_weight - &pool_token.denorm_weight) + &weight;
            pool_token.denorm_weight = weight;
            pool_token.balance = parse_raw_amount(balance, pool_token.decimals)?;

            store.save_pool_token(&pool_token)?;
            store.save_pool(&pool)?;
        },
        PoolEvent::BalanceChanged {
            pool,
            token,
            balance,
        } => {
            let pool_id = normalize_address(pool)?;
            let mut pool_token = require_pool_token(store, &pool_id, &normalize_address(token)?)?;
            pool_token.balance = parse_raw_amount(balance, pool_token.decimals)?;

            store.save_pool_token(&pool_token)?;
        },
        PoolEvent::Finalized { pool } => {
            let mut pool = require_pool(store, &normalize_address(pool)?)?;
            if pool.finalized {
                warn!("Pool {} is already finalized", pool.id);
                return Ok(());
            }

            pool.finalized = true;
            balancer.finalized_pool_count += 1;
            store.save_pool(&pool)?;
            store.save_balancer(balancer)?;
        },
        PoolEvent::PoolRetired { pool } => {
            let mut pool = require_pool(store, &normalize_address(pool)?)?;
            if !pool.active {
                warn!("Pool {} is already retired", pool.id);
                return Ok(());
            }

            pool.active = false;
            balancer.decrement_pool_count(pool.finalized);
            store.save_pool(&pool)?;
            store.save_balancer(balancer)?;
        },
    }

    if event.kind.is_price_impacting() {
        let pool_id = normalize_address(event.kind.pool())?;
        update_pool_liquidity(store, assets, balancer, &pool_id)?;
    }

    Ok(())
}
