use bigdecimal::BigDecimal;
use log::{debug, warn};
use num_traits::Zero;

use crate::{
    db::{
        models::{Pool, ReferenceAssets},
        require_pool, require_pool_token, upsert_token_price, Store, Upsert,
    },
    utils::pool_token_id,
};

/// Outcome of a price resolution pass over one pool.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Fewer than two tokens, nothing to price against
    NotEligible,
    /// No USD anchor and no priced WETH anchor in the pool
    Unanchored,
    /// The pool was anchored; `sourced` lists the tokens it now backs
    Resolved {
        pool_liquidity: BigDecimal,
        sourced: Vec<String>,
    },
}

/// The trusted token a pool's value is measured against.
#[derive(Debug, Clone, PartialEq)]
struct Anchor {
    token: String,
    /// USD value of one unit of the anchor
    unit_price: BigDecimal,
    is_usd: bool,
}

/// Price discovery through anchored pools.
///
/// A pool can only seed prices when it holds a token whose value is already
/// trusted:
/// 1. USD anchor → valued at 1.00
/// 2. WETH anchor → valued at its own TokenPrice, once one exists
///
/// The pool's total value, implied by the anchor side, decides whether it
/// becomes the price source for each of its tokens. The most liquid pool wins
/// and an incumbent source keeps its record on ties, so equally liquid pools
/// never flip a price back and forth.
pub struct PriceResolver<'a> {
    assets: &'a ReferenceAssets,
}

impl<'a> PriceResolver<'a> {
    pub fn new(assets: &'a ReferenceAssets) -> Self {
        Self { assets }
    }

    /// Find the pool's anchor. USD takes priority over WETH.
    fn find_anchor<S: Store + ?Sized>(
        &self,
        store: &S,
        pool: &Pool,
    ) -> anyhow::Result<Option<Anchor>> {
        if pool.has_token(self.assets.usd()) {
            return Ok(Some(Anchor {
                token: self.assets.usd().to_string(),
                unit_price: BigDecimal::from(1),
                is_usd: true,
            }));
        }

        if pool.has_token(self.assets.weth()) {
            // WETH is only trusted once some USD pool has priced it
            if let Some(weth_price) = store.load_token_price(self.assets.weth())? {
                return Ok(Some(Anchor {
                    token: self.assets.weth().to_string(),
                    unit_price: weth_price.price,
                    is_usd: false,
                }));
            }
        }

        Ok(None)
    }

    /// Total pool value implied by the anchor side.
    ///
    /// value = unit_price × anchor_balance / anchor_weight × total_weight
    fn anchored_liquidity<S: Store + ?Sized>(
        &self,
        store: &S,
        pool: &Pool,
        anchor: &Anchor,
    ) -> anyhow::Result<BigDecimal> {
        let anchor_token = require_pool_token(store, &pool.id, &anchor.token)?;

        if anchor_token.denorm_weight.is_zero() || pool.total_weight.is_zero() {
            return Ok(BigDecimal::zero());
        }

        let anchor_value = &anchor.unit_price * &anchor_token.balance;
        let per_weight = &anchor_value / &anchor_token.denorm_weight;
        Ok(&per_weight * &pool.total_weight)
    }

    /// Re-evaluate which tokens this pool should price, and price them.
    pub fn resolve<S: Store + ?Sized>(
        &self,
        store: &mut S,
        pool_id: &str,
    ) -> anyhow::Result<Resolution> {
        let pool = require_pool(store, pool_id)?;

        if !pool.is_priceable() {
            return Ok(Resolution::NotEligible);
        }

        let Some(anchor) = self.find_anchor(store, &pool)? else {
            return Ok(Resolution::Unanchored);
        };

        let pool_liquidity = self.anchored_liquidity(store, &pool, &anchor)?;
        let mut sourced = Vec::new();

        for token in &pool.tokens_list {
            let source_id = pool_token_id(&pool.id, token);
            let Upsert {
                record: mut token_price,
                was_created,
            } = upsert_token_price(store, token)?;
            let pool_token = require_pool_token(store, &pool.id, token)?;

            let is_incumbent = token_price.is_sourced_from(&source_id);
            let displaces = pool_liquidity > token_price.pool_liquidity;

            // WETH's own price may only come from a two-token USD pool, never
            // from a path that already depends on WETH's price.
            let may_price = !self.assets.is_weth_anchor(token)
                || (pool.tokens_count == 2 && anchor.is_usd);

            if !((is_incumbent || displaces) && may_price) {
                continue;
            }

            if !is_incumbent && !was_created {
                debug!(
                    "Price source for {} moves from {} ({}) to {} ({})",
                    token,
                    token_price.pool_token_id,
                    token_price.pool_liquidity,
                    source_id,
                    pool_liquidity
                );
            }

            token_price.price = implied_price(
                &pool_liquidity,
                &pool.total_weight,
                &pool_token.denorm_weight,
                &pool_token.balance,
            );
            if token_price.price.is_zero() {
                warn!(
                    "Token {} has no implied price in source pool {} (balance {})",
                    token, pool.id, pool_token.balance
                );
            }

            token_price.symbol = pool_token.symbol;
            token_price.name = pool_token.name;
            token_price.decimals = pool_token.decimals;
            token_price.pool_liquidity = pool_liquidity.clone();
            token_price.pool_token_id = source_id;
            store.save_token_price(&token_price)?;

            sourced.push(token.clone());
        }

        Ok(Resolution::Resolved {
            pool_liquidity,
            sourced,
        })
    }
}

/// Per-unit value implied by the pool's constant-value invariant.
///
/// price = pool_liquidity / total_weight × weight / balance
///
/// A token with no balance (or a pool with no weight) has no implied price
/// and is reported as zero.
pub fn implied_price(
    pool_liquidity: &BigDecimal,
    total_weight: &BigDecimal,
    weight: &BigDecimal,
    balance: &BigDecimal,
) -> BigDecimal {
    if balance.is_zero() || total_weight.is_zero() {
        return BigDecimal::zero();
    }

    let per_weight = pool_liquidity / total_weight;
    let token_value = &per_weight * weight;
    &token_value / balance
}
