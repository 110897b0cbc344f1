//! Pool liquidity and the global running total.

use bigdecimal::BigDecimal;
use num_traits::Zero;

use crate::db::{
    models::{Balancer, Pool},
    require_pool, require_pool_token, Store,
};

/// One pool's liquidity change and the delta applied to the aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct LiquidityUpdate {
    pub before: BigDecimal,
    pub after: BigDecimal,
    pub delta: BigDecimal,
}

/// Value a pool from its most heavily weighted priced token.
///
/// liquidity = price × balance / weight × total_weight
///
/// Summing every priced token would count the same value several times over,
/// since each one already implies the full pool value through the invariant.
pub fn pool_liquidity<S: Store + ?Sized>(store: &S, pool: &Pool) -> anyhow::Result<BigDecimal> {
    let mut liquidity = BigDecimal::zero();
    let mut max_weight = BigDecimal::zero();

    for token in &pool.tokens_list {
        let Some(token_price) = store.load_token_price(token)? else {
            continue;
        };
        let pool_token = require_pool_token(store, &pool.id, token)?;

        // Strictly greater, so zero-weight tokens never get here
        if pool_token.denorm_weight > max_weight {
            let value = &token_price.price * &pool_token.balance;
            let per_weight = &value / &pool_token.denorm_weight;
            liquidity = &per_weight * &pool.total_weight;
            max_weight = pool_token.denorm_weight;
        }
    }

    Ok(liquidity)
}

/// Recompute a pool's liquidity and fold the change into the aggregate.
///
/// The caller owns `balancer` and is the only writer; it is persisted here
/// along with the pool. Pools with fewer than two tokens are left untouched.
pub fn recompute_liquidity<S: Store + ?Sized>(
    store: &mut S,
    balancer: &mut Balancer,
    pool_id: &str,
) -> anyhow::Result<Option<LiquidityUpdate>> {
    let mut pool = require_pool(store, pool_id)?;

    if !pool.is_priceable() {
        return Ok(None);
    }

    let after = pool_liquidity(store, &pool)?;
    let before = std::mem::replace(&mut pool.liquidity, after.clone());
    let delta = balancer.replace_pool_liquidity(&before, &after);

    store.save_balancer(balancer)?;
    store.save_pool(&pool)?;

    Ok(Some(LiquidityUpdate {
        before,
        after,
        delta,
    }))
}
