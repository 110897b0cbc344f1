//! Invariants of price resolution and liquidity aggregation.
//!
//! These hold for any sequence of balance updates, not just hand-picked ones.

mod common;

use common::{assets, pool_address, Ledger, TKN, USD, WETH, XYZ};
use proptest::prelude::*;
use tally::{
    db::models::Balancer,
    worker::{update_pool_liquidity, PoolEvent},
    MemoryStore, Store,
};

const TOKENS: [&str; 4] = [USD, WETH, TKN, XYZ];

/// Two tokens per pool drawn from the anchor/non-anchor mix, with whole-unit
/// balances and weights.
fn pool_strategy() -> impl Strategy<Value = (usize, usize, u64, u64, u64, u64)> {
    (0..4usize, 0..4usize, 1..1_000_000u64, 0..1_000_000u64, 1..49u64, 1..49u64)
        .prop_filter("distinct tokens", |(a, b, ..)| a != b)
}

fn build_ledger(pools: &[(usize, usize, u64, u64, u64, u64)]) -> Ledger {
    let mut ledger = Ledger::new();
    // Price WETH first so WETH-anchored pools can take part
    ledger.pool(&pool_address(100), &[(USD, "3000000", "25"), (WETH, "1000", "25")]);

    for (i, (a, b, bal_a, bal_b, w_a, w_b)) in pools.iter().enumerate() {
        ledger.pool(
            &pool_address(i as u64),
            &[
                (TOKENS[*a], &bal_a.to_string(), &w_a.to_string()),
                (TOKENS[*b], &bal_b.to_string(), &w_b.to_string()),
            ],
        );
        ledger.assert_conserved();
    }
    ledger
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The aggregate equals the sum of per-pool liquidity after every event.
    #[test]
    fn aggregate_is_conserved(
        pools in proptest::collection::vec(pool_strategy(), 1..5),
        updates in proptest::collection::vec((0..5usize, 0..2usize, 0..1_000_000u64), 0..20),
    ) {
        let mut ledger = build_ledger(&pools);

        for (pool_index, side, units) in updates {
            let pool_index = pool_index % pools.len();
            let (a, b, ..) = pools[pool_index];
            let token = if side == 0 { TOKENS[a] } else { TOKENS[b] };

            ledger.set_balance(&pool_address(pool_index as u64), token, &units.to_string());
            ledger.assert_conserved();
        }
    }

    /// Running the pair twice on an unchanged pool changes nothing.
    #[test]
    fn resolution_is_idempotent(
        pools in proptest::collection::vec(pool_strategy(), 1..5),
        target in 0..5usize,
    ) {
        let ledger = build_ledger(&pools);
        let pool_id = pool_address((target % pools.len()) as u64);

        let mut store: MemoryStore = ledger.store().clone();
        let mut balancer: Balancer = ledger.processor.balancer().clone();
        let assets = assets();

        update_pool_liquidity(&mut store, &assets, &mut balancer, &pool_id).unwrap();
        let prices_before: Vec<_> = {
            let mut prices: Vec<_> = store.token_prices().cloned().collect();
            prices.sort_by(|a, b| a.id.cmp(&b.id));
            prices
        };
        let total_before = balancer.total_liquidity.clone();

        let update = update_pool_liquidity(&mut store, &assets, &mut balancer, &pool_id).unwrap();

        let mut prices_after: Vec<_> = store.token_prices().cloned().collect();
        prices_after.sort_by(|a, b| a.id.cmp(&b.id));

        prop_assert_eq!(prices_before, prices_after);
        prop_assert_eq!(total_before, balancer.total_liquidity);
        prop_assert_eq!(update.liquidity.map(|l| l.delta), Some(0.into()));
    }

    /// Pools with neither a USD anchor nor a priced WETH anchor never touch prices.
    #[test]
    fn unanchored_pools_never_price(
        bal_a in 0..1_000_000u64,
        bal_b in 0..1_000_000u64,
        updates in proptest::collection::vec(0..1_000_000u64, 0..10),
    ) {
        let mut ledger = Ledger::new();
        let pool = pool_address(1);
        ledger.pool(&pool, &[(TKN, &bal_a.to_string(), "10"), (WETH, &bal_b.to_string(), "40")]);

        for units in updates {
            ledger
                .apply(PoolEvent::BalanceChanged {
                    pool: pool.clone(),
                    token: TKN.to_string(),
                    balance: units.to_string(),
                })
                .unwrap();
        }

        prop_assert_eq!(ledger.store().token_prices().count(), 0);
        prop_assert!(ledger.store().load_token_price(TKN).unwrap().is_none());
    }
}
