#![allow(dead_code)]

use std::str::FromStr;

use bigdecimal::BigDecimal;
use tally::{
    db::models::{Network, ReferenceAssets, MAINNET_USD, MAINNET_WETH},
    worker::PoolEvent,
    EventProcessor, LedgerEvent, MemoryStore, Store,
};

pub const USD: &str = MAINNET_USD;
pub const WETH: &str = MAINNET_WETH;
pub const TKN: &str = "0x00000000000000000000000000000000000000aa";
pub const XYZ: &str = "0x00000000000000000000000000000000000000ab";

pub fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

pub fn assert_close(actual: &BigDecimal, expected: &str) {
    let diff = (actual - dec(expected)).abs();
    assert!(diff < dec("0.000001"), "{} is not close to {}", actual, expected);
}

pub fn pool_address(n: u64) -> String {
    format!("0x{:040x}", 0xb000 + n)
}

pub fn assets() -> ReferenceAssets {
    ReferenceAssets::for_network(Network::Mainnet)
}

/// Decimals used for a test token's raw amounts.
pub fn decimals_of(token: &str) -> u8 {
    if token == USD {
        6
    } else {
        18
    }
}

/// Raw on-chain amount for a whole-unit quantity of a token.
pub fn raw(token: &str, units: &str) -> String {
    let scaled = dec(units) * BigDecimal::from(10u64.pow(decimals_of(token) as u32));
    scaled.with_scale(0).into_bigint_and_exponent().0.to_string()
}

/// Drives a processor with events at increasing ledger positions.
pub struct Ledger {
    pub processor: EventProcessor<MemoryStore>,
    block: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            processor: EventProcessor::new(MemoryStore::default(), assets()).unwrap(),
            block: 0,
        }
    }

    pub fn apply(&mut self, kind: PoolEvent) -> anyhow::Result<()> {
        self.block += 1;
        self.processor.process(&LedgerEvent {
            block: self.block,
            log_index: 0,
            kind,
        })
    }

    /// Create a pool and bind (token, units, weight) entries to it.
    pub fn pool(&mut self, pool: &str, tokens: &[(&str, &str, &str)]) {
        self.apply(PoolEvent::PoolCreated {
            pool: pool.to_string(),
            controller: pool.to_string(),
            timestamp: None,
        })
        .unwrap();

        for (token, units, weight) in tokens {
            self.apply(PoolEvent::Bind {
                pool: pool.to_string(),
                token: token.to_string(),
                symbol: String::new(),
                name: String::new(),
                decimals: decimals_of(token),
                balance: raw(token, units),
                denorm: raw(WETH, weight),
            })
            .unwrap();
        }
    }

    pub fn set_balance(&mut self, pool: &str, token: &str, units: &str) {
        self.apply(PoolEvent::BalanceChanged {
            pool: pool.to_string(),
            token: token.to_string(),
            balance: raw(token, units),
        })
        .unwrap();
    }

    /// Rebind a token with a new balance and weight.
    pub fn rebind(&mut self, pool: &str, token: &str, units: &str, weight: &str) {
        self.apply(PoolEvent::Rebind {
            pool: pool.to_string(),
            token: token.to_string(),
            balance: raw(token, units),
            denorm: raw(WETH, weight),
        })
        .unwrap();
    }

    pub fn total_weight(&self, pool: &str) -> BigDecimal {
        self.store().load_pool(pool).unwrap().unwrap().total_weight
    }

    pub fn store(&self) -> &MemoryStore {
        self.processor.store()
    }

    pub fn liquidity(&self, pool: &str) -> BigDecimal {
        self.store().load_pool(pool).unwrap().unwrap().liquidity
    }

    pub fn price(&self, token: &str) -> BigDecimal {
        self.store().load_token_price(token).unwrap().unwrap().price
    }

    pub fn price_source(&self, token: &str) -> String {
        self.store()
            .load_token_price(token)
            .unwrap()
            .unwrap()
            .pool_token_id
    }

    /// The aggregate must equal the sum of every pool's latest liquidity.
    pub fn assert_conserved(&self) {
        let sum = self
            .store()
            .pools()
            .fold(BigDecimal::from(0), |acc, pool| acc + &pool.liquidity);
        assert_eq!(self.processor.balancer().total_liquidity, sum);
    }
}
