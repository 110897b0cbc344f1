use bigdecimal::BigDecimal;
use log::warn;
use serde::{Deserialize, Serialize};

/// Id of the singleton aggregate record.
pub const BALANCER_ID: &str = "1";

/// Process-wide aggregate over every indexed pool.
///
/// `total_liquidity` is never recomputed from scratch. Each pool update
/// replaces that pool's previous contribution with its new one, so the value
/// always equals the sum of the latest per-pool liquidity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balancer {
    pub id: String,
    pub pool_count: u32,
    pub finalized_pool_count: u32,
    pub total_liquidity: BigDecimal,
}

impl Default for Balancer {
    fn default() -> Self {
        Self {
            id: BALANCER_ID.to_string(),
            pool_count: 0,
            finalized_pool_count: 0,
            total_liquidity: BigDecimal::from(0),
        }
    }
}

impl Balancer {
    /// Swap one pool's old contribution for its new one. Returns the delta applied.
    pub fn replace_pool_liquidity(&mut self, before: &BigDecimal, after: &BigDecimal) -> BigDecimal {
        let delta = after - before;
        self.total_liquidity = &self.total_liquidity + &delta;
        delta
    }

    /// Pool removal accounting.
    pub fn decrement_pool_count(&mut self, finalized: bool) {
        if self.pool_count == 0 {
            warn!("Pool count is already zero, ignoring decrement");
        }
        self.pool_count = self.pool_count.saturating_sub(1);

        if finalized {
            self.finalized_pool_count = self.finalized_pool_count.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_pool_liquidity_applies_delta() {
        let mut balancer = Balancer::default();
        let delta = balancer.replace_pool_liquidity(&BigDecimal::from(0), &BigDecimal::from(2000));
        assert_eq!(delta, BigDecimal::from(2000));

        let delta =
            balancer.replace_pool_liquidity(&BigDecimal::from(2000), &BigDecimal::from(1500));
        assert_eq!(delta, BigDecimal::from(-500));
        assert_eq!(balancer.total_liquidity, BigDecimal::from(1500));
    }

    #[test]
    fn test_decrement_pool_count() {
        let mut balancer = Balancer {
            pool_count: 2,
            finalized_pool_count: 1,
            ..Default::default()
        };

        balancer.decrement_pool_count(true);
        assert_eq!((balancer.pool_count, balancer.finalized_pool_count), (1, 0));

        balancer.decrement_pool_count(false);
        balancer.decrement_pool_count(true);
        assert_eq!((balancer.pool_count, balancer.finalized_pool_count), (0, 0));
    }
}
