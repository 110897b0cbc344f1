pub mod events;
pub mod liquidity;
pub mod price_resolver;
pub mod processor;

pub use events::{LedgerEvent, PoolEvent};
pub use liquidity::{pool_liquidity, recompute_liquidity, LiquidityUpdate};
pub use price_resolver::{implied_price, PriceResolver, Resolution};
pub use processor::{update_pool_liquidity, EventProcessor, PoolUpdate, ProcessorStats};
