mod balancer;
mod network;
mod pool;
mod pool_token;
mod token_price;

pub use balancer::{Balancer, BALANCER_ID};
pub use network::{
    Network, ReferenceAssets, KOVAN_USD, KOVAN_WETH, MAINNET_USD, MAINNET_WETH,
};
pub use pool::Pool;
pub use pool_token::PoolToken;
pub use token_price::TokenPrice;
