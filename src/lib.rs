pub mod config;
pub mod db;
pub mod error;
pub mod utils;
pub mod worker;

pub use crate::config::Settings;
pub use db::{MemoryStore, Store};
pub use error::IndexerError;
pub use worker::{EventProcessor, LedgerEvent, PriceResolver};
