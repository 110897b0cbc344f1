#[allow(clippy::module_inception)]
mod config;

pub use self::config::{AnchorSettings, IndexerSettings, Settings};
