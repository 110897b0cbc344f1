use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::db::models::{Network, ReferenceAssets};

/// Explicit anchor addresses, overriding the network defaults.
///
/// Used for private deployments and test networks whose stable and wrapped
/// native tokens differ from the built-in ones.
#[derive(Debug, Deserialize, Clone)]
pub struct AnchorSettings {
    pub usd: String,
    pub weth: String,
}

/// Event stream and output configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct IndexerSettings {
    /// JSON-lines file of ledger events, in ledger order
    pub events_path: String,
    /// Where to write a JSON snapshot of every record after the run
    #[serde(default)]
    pub snapshot_path: Option<String>,
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
    /// Stop at the first rejected event instead of skipping it
    #[serde(default)]
    pub halt_on_error: bool,
}

fn default_progress_interval() -> u64 {
    10_000
}

/// Root application configuration.
///
/// Loaded from `config.yaml` at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub network: Network,
    #[serde(default)]
    pub anchors: Option<AnchorSettings>,
    pub indexer: IndexerSettings,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file("config")
    }

    pub fn from_file(name: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(name))
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }

    /// Anchor tokens for this run: explicit overrides win over network defaults.
    pub fn reference_assets(&self) -> ReferenceAssets {
        match &self.anchors {
            Some(anchors) => ReferenceAssets::new(&anchors.usd, &anchors.weth),
            None => ReferenceAssets::for_network(self.network),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(yaml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = parse(
            r#"
network: kovan
indexer:
  events_path: events.jsonl
"#,
        );

        assert_eq!(settings.network, Network::Kovan);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.indexer.progress_interval, 10_000);
        assert!(!settings.indexer.halt_on_error);
        assert!(settings.indexer.snapshot_path.is_none());
        assert_eq!(
            settings.reference_assets(),
            ReferenceAssets::for_network(Network::Kovan)
        );
    }

    #[test]
    fn test_anchor_override() {
        let settings = parse(
            r#"
network: mainnet
anchors:
  usd: "0x00000000000000000000000000000000000000AA"
  weth: "0x00000000000000000000000000000000000000bb"
indexer:
  events_path: events.jsonl
  halt_on_error: true
"#,
        );

        let assets = settings.reference_assets();
        assert_eq!(assets.usd(), "0x00000000000000000000000000000000000000aa");
        assert!(assets.is_weth_anchor("0x00000000000000000000000000000000000000BB"));
        assert!(settings.indexer.halt_on_error);
    }
}
