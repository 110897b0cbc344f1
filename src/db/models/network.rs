use serde::Deserialize;

/// Networks the indexer knows anchor assets for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Kovan,
}

/// Mainnet wrapped ether.
pub const MAINNET_WETH: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
/// Mainnet USDC.
pub const MAINNET_USD: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
/// Kovan wrapped ether.
pub const KOVAN_WETH: &str = "0xd0a1e359811322d97991e03f863a0c30c2cf029c";
/// Kovan DAI.
pub const KOVAN_USD: &str = "0x1528f3fcc26d13f7079325fb78d9442607781c8c";

/// The two anchor tokens prices are seeded from.
///
/// Fixed for the lifetime of the process:
///   - USD anchor: a stable asset, valued at exactly one unit
///   - WETH anchor: trusted only once a USD-anchored pool has priced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceAssets {
    usd: String,
    weth: String,
}

impl ReferenceAssets {
    pub fn new(usd: &str, weth: &str) -> Self {
        Self {
            // Always lowercase addresses for consistent comparisons
            usd: usd.to_lowercase(),
            weth: weth.to_lowercase(),
        }
    }

    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::new(MAINNET_USD, MAINNET_WETH),
            Network::Kovan => Self::new(KOVAN_USD, KOVAN_WETH),
        }
    }

    pub fn usd(&self) -> &str {
        &self.usd
    }

    pub fn weth(&self) -> &str {
        &self.weth
    }

    pub fn is_usd_anchor(&self, token: &str) -> bool {
        self.usd.eq_ignore_ascii_case(token)
    }

    pub fn is_weth_anchor(&self, token: &str) -> bool {
        self.weth.eq_ignore_ascii_case(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_anchors() {
        let assets = ReferenceAssets::for_network(Network::Mainnet);
        assert!(assets.is_usd_anchor(MAINNET_USD));
        assert!(assets.is_weth_anchor("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2"));
        assert!(!assets.is_usd_anchor(MAINNET_WETH));
        assert!(!assets.is_weth_anchor(KOVAN_WETH));
    }

    #[test]
    fn test_kovan_anchors() {
        let assets = ReferenceAssets::for_network(Network::Kovan);
        assert_eq!(assets.usd(), KOVAN_USD);
        assert_eq!(assets.weth(), KOVAN_WETH);
        assert!(!assets.is_usd_anchor(MAINNET_USD));
    }
}
