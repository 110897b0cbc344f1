//! Utility functions for the tally indexer.
//!
//! - [`conversion`] - Fixed-point scaling of raw on-chain integers into decimals
//! - [`ids`] - Address normalisation and composite record ids

mod conversion;
mod ids;

// ============================================
// Common Constants
// ============================================

/// Decimals of a denormalized pool weight (Balancer weights are 18-decimal fixed point).
pub const WEIGHT_DECIMALS: u8 = 18;

// ============================================
// Re-exports
// ============================================

pub use conversion::{bigint_to_decimal, hex_to_decimal, parse_raw_amount};
pub use ids::{hex_encode, normalize_address, pool_token_id};
