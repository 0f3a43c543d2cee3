// Path: crates/types/src/config/mod.rs
//! Shared configuration structures.
//!
//! Every field has a protocol default, so a partial TOML file (or none at all)
//! yields a working configuration.

use crate::app::interop::{LIVENESS_LIMIT, MAX_CCM_SIZE, MAX_NUM_VALIDATORS, MIN_RETURN_FEE_PER_BYTE};
use serde::{Deserialize, Serialize};

/// Configuration of the interoperability module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteropConfig {
    /// Seconds a chain may go without a certificate before it is no longer live.
    pub liveness_limit: u32,
    /// Maximum encoded size of a single cross-chain message.
    pub max_ccm_size: usize,
    /// Minimum fee per encoded byte for a message to be bounced instead of discarded.
    pub min_return_fee_per_byte: u64,
    /// Upper bound on the size of a sidechain's active validator set.
    pub max_num_validators: usize,
}

impl Default for InteropConfig {
    fn default() -> Self {
        Self {
            liveness_limit: LIVENESS_LIMIT,
            max_ccm_size: MAX_CCM_SIZE,
            min_return_fee_per_byte: MIN_RETURN_FEE_PER_BYTE,
            max_num_validators: MAX_NUM_VALIDATORS,
        }
    }
}

/// Configuration of BFT vote tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BftConfig {
    /// Number of recent block headers whose votes are tracked.
    pub max_window_size: usize,
    /// Number of heights the BFT parameters cache remembers.
    pub params_cache_capacity: usize,
}

impl Default for BftConfig {
    fn default() -> Self {
        Self {
            max_window_size: 309,
            params_cache_capacity: 1024,
        }
    }
}
