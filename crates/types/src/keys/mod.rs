// Path: crates/types/src/keys/mod.rs
//! Defines constants for well-known state keys.
//!
//! A state key is `module prefix (4 bytes) || substore prefix (2 bytes) || key`.
//! The module prefix is the first four bytes of `sha256(module name)` and is
//! derived at runtime by the stores; the substore prefixes below are fixed.

/// Name of the interoperability module.
pub const MODULE_NAME_INTEROPERABILITY: &str = "interoperability";
/// Name of the BFT module.
pub const MODULE_NAME_BFT: &str = "bft";

/// Length of a module store prefix.
pub const MODULE_PREFIX_LENGTH: usize = 4;
/// Length of a substore prefix.
pub const SUBSTORE_PREFIX_LENGTH: usize = 2;

/// Substore prefix of the outbox roots, the only substore proven across chains.
pub const STORE_PREFIX_OUTBOX_ROOT: [u8; 2] = [0x00, 0x00];
/// Substore prefix of the chain accounts.
pub const STORE_PREFIX_CHAIN_DATA: [u8; 2] = [0x80, 0x00];
/// Substore prefix of the channel data.
pub const STORE_PREFIX_CHANNEL_DATA: [u8; 2] = [0xa0, 0x00];
/// Substore prefix of the chain validators.
pub const STORE_PREFIX_CHAIN_VALIDATORS: [u8; 2] = [0xc0, 0x00];
/// Substore prefix of the own chain account.
pub const STORE_PREFIX_OWN_CHAIN_DATA: [u8; 2] = [0xe0, 0x00];
/// Substore prefix of the terminated state accounts.
pub const STORE_PREFIX_TERMINATED_STATE: [u8; 2] = [0xb0, 0x00];

/// Substore prefix of the persisted BFT votes.
pub const STORE_PREFIX_BFT_VOTES: [u8; 2] = [0x00, 0x00];
/// Substore prefix of the BFT parameters, keyed by big-endian height.
pub const STORE_PREFIX_BFT_PARAMETERS: [u8; 2] = [0x80, 0x00];

/// Context-store flag set while the CCMs of a cross-chain update are processed.
pub const CONTEXT_STORE_KEY_CCM_PROCESSING: &str = "CONTEXT_STORE_KEY_CCM_PROCESSING";

/// Key of singleton store entries.
pub const EMPTY_KEY: &[u8] = &[];
