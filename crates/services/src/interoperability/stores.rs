// Path: crates/services/src/interoperability/stores.rs
//! Typed access to the interoperability substores.

use meridian_api::state::ModuleStore;
use meridian_crypto::sha256;
use meridian_types::app::{
    ChainAccount, ChainId, ChainValidators, ChannelData, OutboxRoot, OwnChainAccount,
    TerminatedState,
};
use meridian_types::keys::{
    MODULE_NAME_INTEROPERABILITY, MODULE_PREFIX_LENGTH, STORE_PREFIX_CHAIN_DATA,
    STORE_PREFIX_CHAIN_VALIDATORS, STORE_PREFIX_CHANNEL_DATA, STORE_PREFIX_OUTBOX_ROOT,
    STORE_PREFIX_OWN_CHAIN_DATA, STORE_PREFIX_TERMINATED_STATE,
};

/// The store prefix of the interoperability module: the first four bytes of
/// `sha256("interoperability")`.
pub fn interop_module_prefix() -> [u8; MODULE_PREFIX_LENGTH] {
    let [a, b, c, d, ..] = sha256(MODULE_NAME_INTEROPERABILITY.as_bytes());
    [a, b, c, d]
}

/// The key under which a partner chain's state tree holds the outbox root of
/// its channel to `chain_id`.
///
/// State trees hash the per-entry part of every key, so the proven key is
/// `module prefix || outbox root prefix || sha256(chain_id)`.
pub fn outbox_root_proof_key(chain_id: &ChainId) -> Vec<u8> {
    [
        interop_module_prefix().as_slice(),
        STORE_PREFIX_OUTBOX_ROOT.as_slice(),
        sha256(chain_id.as_bytes()).as_slice(),
    ]
    .concat()
}

/// Every substore of the interoperability module. All but the own chain
/// account are keyed by chain ID.
#[derive(Debug, Clone)]
pub struct InteropStores {
    /// Chain accounts of partner chains.
    pub chain_account: ModuleStore<ChainAccount>,
    /// Message channels with partner chains.
    pub channel: ModuleStore<ChannelData>,
    /// Certificate signers of partner chains.
    pub chain_validators: ModuleStore<ChainValidators>,
    /// This chain's account, under the empty key.
    pub own_chain: ModuleStore<OwnChainAccount>,
    /// Accounts of terminated chains.
    pub terminated_state: ModuleStore<TerminatedState>,
    /// Outbox roots, mirrored from the channels so partner chains can prove them.
    pub outbox_root: ModuleStore<OutboxRoot>,
}

impl Default for InteropStores {
    fn default() -> Self {
        Self::new()
    }
}

impl InteropStores {
    /// Creates the stores under the interoperability module prefix.
    pub fn new() -> Self {
        let prefix = interop_module_prefix();
        Self {
            chain_account: ModuleStore::new(prefix, STORE_PREFIX_CHAIN_DATA),
            channel: ModuleStore::new(prefix, STORE_PREFIX_CHANNEL_DATA),
            chain_validators: ModuleStore::new(prefix, STORE_PREFIX_CHAIN_VALIDATORS),
            own_chain: ModuleStore::new(prefix, STORE_PREFIX_OWN_CHAIN_DATA),
            terminated_state: ModuleStore::new(prefix, STORE_PREFIX_TERMINATED_STATE),
            outbox_root: ModuleStore::new(prefix, STORE_PREFIX_OUTBOX_ROOT),
        }
    }
}
