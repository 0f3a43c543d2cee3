// Path: crates/services/src/interoperability/mod.rs
//! The interoperability module.
//!
//! A cross-chain update carries a certificate of the sending chain, changes to
//! its certificate signers and the messages the sending chain added to its
//! outbox since the last update. The mainchain applies messages addressed to
//! itself and forwards the rest; a sidechain only receives messages from the
//! mainchain and applies them all.
//!
//! Processing of a single message never fails the transaction: failures are
//! contained per message and reported through `ccmProcessed` events.

/// Cross-chain commands owned by this module.
pub mod cc_commands;
/// The cross-chain update commands.
pub mod commands;
/// Events emitted while processing updates.
pub mod events;
/// State transitions shared by commands and other modules.
pub mod internal;
/// Hooks and cross-chain commands of the participating modules.
pub mod registry;
/// Typed substores.
pub mod stores;

#[cfg(test)]
mod tests;

pub use commands::{SubmitMainchainCrossChainUpdateCommand, SubmitSidechainCrossChainUpdateCommand};
pub use internal::{InternalMethod, OutgoingCcm};
pub use registry::CcmRegistry;
pub use stores::InteropStores;

use meridian_crypto::sha256;
use meridian_types::app::Ccm;
use meridian_types::codec::SchemaObject;
use meridian_types::error::CodecError;
use meridian_types::keys::MODULE_NAME_INTEROPERABILITY;

/// The ID of a message: the hash of its encoding.
pub fn compute_ccm_id(ccm: &Ccm) -> Result<Vec<u8>, CodecError> {
    Ok(sha256(&ccm.encode()?).to_vec())
}

/// A registry holding the cross-chain commands of this module. Other modules
/// add their hooks and commands to it before it is handed to a command.
pub fn interoperability_registry(internal: &InternalMethod) -> CcmRegistry {
    let mut registry = CcmRegistry::new();
    for command in cc_commands::interoperability_commands(internal) {
        registry.register_command(MODULE_NAME_INTEROPERABILITY, command);
    }
    registry
}
