// Path: crates/services/src/interoperability/cc_commands/mod.rs
//! Cross-chain commands owned by the interoperability module itself.

mod channel_terminated;
mod registration;
mod sidechain_terminated;

pub use channel_terminated::ChannelTerminatedCommand;
pub use registration::RegistrationCommand;
pub use sidechain_terminated::SidechainTerminatedCommand;

use crate::interoperability::internal::InternalMethod;
use meridian_api::interop::CrossChainCommand;

/// The interoperability module's cross-chain commands, ready to register
/// under [`meridian_types::keys::MODULE_NAME_INTEROPERABILITY`].
pub fn interoperability_commands(internal: &InternalMethod) -> Vec<Box<dyn CrossChainCommand>> {
    vec![
        Box::new(RegistrationCommand::new(internal.clone())),
        Box::new(ChannelTerminatedCommand::new(internal.clone())),
        Box::new(SidechainTerminatedCommand::new(internal.clone())),
    ]
}
