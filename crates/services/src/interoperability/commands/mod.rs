// Path: crates/services/src/interoperability/commands/mod.rs
//! Transaction commands of the interoperability module.

/// Steps shared by both cross-chain update commands.
pub mod base;
/// The mainchain cross-chain update.
pub mod mainchain;
/// The sidechain cross-chain update.
pub mod sidechain;

pub use base::BaseCrossChainUpdateCommand;
pub use mainchain::{SubmitMainchainCrossChainUpdateCommand, COMMAND_NAME_SUBMIT_MAINCHAIN_CCU};
pub use sidechain::{SubmitSidechainCrossChainUpdateCommand, COMMAND_NAME_SUBMIT_SIDECHAIN_CCU};
