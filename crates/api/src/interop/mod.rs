// Path: crates/api/src/interop/mod.rs
//! Traits for commands, cross-chain commands and interoperable module hooks.

use crate::context::{
    CommandExecuteContext, CommandVerifyContext, CrossChainMessageContext, VerificationResult,
};
use meridian_types::codec::{Schema, SchemaObject};
use meridian_types::error::InteropError;

/// A transaction command.
///
/// `verify` reports protocol violations as a failed [`VerificationResult`];
/// an `Err` means the state itself could not be read.
pub trait Command {
    /// Decoded parameter type.
    type Params: SchemaObject;

    /// Command name, unique within its module.
    fn name(&self) -> &'static str;

    /// Checks the command against the current state without changing it.
    fn verify(
        &self,
        ctx: &CommandVerifyContext<'_, Self::Params>,
    ) -> Result<VerificationResult, InteropError>;

    /// Applies a verified command.
    fn execute(
        &self,
        ctx: &mut CommandExecuteContext<'_, Self::Params>,
    ) -> Result<(), InteropError>;
}

/// A command that is triggered by a cross-chain message instead of a transaction.
pub trait CrossChainCommand {
    /// Command name, matched against `ccm.cross_chain_command`.
    fn name(&self) -> &'static str;

    /// Schema of `ccm.params`.
    fn params_schema(&self) -> &'static Schema;

    /// Checks the message before execution. The default accepts every message.
    fn verify(&self, _ctx: &CrossChainMessageContext<'_>) -> Result<(), InteropError> {
        Ok(())
    }

    /// Executes the message.
    fn execute(&self, ctx: &mut CrossChainMessageContext<'_>) -> Result<(), InteropError>;
}

/// Hooks a module exposes to the interoperability module. Every hook of every
/// registered module runs for every message, in registration order; any error
/// aborts processing of that message.
pub trait InteroperableMethod {
    /// Verifies a message before it is forwarded or applied.
    fn verify_cross_chain_message(
        &self,
        _ctx: &CrossChainMessageContext<'_>,
    ) -> Result<(), InteropError> {
        Ok(())
    }

    /// Runs before a cross-chain command executes.
    fn before_cross_chain_command_execute(
        &self,
        _ctx: &mut CrossChainMessageContext<'_>,
    ) -> Result<(), InteropError> {
        Ok(())
    }

    /// Runs after a cross-chain command executed, whether or not it succeeded.
    fn after_cross_chain_command_execute(
        &self,
        _ctx: &mut CrossChainMessageContext<'_>,
    ) -> Result<(), InteropError> {
        Ok(())
    }

    /// Runs before a message is forwarded to another chain.
    fn before_cross_chain_message_forwarding(
        &self,
        _ctx: &mut CrossChainMessageContext<'_>,
    ) -> Result<(), InteropError> {
        Ok(())
    }
}
