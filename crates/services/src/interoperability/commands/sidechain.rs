// Path: crates/services/src/interoperability/commands/sidechain.rs
//! The sidechain cross-chain update: every message comes from the mainchain
//! and is addressed to this chain.

use crate::interoperability::commands::base::{verification_outcome, BaseCrossChainUpdateCommand};
use crate::interoperability::internal::InternalMethod;
use crate::interoperability::registry::CcmRegistry;
use meridian_api::context::{CommandExecuteContext, CommandVerifyContext, VerificationResult};
use meridian_api::interop::Command;
use meridian_types::app::{Ccm, CrossChainUpdateParams};
use meridian_types::error::InteropError;
use meridian_types::keys::CONTEXT_STORE_KEY_CCM_PROCESSING;

/// Name of the sidechain cross-chain update command.
pub const COMMAND_NAME_SUBMIT_SIDECHAIN_CCU: &str = "submitSidechainCrossChainUpdate";

/// Submits a cross-chain update from the mainchain to a sidechain.
#[derive(Debug)]
pub struct SubmitSidechainCrossChainUpdateCommand {
    base: BaseCrossChainUpdateCommand,
}

impl SubmitSidechainCrossChainUpdateCommand {
    /// Creates the command. `internal` must be a sidechain's internal method.
    pub fn new(internal: InternalMethod, registry: CcmRegistry) -> Self {
        Self {
            base: BaseCrossChainUpdateCommand::new(internal, registry),
        }
    }

    /// The shared processing steps.
    pub fn base(&self) -> &BaseCrossChainUpdateCommand {
        &self.base
    }

    fn check(&self, ctx: &CommandVerifyContext<'_, CrossChainUpdateParams>) -> Result<(), InteropError> {
        let sending = ctx.params.sending_chain_id;
        if !self
            .base
            .internal()
            .is_live(ctx.state, &sending, ctx.header.timestamp)?
        {
            return Err(InteropError::verification("The sending chain is not live."));
        }
        self.base.verify_common(ctx)
    }

    fn process(
        &self,
        ctx: &mut CommandExecuteContext<'_, CrossChainUpdateParams>,
        ccms: Vec<(Ccm, Vec<u8>)>,
    ) -> Result<(), InteropError> {
        let sending = ctx.params.sending_chain_id;
        for (ccm, ccm_bytes) in ccms {
            self.base.apply(&mut ctx.ccm_context(ccm))?;
            self.base
                .internal()
                .append_to_inbox_tree(&mut *ctx.state, &sending, &ccm_bytes)?;
        }
        Ok(())
    }
}

impl Command for SubmitSidechainCrossChainUpdateCommand {
    type Params = CrossChainUpdateParams;

    fn name(&self) -> &'static str {
        COMMAND_NAME_SUBMIT_SIDECHAIN_CCU
    }

    fn verify(
        &self,
        ctx: &CommandVerifyContext<'_, CrossChainUpdateParams>,
    ) -> Result<VerificationResult, InteropError> {
        verification_outcome(self.check(ctx))
    }

    fn execute(
        &self,
        ctx: &mut CommandExecuteContext<'_, CrossChainUpdateParams>,
    ) -> Result<(), InteropError> {
        let Some(ccms) = self.base.execute_common(ctx)? else {
            return Ok(());
        };
        ctx.context_store.set(CONTEXT_STORE_KEY_CCM_PROCESSING, vec![1]);
        let processed = self.process(ctx, ccms);
        ctx.context_store.remove(CONTEXT_STORE_KEY_CCM_PROCESSING);
        processed?;
        self.base.after_execute_common(ctx)
    }
}
