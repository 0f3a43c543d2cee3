// Path: crates/services/src/interoperability/commands/mainchain.rs
//! The mainchain cross-chain update: messages addressed to the mainchain are
//! applied, all others are forwarded to their receiving sidechain.

use crate::interoperability::commands::base::{verification_outcome, BaseCrossChainUpdateCommand};
use crate::interoperability::internal::{InternalMethod, OutgoingCcm};
use crate::interoperability::registry::CcmRegistry;
use meridian_api::context::{
    CommandExecuteContext, CommandVerifyContext, CrossChainMessageContext, VerificationResult,
};
use meridian_api::interop::Command;
use meridian_crypto::sha256;
use meridian_types::app::{
    Ccm, CcmProcessedCode, CcmProcessedResult, CcmStatusCode, Certificate, ChainStatus,
    CrossChainUpdateParams, SidechainTerminatedCcmParams, CROSS_CHAIN_COMMAND_SIDECHAIN_TERMINATED,
};
use meridian_types::codec::SchemaObject;
use meridian_types::error::InteropError;
use meridian_types::keys::{CONTEXT_STORE_KEY_CCM_PROCESSING, MODULE_NAME_INTEROPERABILITY};

/// Name of the mainchain cross-chain update command.
pub const COMMAND_NAME_SUBMIT_MAINCHAIN_CCU: &str = "submitMainchainCrossChainUpdate";

/// Submits a cross-chain update from a sidechain to the mainchain.
#[derive(Debug)]
pub struct SubmitMainchainCrossChainUpdateCommand {
    base: BaseCrossChainUpdateCommand,
}

impl SubmitMainchainCrossChainUpdateCommand {
    /// Creates the command. `internal` must be the mainchain's internal method.
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
        let internal = self.base.internal();
        let sending = ctx.params.sending_chain_id;
        if !internal.is_live(ctx.state, &sending, ctx.header.timestamp)? {
            return Err(InteropError::verification("The sending chain is not live."));
        }
        let account = internal
            .stores()
            .chain_account
            .get(ctx.state, sending.as_bytes())?;
        if account.status == ChainStatus::Registered {
            self.verify_liveness_condition_for_registered_chains(ctx)?;
        }
        self.base.verify_common(ctx)
    }

    /// A registered chain activated by an update with messages must present a
    /// certificate from the first half of the liveness window.
    fn verify_liveness_condition_for_registered_chains(
        &self,
        ctx: &CommandVerifyContext<'_, CrossChainUpdateParams>,
    ) -> Result<(), InteropError> {
        if ctx.params.certificate.is_empty() || ctx.params.inbox_update.is_empty() {
            return Ok(());
        }
        let certificate = Certificate::decode_validated(&ctx.params.certificate)?;
        let limit = self.base.internal().config().liveness_limit / 2;
        if ctx.header.timestamp.saturating_sub(certificate.timestamp) > limit {
            return Err(InteropError::verification(format!(
                "The first CCU with a non-empty inbox update cannot contain a certificate older than {limit} seconds."
            )));
        }
        Ok(())
    }

    fn process(
        &self,
        ctx: &mut CommandExecuteContext<'_, CrossChainUpdateParams>,
        ccms: Vec<(Ccm, Vec<u8>)>,
    ) -> Result<(), InteropError> {
        let sending = ctx.params.sending_chain_id;
        let mainchain = ctx.chain_id.mainchain_id();
        for (ccm, ccm_bytes) in ccms {
            let to_mainchain = ccm.receiving_chain_id == mainchain;
            {
                let mut ccm_ctx = ctx.ccm_context(ccm);
                if to_mainchain {
                    self.base.apply(&mut ccm_ctx)?;
                } else {
                    self.forward(&mut ccm_ctx)?;
                }
            }
            self.base
                .internal()
                .append_to_inbox_tree(&mut *ctx.state, &sending, &ccm_bytes)?;
        }
        Ok(())
    }

    /// Forwards a message to its receiving sidechain.
    ///
    /// Unknown or not yet active receivers bounce the message. A receiver that
    /// is no longer live is terminated and the sender is told so.
    fn forward(&self, ctx: &mut CrossChainMessageContext<'_>) -> Result<(), InteropError> {
        let internal = self.base.internal();
        let encoded = ctx.ccm.encode()?;
        let ccm_id = sha256(&encoded).to_vec();
        if !self.base.verify_ccm(ctx, &ccm_id)? {
            return Ok(());
        }

        let sending = ctx.ccm.sending_chain_id;
        let receiving = ctx.ccm.receiving_chain_id;
        let account = match internal
            .stores()
            .chain_account
            .get_opt(&*ctx.state, receiving.as_bytes())?
        {
            Some(account) if account.status != ChainStatus::Registered => account,
            _ => {
                return self.base.bounce(
                    ctx,
                    &ccm_id,
                    encoded.len(),
                    CcmStatusCode::ChannelUnavailable,
                    CcmProcessedCode::ChannelUnavailable,
                )
            }
        };

        if !internal.is_live(&*ctx.state, &receiving, ctx.header.timestamp)? {
            internal.terminate_chain_internal(&mut *ctx.state, &mut *ctx.events, &receiving)?;
            self.base.emit_processed(
                ctx,
                &ccm_id,
                CcmProcessedResult::Discarded,
                CcmProcessedCode::ChannelUnavailable,
            )?;
            let params = SidechainTerminatedCcmParams {
                chain_id: receiving,
                state_root: account.last_certificate.state_root,
            };
            internal.send_internal(
                &mut *ctx.state,
                &mut *ctx.events,
                OutgoingCcm {
                    module: MODULE_NAME_INTEROPERABILITY.to_string(),
                    cross_chain_command: CROSS_CHAIN_COMMAND_SIDECHAIN_TERMINATED.to_string(),
                    receiving_chain_id: sending,
                    fee: 0,
                    status: CcmStatusCode::Ok,
                    params: params.encode()?,
                },
            )?;
            return Ok(());
        }

        let before_hooks = ctx.snapshot();
        if let Err(err) = self.base.registry().before_cross_chain_message_forwarding(ctx) {
            tracing::warn!(
                target: "interop",
                ccm_id = %hex::encode(&ccm_id),
                error = %err,
                "forwarding hook failed"
            );
            ctx.restore(before_hooks)?;
            return self.base.terminate_and_discard(
                ctx,
                &ccm_id,
                CcmProcessedCode::InvalidCcmBeforeCccForwardingException,
            );
        }

        internal.add_to_outbox(&mut *ctx.state, &receiving, &ctx.ccm)?;
        self.base.emit_processed(
            ctx,
            &ccm_id,
            CcmProcessedResult::Forwarded,
            CcmProcessedCode::Success,
        )
    }
}

impl Command for SubmitMainchainCrossChainUpdateCommand {
    type Params = CrossChainUpdateParams;

    fn name(&self) -> &'static str {
        COMMAND_NAME_SUBMIT_MAINCHAIN_CCU
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
        tracing::debug!(
            target: "interop",
            sending_chain_id = %ctx.params.sending_chain_id,
            ccms = ccms.len(),
            "processing cross-chain update"
        );

        ctx.context_store.set(CONTEXT_STORE_KEY_CCM_PROCESSING, vec![1]);
        let processed = self.process(ctx, ccms);
        ctx.context_store.remove(CONTEXT_STORE_KEY_CCM_PROCESSING);
        processed?;
        self.base.after_execute_common(ctx)
    }
}
