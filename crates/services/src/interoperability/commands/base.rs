// Path: crates/services/src/interoperability/commands/base.rs
//! Processing shared by the mainchain and sidechain cross-chain update commands.

use crate::interoperability::events::{
    emit_ccm_processed, emit_ccm_send_success, CcmProcessedEventData,
};
use crate::interoperability::internal::InternalMethod;
use crate::interoperability::registry::CcmRegistry;
use crate::interoperability::compute_ccm_id;
use meridian_api::context::{
    CommandExecuteContext, CommandVerifyContext, CrossChainMessageContext, VerificationResult,
};
use meridian_crypto::sha256;
use meridian_types::app::{
    Ccm, CcmProcessedCode, CcmProcessedResult, CcmStatusCode, ChainId, ChainStatus,
    CrossChainUpdateParams,
};
use meridian_types::codec::{decode, validate, SchemaObject};
use meridian_types::error::InteropError;

/// Maps the outcome of a verification to a [`VerificationResult`]. Only
/// state failures other than missing entries abort verification.
pub(crate) fn verification_outcome(
    outcome: Result<(), InteropError>,
) -> Result<VerificationResult, InteropError> {
    match outcome {
        Ok(()) => Ok(VerificationResult::ok()),
        Err(InteropError::State(err)) if !err.is_not_found() => Err(InteropError::State(err)),
        Err(err) => Ok(VerificationResult::fail(err.to_string())),
    }
}

/// The verification and message processing steps both cross-chain update
/// commands are built from.
#[derive(Debug)]
pub struct BaseCrossChainUpdateCommand {
    internal: InternalMethod,
    registry: CcmRegistry,
}

impl BaseCrossChainUpdateCommand {
    /// Creates the base over `internal`, dispatching messages through `registry`.
    pub fn new(internal: InternalMethod, registry: CcmRegistry) -> Self {
        Self { internal, registry }
    }

    /// The internal method.
    pub fn internal(&self) -> &InternalMethod {
        &self.internal
    }

    /// The module registry.
    pub fn registry(&self) -> &CcmRegistry {
        &self.registry
    }

    /// Checks a cross-chain update against the sending chain's account,
    /// signers and channel.
    pub fn verify_common(
        &self,
        ctx: &CommandVerifyContext<'_, CrossChainUpdateParams>,
    ) -> Result<(), InteropError> {
        let params = &ctx.params;
        let sending = params.sending_chain_id;
        let account = self
            .internal
            .stores()
            .chain_account
            .get(ctx.state, sending.as_bytes())?;
        match account.status {
            ChainStatus::Terminated => {
                return Err(InteropError::verification("Sending chain is terminated."))
            }
            ChainStatus::Registered if params.certificate.is_empty() => {
                return Err(InteropError::verification(
                    "The first CCU must contain a non-empty certificate.",
                ))
            }
            _ => {}
        }

        if !params.certificate.is_empty() {
            self.internal
                .verify_certificate(ctx.state, params, ctx.header.timestamp)?;
        }
        if self.internal.has_validators_update(ctx.state, params)? {
            self.internal.verify_validators_update(ctx.state, params)?;
        }

        for ccm_bytes in &params.inbox_update.cross_chain_messages {
            let ccm = Ccm::decode_validated(ccm_bytes)?;
            self.internal.validate_ccm_format(&ccm)?;
            if ccm.sending_chain_id != sending {
                return Err(InteropError::verification("CCM is not from the sending chain."));
            }
            if ccm.sending_chain_id == ccm.receiving_chain_id {
                return Err(InteropError::verification(
                    "Sending and receiving chains must differ.",
                ));
            }
        }

        if !params.inbox_update.is_empty() {
            self.internal.verify_partner_chain_outbox_root(ctx.state, params)?;
        }
        Ok(())
    }

    fn decode_ccm(&self, ccm_bytes: &[u8], own_chain_id: &ChainId) -> Result<Ccm, InteropError> {
        let ccm = Ccm::decode_validated(ccm_bytes)?;
        self.internal.validate_ccm_format(&ccm)?;
        if !self.internal.is_mainchain() && ccm.receiving_chain_id != *own_chain_id {
            return Err(InteropError::verification(
                "Cannot receive forwarded messages for a different chain.",
            ));
        }
        Ok(ccm)
    }

    /// Decodes the messages of a verified update and applies its certificate
    /// and validators update.
    ///
    /// A message that fails to decode terminates the sending chain; `None` is
    /// returned and no message is processed.
    pub fn execute_common(
        &self,
        ctx: &mut CommandExecuteContext<'_, CrossChainUpdateParams>,
    ) -> Result<Option<Vec<(Ccm, Vec<u8>)>>, InteropError> {
        let sending = ctx.params.sending_chain_id;
        let mut ccms = Vec::with_capacity(ctx.params.inbox_update.cross_chain_messages.len());
        for ccm_bytes in &ctx.params.inbox_update.cross_chain_messages {
            match self.decode_ccm(ccm_bytes, &ctx.chain_id) {
                Ok(ccm) => ccms.push((ccm, ccm_bytes.clone())),
                Err(err) => {
                    tracing::warn!(
                        target: "interop",
                        sending_chain_id = %sending,
                        error = %err,
                        "invalid ccm in cross-chain update"
                    );
                    let data = CcmProcessedEventData {
                        ccm_id: sha256(ccm_bytes).to_vec(),
                        result: CcmProcessedResult::Discarded,
                        code: CcmProcessedCode::InvalidCcmValidationException,
                    };
                    self.internal
                        .terminate_chain_internal(&mut *ctx.state, &mut *ctx.events, &sending)?;
                    emit_ccm_processed(&mut *ctx.events, &sending, &ctx.chain_id, &data)?;
                    return Ok(None);
                }
            }
        }

        if self.internal.has_validators_update(&*ctx.state, &ctx.params)? {
            self.internal.update_validators(&mut *ctx.state, &ctx.params)?;
        }
        if !ctx.params.certificate.is_empty() {
            self.internal.update_certificate(
                &mut *ctx.state,
                &mut *ctx.events,
                &sending,
                &ctx.params.certificate,
            )?;
        }
        Ok(Some(ccms))
    }

    /// Records the partner chain's outbox root once the delivered messages are
    /// in the inbox.
    pub fn after_execute_common(
        &self,
        ctx: &mut CommandExecuteContext<'_, CrossChainUpdateParams>,
    ) -> Result<(), InteropError> {
        if ctx.params.inbox_update.is_empty() {
            return Ok(());
        }
        self.internal.update_partner_chain_outbox_root(
            &mut *ctx.state,
            &ctx.params.sending_chain_id,
            &ctx.params.inbox_update.message_witness_hashes,
        )
    }

    /// Emits the outcome of the message in `ctx`.
    pub(crate) fn emit_processed(
        &self,
        ctx: &mut CrossChainMessageContext<'_>,
        ccm_id: &[u8],
        result: CcmProcessedResult,
        code: CcmProcessedCode,
    ) -> Result<(), InteropError> {
        let data = CcmProcessedEventData {
            ccm_id: ccm_id.to_vec(),
            result,
            code,
        };
        emit_ccm_processed(
            &mut *ctx.events,
            &ctx.ccm.sending_chain_id,
            &ctx.ccm.receiving_chain_id,
            &data,
        )?;
        Ok(())
    }

    /// Terminates the sending chain of the message in `ctx` and discards the message.
    pub(crate) fn terminate_and_discard(
        &self,
        ctx: &mut CrossChainMessageContext<'_>,
        ccm_id: &[u8],
        code: CcmProcessedCode,
    ) -> Result<(), InteropError> {
        let sending = ctx.ccm.sending_chain_id;
        self.internal
            .terminate_chain_internal(&mut *ctx.state, &mut *ctx.events, &sending)?;
        self.emit_processed(ctx, ccm_id, CcmProcessedResult::Discarded, code)
    }

    /// Checks that the message in `ctx` may be processed: its sending chain is
    /// live, it is well formed and every module accepts it. On failure the
    /// sending chain is terminated, the message discarded and `false` returned.
    pub fn verify_ccm(
        &self,
        ctx: &mut CrossChainMessageContext<'_>,
        ccm_id: &[u8],
    ) -> Result<bool, InteropError> {
        let sending = ctx.ccm.sending_chain_id;
        let outcome = if self
            .internal
            .is_live(&*ctx.state, &sending, ctx.header.timestamp)?
        {
            self.internal
                .validate_ccm_format(&ctx.ccm)
                .and_then(|()| self.registry.verify_cross_chain_message(&*ctx))
        } else {
            Err(InteropError::verification(format!(
                "Sending chain {sending} is not live."
            )))
        };

        match outcome {
            Ok(()) => Ok(true),
            Err(err) => {
                tracing::warn!(
                    target: "interop",
                    ccm_id = %hex::encode(ccm_id),
                    error = %err,
                    "ccm failed verification"
                );
                self.terminate_and_discard(ctx, ccm_id, CcmProcessedCode::InvalidCcmVerifyCcmException)?;
                Ok(false)
            }
        }
    }

    /// Applies a message addressed to this chain through the cross-chain
    /// command it names.
    ///
    /// Hook failures roll back every change made for the message and terminate
    /// the sending chain. A failing command only rolls back its own changes and
    /// bounces the message.
    pub fn apply(&self, ctx: &mut CrossChainMessageContext<'_>) -> Result<(), InteropError> {
        let encoded = ctx.ccm.encode()?;
        let ccm_id = sha256(&encoded).to_vec();
        if !self.verify_ccm(ctx, &ccm_id)? {
            return Ok(());
        }

        let Some(commands) = self.registry.commands(&ctx.ccm.module) else {
            return self.bounce(
                ctx,
                &ccm_id,
                encoded.len(),
                CcmStatusCode::ModuleNotSupported,
                CcmProcessedCode::ModuleNotSupported,
            );
        };
        let Some(command) = commands
            .iter()
            .find(|c| c.name() == ctx.ccm.cross_chain_command)
        else {
            return self.bounce(
                ctx,
                &ccm_id,
                encoded.len(),
                CcmStatusCode::CrossChainCommandNotSupported,
                CcmProcessedCode::CrossChainCommandNotSupported,
            );
        };

        let schema = command.params_schema();
        let verified = decode(schema, &ctx.ccm.params)
            .and_then(|params| validate(schema, &params))
            .map_err(InteropError::from)
            .and_then(|()| command.verify(&*ctx));
        if let Err(err) = verified {
            tracing::warn!(
                target: "interop",
                ccm_id = %hex::encode(&ccm_id),
                command = command.name(),
                error = %err,
                "cross-chain command rejected ccm"
            );
            return self.terminate_and_discard(ctx, &ccm_id, CcmProcessedCode::InvalidCcmVerifyException);
        }

        let before_hooks = ctx.snapshot();
        if let Err(err) = self.registry.before_cross_chain_command_execute(ctx) {
            tracing::warn!(target: "interop", ccm_id = %hex::encode(&ccm_id), error = %err, "hook failed");
            ctx.restore(before_hooks)?;
            return self.terminate_and_discard(
                ctx,
                &ccm_id,
                CcmProcessedCode::InvalidCcmBeforeCccExecutionException,
            );
        }

        let before_command = ctx.snapshot();
        match command.execute(ctx) {
            Ok(()) => self.emit_processed(
                ctx,
                &ccm_id,
                CcmProcessedResult::Applied,
                CcmProcessedCode::Success,
            )?,
            Err(err) => {
                tracing::warn!(
                    target: "interop",
                    ccm_id = %hex::encode(&ccm_id),
                    command = command.name(),
                    error = %err,
                    "cross-chain command failed"
                );
                ctx.restore(before_command)?;
                self.bounce(
                    ctx,
                    &ccm_id,
                    encoded.len(),
                    CcmStatusCode::FailedCcm,
                    CcmProcessedCode::FailedCcm,
                )?;
            }
        }

        if let Err(err) = self.registry.after_cross_chain_command_execute(ctx) {
            tracing::warn!(target: "interop", ccm_id = %hex::encode(&ccm_id), error = %err, "hook failed");
            ctx.restore(before_hooks)?;
            return self.terminate_and_discard(
                ctx,
                &ccm_id,
                CcmProcessedCode::InvalidCcmAfterCccExecutionException,
            );
        }
        Ok(())
    }

    /// Returns the message in `ctx` to its sender with `status`, or discards it
    /// when it is itself an error response or its fee cannot pay for the return.
    pub fn bounce(
        &self,
        ctx: &mut CrossChainMessageContext<'_>,
        ccm_id: &[u8],
        ccm_size: usize,
        status: CcmStatusCode,
        code: CcmProcessedCode,
    ) -> Result<(), InteropError> {
        let size = u64::try_from(ccm_size).unwrap_or(u64::MAX);
        let minimum_fee = self
            .internal
            .config()
            .min_return_fee_per_byte
            .saturating_mul(size);
        if ctx.ccm.status != u32::from(CcmStatusCode::Ok) || ctx.ccm.fee < minimum_fee {
            return self.emit_processed(ctx, ccm_id, CcmProcessedResult::Discarded, code);
        }
        self.emit_processed(ctx, ccm_id, CcmProcessedResult::Bounced, code)?;

        let bounced = Ccm {
            status: status.into(),
            sending_chain_id: ctx.ccm.receiving_chain_id,
            receiving_chain_id: ctx.ccm.sending_chain_id,
            fee: 0,
            ..ctx.ccm.clone()
        };
        let receiving = bounced.receiving_chain_id;
        let partner = if !self.internal.is_mainchain()
            && !self
                .internal
                .stores()
                .chain_account
                .has(&*ctx.state, receiving.as_bytes())?
        {
            self.internal.get_mainchain_id(&receiving)
        } else {
            receiving
        };
        self.internal.add_to_outbox(&mut *ctx.state, &partner, &bounced)?;
        emit_ccm_send_success(&mut *ctx.events, &compute_ccm_id(&bounced)?, &bounced)?;
        tracing::warn!(
            target: "interop",
            ccm_id = %hex::encode(ccm_id),
            status = ?status,
            "ccm bounced"
        );
        Ok(())
    }
}
