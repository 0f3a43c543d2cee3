// Path: crates/services/src/interoperability/cc_commands/registration.rs

use crate::interoperability::events::emit_chain_account_updated;
use crate::interoperability::internal::InternalMethod;
use meridian_api::context::CrossChainMessageContext;
use meridian_api::interop::CrossChainCommand;
use meridian_types::app::{
    CcmStatusCode, ChainStatus, RegistrationCcmParams, CROSS_CHAIN_COMMAND_REGISTRATION,
};
use meridian_types::codec::{Schema, SchemaObject};
use meridian_types::error::InteropError;

/// Activates the channel with the sending chain. The first message a newly
/// registered chain receives from its partner.
#[derive(Debug, Clone)]
pub struct RegistrationCommand {
    internal: InternalMethod,
}

impl RegistrationCommand {
    /// Creates the command.
    pub fn new(internal: InternalMethod) -> Self {
        Self { internal }
    }
}

impl CrossChainCommand for RegistrationCommand {
    fn name(&self) -> &'static str {
        CROSS_CHAIN_COMMAND_REGISTRATION
    }

    fn params_schema(&self) -> &'static Schema {
        RegistrationCcmParams::schema()
    }

    fn verify(&self, ctx: &CrossChainMessageContext<'_>) -> Result<(), InteropError> {
        let params = RegistrationCcmParams::decode(&ctx.ccm.params)?;
        let sending = ctx.ccm.sending_chain_id;
        let channel = self
            .internal
            .stores()
            .channel
            .get(&*ctx.state, sending.as_bytes())?;
        let own = self.internal.own_chain_account(&*ctx.state)?;

        if ctx.ccm.status != u32::from(CcmStatusCode::Ok) {
            return Err(InteropError::verification(
                "Registration message must have status OK.",
            ));
        }
        if ctx.ccm.receiving_chain_id != own.chain_id {
            return Err(InteropError::verification(
                "Registration message must be sent to the chain account ID of the chain.",
            ));
        }
        if params.name != own.name {
            return Err(InteropError::verification(
                "Name in the registration message does not match the name of the own chain.",
            ));
        }
        if params.message_fee_token_id != channel.message_fee_token_id {
            return Err(InteropError::verification(
                "Registration message must contain the same message fee token ID as the channel account.",
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &mut CrossChainMessageContext<'_>) -> Result<(), InteropError> {
        let sending = ctx.ccm.sending_chain_id;
        let stores = self.internal.stores();
        let mut account = stores.chain_account.get(&*ctx.state, sending.as_bytes())?;
        if account.status != ChainStatus::Registered {
            return Ok(());
        }
        account.status = ChainStatus::Active;
        stores
            .chain_account
            .set(&mut *ctx.state, sending.as_bytes(), &account)?;
        emit_chain_account_updated(&mut *ctx.events, &sending, &account)?;
        tracing::info!(target: "interop", chain_id = %sending, "chain activated");
        Ok(())
    }
}
