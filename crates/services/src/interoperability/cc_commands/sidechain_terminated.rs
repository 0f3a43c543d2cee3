// Path: crates/services/src/interoperability/cc_commands/sidechain_terminated.rs

use crate::interoperability::events::emit_terminated_state_created;
use crate::interoperability::internal::InternalMethod;
use meridian_api::context::CrossChainMessageContext;
use meridian_api::interop::CrossChainCommand;
use meridian_state::tree::merkle::EMPTY_HASH;
use meridian_types::app::{
    CcmStatusCode, SidechainTerminatedCcmParams, CROSS_CHAIN_COMMAND_SIDECHAIN_TERMINATED,
};
use meridian_types::codec::{Schema, SchemaObject};
use meridian_types::error::InteropError;

/// The mainchain reports that a sidechain was terminated. Completes or creates
/// the terminated state of that sidechain.
#[derive(Debug, Clone)]
pub struct SidechainTerminatedCommand {
    internal: InternalMethod,
}

impl SidechainTerminatedCommand {
    /// Creates the command.
    pub fn new(internal: InternalMethod) -> Self {
        Self { internal }
    }
}

impl CrossChainCommand for SidechainTerminatedCommand {
    fn name(&self) -> &'static str {
        CROSS_CHAIN_COMMAND_SIDECHAIN_TERMINATED
    }

    fn params_schema(&self) -> &'static Schema {
        SidechainTerminatedCcmParams::schema()
    }

    fn verify(&self, ctx: &CrossChainMessageContext<'_>) -> Result<(), InteropError> {
        if ctx.ccm.status != u32::from(CcmStatusCode::Ok) {
            return Err(InteropError::verification(
                "Sidechain terminated message must have status OK.",
            ));
        }
        // Only the mainchain may report terminations to a sidechain.
        if !self.internal.is_mainchain()
            && ctx.ccm.sending_chain_id != ctx.chain_id.mainchain_id()
        {
            return Err(InteropError::verification(
                "Sidechain terminated message must be sent from the mainchain.",
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &mut CrossChainMessageContext<'_>) -> Result<(), InteropError> {
        let params = SidechainTerminatedCcmParams::decode(&ctx.ccm.params)?;
        let chain_id = params.chain_id;
        let store = &self.internal.stores().terminated_state;

        match store.get_opt(&*ctx.state, chain_id.as_bytes())? {
            Some(terminated) if terminated.initialized => Ok(()),
            Some(mut terminated) => {
                terminated.state_root = params.state_root;
                terminated.mainchain_state_root = EMPTY_HASH.to_vec();
                terminated.initialized = true;
                store.set(&mut *ctx.state, chain_id.as_bytes(), &terminated)?;
                emit_terminated_state_created(&mut *ctx.events, &chain_id, &terminated)?;
                Ok(())
            }
            None => self.internal.create_terminated_state_account(
                &mut *ctx.state,
                &mut *ctx.events,
                &chain_id,
                Some(params.state_root),
            ),
        }
    }
}
