// Path: crates/services/src/interoperability/cc_commands/channel_terminated.rs

use crate::interoperability::internal::InternalMethod;
use meridian_api::context::CrossChainMessageContext;
use meridian_api::interop::CrossChainCommand;
use meridian_types::app::CROSS_CHAIN_COMMAND_CHANNEL_TERMINATED;
use meridian_types::codec::{compile_static, Schema};
use meridian_types::error::InteropError;
use once_cell::sync::Lazy;
use std::sync::Arc;

static EMPTY_PARAMS_SCHEMA: Lazy<Arc<Schema>> = Lazy::new(|| {
    compile_static(Schema::builder(
        "/modules/interoperability/ccCommand/channelTerminated",
    ))
});

/// The partner chain closed its channel with this chain; record its terminated
/// state so that funds can be recovered.
#[derive(Debug, Clone)]
pub struct ChannelTerminatedCommand {
    internal: InternalMethod,
}

impl ChannelTerminatedCommand {
    /// Creates the command.
    pub fn new(internal: InternalMethod) -> Self {
        Self { internal }
    }
}

impl CrossChainCommand for ChannelTerminatedCommand {
    fn name(&self) -> &'static str {
        CROSS_CHAIN_COMMAND_CHANNEL_TERMINATED
    }

    fn params_schema(&self) -> &'static Schema {
        &EMPTY_PARAMS_SCHEMA
    }

    fn execute(&self, ctx: &mut CrossChainMessageContext<'_>) -> Result<(), InteropError> {
        let sending = ctx.ccm.sending_chain_id;
        if self
            .internal
            .stores()
            .terminated_state
            .has(&*ctx.state, sending.as_bytes())?
        {
            return Ok(());
        }
        self.internal
            .create_terminated_state_account(&mut *ctx.state, &mut *ctx.events, &sending, None)
    }
}
