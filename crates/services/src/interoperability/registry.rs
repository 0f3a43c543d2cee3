// Path: crates/services/src/interoperability/registry.rs

use meridian_api::context::CrossChainMessageContext;
use meridian_api::interop::{CrossChainCommand, InteroperableMethod};
use meridian_types::error::InteropError;
use std::collections::BTreeMap;
use std::fmt;

/// The modules taking part in cross-chain message processing: their hooks, run
/// in registration order, and their cross-chain commands, looked up by
/// `ccm.module` and `ccm.cross_chain_command`.
#[derive(Default)]
pub struct CcmRegistry {
    methods: Vec<(String, Box<dyn InteroperableMethod>)>,
    commands: BTreeMap<String, Vec<Box<dyn CrossChainCommand>>>,
}

impl fmt::Debug for CcmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let commands: BTreeMap<&str, Vec<&str>> = self
            .commands
            .iter()
            .map(|(module, commands)| (module.as_str(), commands.iter().map(|c| c.name()).collect()))
            .collect();
        f.debug_struct("CcmRegistry")
            .field(
                "methods",
                &self.methods.iter().map(|(m, _)| m.as_str()).collect::<Vec<_>>(),
            )
            .field("commands", &commands)
            .finish()
    }
}

impl CcmRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the hooks of `module`, replacing earlier ones in place.
    pub fn register_method(&mut self, module: &str, method: Box<dyn InteroperableMethod>) {
        tracing::debug!(target: "interop", module, "registering interoperable method");
        match self.methods.iter_mut().find(|(name, _)| name == module) {
            Some(entry) => entry.1 = method,
            None => self.methods.push((module.to_string(), method)),
        }
    }

    /// Registers a cross-chain command of `module`, replacing one of the same name.
    pub fn register_command(&mut self, module: &str, command: Box<dyn CrossChainCommand>) {
        tracing::debug!(
            target: "interop",
            module,
            command = command.name(),
            "registering cross-chain command"
        );
        let commands = self.commands.entry(module.to_string()).or_default();
        commands.retain(|c| c.name() != command.name());
        commands.push(command);
    }

    /// The cross-chain commands of `module`, if it registered any.
    pub fn commands(&self, module: &str) -> Option<&[Box<dyn CrossChainCommand>]> {
        self.commands.get(module).map(Vec::as_slice)
    }

    /// Runs every `verify_cross_chain_message` hook.
    pub fn verify_cross_chain_message(
        &self,
        ctx: &CrossChainMessageContext<'_>,
    ) -> Result<(), InteropError> {
        for (module, method) in &self.methods {
            method
                .verify_cross_chain_message(ctx)
                .map_err(|err| hook_error(module, "verifyCrossChainMessage", err))?;
        }
        Ok(())
    }

    /// Runs every `before_cross_chain_command_execute` hook.
    pub fn before_cross_chain_command_execute(
        &self,
        ctx: &mut CrossChainMessageContext<'_>,
    ) -> Result<(), InteropError> {
        for (module, method) in &self.methods {
            method
                .before_cross_chain_command_execute(ctx)
                .map_err(|err| hook_error(module, "beforeCrossChainCommandExecute", err))?;
        }
        Ok(())
    }

    /// Runs every `after_cross_chain_command_execute` hook.
    pub fn after_cross_chain_command_execute(
        &self,
        ctx: &mut CrossChainMessageContext<'_>,
    ) -> Result<(), InteropError> {
        for (module, method) in &self.methods {
            method
                .after_cross_chain_command_execute(ctx)
                .map_err(|err| hook_error(module, "afterCrossChainCommandExecute", err))?;
        }
        Ok(())
    }

    /// Runs every `before_cross_chain_message_forwarding` hook.
    pub fn before_cross_chain_message_forwarding(
        &self,
        ctx: &mut CrossChainMessageContext<'_>,
    ) -> Result<(), InteropError> {
        for (module, method) in &self.methods {
            method
                .before_cross_chain_message_forwarding(ctx)
                .map_err(|err| hook_error(module, "beforeCrossChainMessageForwarding", err))?;
        }
        Ok(())
    }
}

fn hook_error(module: &str, hook: &str, err: InteropError) -> InteropError {
    InteropError::Hook(format!("{module}.{hook}: {err}"))
}
