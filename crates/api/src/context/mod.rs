// Path: crates/api/src/context/mod.rs
//! Execution contexts handed to commands and cross-chain hooks.
//!
//! Each context names exactly what the callee may touch: verification contexts
//! hold read-only state, execution contexts hold the mutable state, the event
//! queue and the per-transaction context store.

use crate::events::EventQueue;
use crate::state::{SnapshotState, StateAccess};
use meridian_types::app::{Ccm, ChainId};
use meridian_types::codec::SchemaObject;
use meridian_types::error::{CodecError, StateError};
use serde::Serialize;
use std::collections::BTreeMap;

/// The parts of the current block header commands depend on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockHeaderInfo {
    /// Height of the block being processed.
    pub height: u32,
    /// Timestamp of the block being processed.
    pub timestamp: u32,
}

/// The transaction that carries the command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionInfo {
    /// Address of the transaction sender.
    pub sender_address: Vec<u8>,
    /// Fee paid by the transaction.
    pub fee: u64,
}

/// Scratch storage shared by every module while one transaction executes.
#[derive(Debug, Clone, Default)]
pub struct ContextStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl ContextStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`.
    pub fn set(&mut self, key: &str, value: Vec<u8>) {
        self.entries.insert(key.to_string(), value);
    }

    /// The value under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Whether `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes `key`.
    pub fn remove(&mut self, key: &str) -> Option<Vec<u8>> {
        self.entries.remove(key)
    }
}

/// Outcome of a command verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyStatus {
    /// The command may be executed.
    Ok,
    /// The command must be rejected.
    Fail,
}

/// A verification outcome with an optional reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    /// The outcome.
    pub status: VerifyStatus,
    /// Why verification failed.
    pub error: Option<String>,
}

impl VerificationResult {
    /// A passing result.
    pub fn ok() -> Self {
        Self {
            status: VerifyStatus::Ok,
            error: None,
        }
    }

    /// A failing result with `reason`.
    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            status: VerifyStatus::Fail,
            error: Some(reason.into()),
        }
    }

    /// Whether the result passed.
    pub fn is_ok(&self) -> bool {
        self.status == VerifyStatus::Ok
    }
}

/// Context for verifying a command against the current state.
pub struct CommandVerifyContext<'a, P> {
    /// Read-only state.
    pub state: &'a dyn StateAccess,
    /// ID of this chain.
    pub chain_id: ChainId,
    /// The block the transaction is included in.
    pub header: BlockHeaderInfo,
    /// The carrying transaction.
    pub transaction: TransactionInfo,
    /// Decoded command parameters.
    pub params: P,
}

impl<'a, P: SchemaObject> CommandVerifyContext<'a, P> {
    /// Decodes `raw_params` and checks them against the parameter schema.
    pub fn decode(
        state: &'a dyn StateAccess,
        chain_id: ChainId,
        header: BlockHeaderInfo,
        transaction: TransactionInfo,
        raw_params: &[u8],
    ) -> Result<Self, CodecError> {
        Ok(Self {
            state,
            chain_id,
            header,
            transaction,
            params: P::decode_validated(raw_params)?,
        })
    }
}

/// Context for executing a verified command.
pub struct CommandExecuteContext<'a, P> {
    /// Mutable state with snapshot support.
    pub state: &'a mut dyn SnapshotState,
    /// Events of the current block.
    pub events: &'a mut EventQueue,
    /// Scratch storage of the current transaction.
    pub context_store: &'a mut ContextStore,
    /// ID of this chain.
    pub chain_id: ChainId,
    /// The block the transaction is included in.
    pub header: BlockHeaderInfo,
    /// The carrying transaction.
    pub transaction: TransactionInfo,
    /// Decoded command parameters.
    pub params: P,
}

impl<'a, P> CommandExecuteContext<'a, P> {
    /// Derives the context in which `ccm` is processed.
    pub fn ccm_context(&mut self, ccm: Ccm) -> CrossChainMessageContext<'_> {
        CrossChainMessageContext {
            state: &mut *self.state,
            events: &mut *self.events,
            context_store: &mut *self.context_store,
            chain_id: self.chain_id,
            header: self.header,
            transaction: self.transaction.clone(),
            ccm,
        }
    }
}

/// Paired state and event-queue markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextSnapshot {
    state: usize,
    events: usize,
}

/// Context in which one cross-chain message is verified, forwarded or applied.
pub struct CrossChainMessageContext<'a> {
    /// Mutable state with snapshot support.
    pub state: &'a mut dyn SnapshotState,
    /// Events of the current block.
    pub events: &'a mut EventQueue,
    /// Scratch storage of the current transaction.
    pub context_store: &'a mut ContextStore,
    /// ID of this chain.
    pub chain_id: ChainId,
    /// The block the message is processed in.
    pub header: BlockHeaderInfo,
    /// The cross-chain update transaction carrying the message.
    pub transaction: TransactionInfo,
    /// The message.
    pub ccm: Ccm,
}

impl CrossChainMessageContext<'_> {
    /// Marks the current state and event queue.
    pub fn snapshot(&mut self) -> ContextSnapshot {
        ContextSnapshot {
            state: self.state.snapshot(),
            events: self.events.snapshot(),
        }
    }

    /// Rolls state and events back to `snapshot`.
    pub fn restore(&mut self, snapshot: ContextSnapshot) -> Result<(), StateError> {
        self.state.restore_snapshot(snapshot.state)?;
        self.events.restore_snapshot(snapshot.events);
        Ok(())
    }
}
