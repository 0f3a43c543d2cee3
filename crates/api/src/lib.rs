// Path: crates/api/src/lib.rs

//! # Meridian Kernel API Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
#![deny(missing_docs)]
//! # Meridian Kernel API
//!
//! Core traits and interfaces for the Meridian kernel. This crate defines the
//! stable contract between the state backend, the consensus layer and the
//! modules: how state is read and written, how changes are rolled back, how
//! events are collected and how cross-chain commands and hooks plug in.

/// Execution contexts handed to commands and cross-chain hooks.
pub mod context;
/// Re-exports all core error types from the central `meridian-types` crate.
pub mod error;
/// The per-block event queue.
pub mod events;
/// Traits for commands, cross-chain commands and interoperable module hooks.
pub mod interop;
/// Core traits for state access, snapshots and typed module stores.
pub mod state;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::context::{
        BlockHeaderInfo, CommandExecuteContext, CommandVerifyContext, ContextStore,
        CrossChainMessageContext, TransactionInfo, VerificationResult, VerifyStatus,
    };
    pub use crate::error::{ErrorCode, InteropError, StateError};
    pub use crate::events::{Event, EventQueue};
    pub use crate::interop::{Command, CrossChainCommand, InteroperableMethod};
    pub use crate::state::{ModuleStore, SnapshotState, StateAccess};
}
