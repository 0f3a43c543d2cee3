// Path: crates/types/src/app/mod.rs
//! Core application-level data structures.
//!
//! Each structure implements [`crate::codec::SchemaObject`] against a schema that
//! is compiled once, on first use.

/// BFT vote records and BFT parameters.
pub mod bft;
/// Block headers and aggregate commits.
pub mod block;
/// Cross-chain messages, certificates, chain accounts and channels.
pub mod interop;

pub use bft::*;
pub use block::*;
pub use interop::*;
