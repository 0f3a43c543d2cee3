// Path: crates/state/src/lib.rs
//! # Meridian Kernel State Crate Lints
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
        clippy::indexing_slicing
    )
)]
#![deny(missing_docs)]
//! # Meridian Kernel State
//!
//! An in-memory, journaled implementation of the `StateAccess` and
//! `SnapshotState` traits, and the two Merkle trees the interoperability
//! protocol proves against: the append-only message tree behind channel
//! inboxes and outboxes, and the sparse Merkle tree behind state roots.

/// The in-memory journaled state store.
pub mod store;
/// Merkle trees and proof verification.
pub mod tree;

/// A prelude for easily importing the most common types.
pub mod prelude {
    pub use crate::store::InMemoryState;
    pub use crate::tree::merkle::{
        calculate_root_from_right_witness, MerkleAppend, EMPTY_HASH,
    };
    pub use crate::tree::sparse::{verify_inclusion, SparseMerkleQuery};
}
