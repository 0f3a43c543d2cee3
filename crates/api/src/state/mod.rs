// Path: crates/api/src/state/mod.rs
//! Core traits for state management.
//!
//! This module defines the interfaces every state backend offers to the modules:
//! - `StateAccess`: ordered key-value operations, including prefix and range scans.
//! - `SnapshotState`: cheap snapshot markers that a failed hook or command can be
//!   rolled back to.
//! - `ModuleStore`: a typed view of one substore of a module.

use meridian_types::error::StateError;
use std::sync::Arc;

// --- Type Aliases for common state patterns ---
/// An atomically reference-counted, owned key slice.
pub type StateKey = Arc<[u8]>;
/// An atomically reference-counted, owned value slice.
pub type StateVal = Arc<[u8]>;
/// An owned key-value pair from the state, using cheap-to-clone Arcs.
pub type StateKVPair = (StateKey, StateVal);
/// A streaming iterator over key-value pairs from the state, in ascending key order.
pub type StateScanIter<'a> = Box<dyn Iterator<Item = Result<StateKVPair, StateError>> + 'a>;

mod accessor;
mod store;

pub use accessor::*;
pub use store::*;

/// Calculates the smallest byte vector that is strictly greater than all keys
/// starting with the given prefix. Returns None if the prefix is all 0xFF bytes.
pub fn next_prefix(prefix: &[u8]) -> Option<Vec<u8>> {
    if prefix.is_empty() {
        return None;
    }
    let mut ub = prefix.to_vec();
    for i in (0..ub.len()).rev() {
        if let Some(byte) = ub.get_mut(i) {
            if *byte != 0xFF {
                *byte += 1;
                ub.truncate(i + 1);
                return Some(ub);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests;
