// Path: crates/state/src/tree/mod.rs
//! # Merkle Trees
//!
//! Both trees share the hashing rules: `leaf = sha256(0x00 || data)`,
//! `branch = sha256(0x01 || left || right)` and the empty tree hashes to
//! `sha256("")`.

/// The append-only regular Merkle tree.
pub mod merkle;
/// Sparse Merkle tree inclusion proofs.
pub mod sparse;

use meridian_crypto::sha256_concat;

/// Prefix of leaf preimages.
pub const LEAF_PREFIX: u8 = 0x00;
/// Prefix of branch preimages.
pub const BRANCH_PREFIX: u8 = 0x01;

/// A 32-byte tree hash.
pub type Hash = [u8; 32];

/// Hashes a leaf.
pub fn leaf_hash(data: &[u8]) -> Hash {
    sha256_concat(&[[LEAF_PREFIX].as_slice(), data])
}

/// Hashes an inner node.
pub fn branch_hash(left: &[u8], right: &[u8]) -> Hash {
    sha256_concat(&[[BRANCH_PREFIX].as_slice(), left, right])
}
