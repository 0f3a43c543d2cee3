// Path: crates/state/src/tree/sparse/mod.rs
//! Inclusion proofs against a sparse Merkle tree.
//!
//! A leaf commits to `key || value` and sits at the shallowest height that
//! separates its key from every other key. A proof for it is a bitmap with one
//! bit per level, deepest level first, telling whether the sibling at that
//! level is taken from the sibling list or is the empty hash.

use super::{branch_hash, leaf_hash, merkle::EMPTY_HASH, Hash};
use meridian_types::error::ProofError;

/// A single key-value pair claimed to be in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseMerkleQuery {
    /// The leaf key.
    pub key: Vec<u8>,
    /// The leaf value.
    pub value: Vec<u8>,
    /// Which levels carry a non-empty sibling.
    pub bitmap: Vec<u8>,
}

/// Expands `bitmap` into bits, most significant first, dropping leading zeros.
fn binary_expansion(bitmap: &[u8]) -> Vec<bool> {
    let bits = bitmap
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |i| byte & (1 << i) != 0));
    bits.skip_while(|bit| !bit).collect()
}

/// Bit `index` of `key`, counting from the most significant bit of the first byte.
fn key_bit(key: &[u8], index: usize) -> bool {
    key.get(index / 8)
        .is_some_and(|byte| byte & (0x80 >> (index % 8)) != 0)
}

/// Recomputes the root implied by `query` and `sibling_hashes`.
pub fn compute_root(query: &SparseMerkleQuery, sibling_hashes: &[Vec<u8>]) -> Result<Hash, ProofError> {
    let bits = binary_expansion(&query.bitmap);
    if bits.len() > query.key.len() * 8 {
        return Err(ProofError::Malformed(format!(
            "bitmap height {} exceeds key length {}",
            bits.len(),
            query.key.len()
        )));
    }

    let mut current = leaf_hash(&[query.key.as_slice(), query.value.as_slice()].concat());
    let mut siblings = sibling_hashes.iter();
    let mut height = bits.len();
    for has_sibling in bits {
        let sibling = if has_sibling {
            let sibling = siblings
                .next()
                .ok_or_else(|| ProofError::Malformed("missing sibling hash".into()))?;
            Hash::try_from(sibling.as_slice()).map_err(|_| ProofError::InvalidHashLength {
                expected: 32,
                got: sibling.len(),
            })?
        } else {
            EMPTY_HASH
        };
        height -= 1;
        current = if key_bit(&query.key, height) {
            branch_hash(&sibling, &current)
        } else {
            branch_hash(&current, &sibling)
        };
    }
    if siblings.next().is_some() {
        return Err(ProofError::Malformed("unused sibling hashes".into()));
    }
    Ok(current)
}

/// Checks that `query` is included in the tree with root `root`.
pub fn verify_inclusion(
    root: &[u8],
    query: &SparseMerkleQuery,
    sibling_hashes: &[Vec<u8>],
) -> Result<bool, ProofError> {
    Ok(compute_root(query, sibling_hashes)?.as_slice() == root)
}
