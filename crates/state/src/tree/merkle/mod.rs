// Path: crates/state/src/tree/merkle/mod.rs
//! The append-only regular Merkle tree.
//!
//! A tree over `n` leaves is split into a perfect left subtree over the largest
//! power of two below `n` and a right subtree over the rest. Its state is kept
//! compact as an append path: the roots of the perfect subtrees matching the set
//! bits of `n`, smallest first.
//!
//! A right witness lets a holder of the append path for `n` leaves compute the
//! root of a larger tree without knowing its size: it lists, bottom up, the
//! right siblings on the path from leaf `n - 1` to the root.

use super::{branch_hash, leaf_hash, Hash};
use meridian_types::error::ProofError;

/// Root of the empty tree, `sha256("")`.
pub const EMPTY_HASH: Hash = [
    0xe3, 0xb0, 0xc4, 0x42, 0x98, 0xfc, 0x1c, 0x14, 0x9a, 0xfb, 0xf4, 0xc8, 0x99, 0x6f, 0xb9, 0x24,
    0x27, 0xae, 0x41, 0xe4, 0x64, 0x9b, 0x93, 0x4c, 0xa4, 0x95, 0x99, 0x1b, 0x78, 0x52, 0xb8, 0x55,
];

/// The tree state after an append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleAppend {
    /// New append path.
    pub append_path: Vec<Vec<u8>>,
    /// New number of leaves.
    pub size: u32,
    /// New root.
    pub root: Hash,
}

fn to_hash(bytes: &[u8]) -> Result<Hash, ProofError> {
    Hash::try_from(bytes).map_err(|_| ProofError::InvalidHashLength {
        expected: 32,
        got: bytes.len(),
    })
}

fn check_append_path(append_path: &[Vec<u8>], size: u32) -> Result<(), ProofError> {
    if append_path.len() != size.count_ones() as usize {
        return Err(ProofError::Malformed(format!(
            "append path of length {} for tree of size {size}",
            append_path.len()
        )));
    }
    append_path.iter().try_for_each(|h| to_hash(h).map(|_| ()))
}

/// Root of the tree described by `append_path`.
pub fn root_from_append_path(append_path: &[Vec<u8>]) -> Result<Hash, ProofError> {
    let Some((smallest, larger)) = append_path.split_first() else {
        return Ok(EMPTY_HASH);
    };
    let mut root = to_hash(smallest)?;
    for subtree in larger {
        root = branch_hash(subtree, &root);
    }
    Ok(root)
}

/// Appends the leaf `value` to the tree described by `append_path` and `size`.
pub fn calculate_merkle_root(
    value: &[u8],
    append_path: &[Vec<u8>],
    size: u32,
) -> Result<MerkleAppend, ProofError> {
    check_append_path(append_path, size)?;
    let new_size = size
        .checked_add(1)
        .ok_or_else(|| ProofError::Malformed("tree is full".into()))?;

    let mut current = leaf_hash(value);
    let mut merged = 0;
    // Each trailing one bit of `size` is a subtree of the same height as `current`.
    while (size >> merged) & 1 == 1 {
        let sibling = append_path
            .get(merged)
            .ok_or_else(|| ProofError::Malformed("append path too short".into()))?;
        current = branch_hash(sibling, &current);
        merged += 1;
    }

    let append_path: Vec<Vec<u8>> = std::iter::once(current.to_vec())
        .chain(append_path.iter().skip(merged).cloned())
        .collect();
    let root = root_from_append_path(&append_path)?;
    Ok(MerkleAppend {
        append_path,
        size: new_size,
        root,
    })
}

/// Computes the root of a tree whose first `size` leaves are summarised by
/// `append_path` and whose remaining leaves are summarised by `right_witness`.
pub fn calculate_root_from_right_witness(
    size: u32,
    append_path: &[Vec<u8>],
    right_witness: &[Vec<u8>],
) -> Result<Hash, ProofError> {
    check_append_path(append_path, size)?;
    let witness: Vec<Hash> = right_witness
        .iter()
        .map(|h| to_hash(h))
        .collect::<Result<_, _>>()?;
    let mut witness = witness.iter();

    let Some((first, rest)) = append_path.split_first() else {
        let Some(first) = witness.next() else {
            return Ok(EMPTY_HASH);
        };
        return Ok(witness.fold(*first, |root, w| branch_hash(&root, w)));
    };

    let mut current = to_hash(first)?;
    let mut left = rest.iter();
    let mut index = (size - 1) >> size.trailing_zeros();
    while left.len() > 0 || witness.len() > 0 {
        if index & 1 == 0 {
            match witness.next() {
                Some(sibling) => current = branch_hash(&current, sibling),
                None if index == 0 => {
                    return Err(ProofError::Malformed("append path too long".into()));
                }
                // No right sibling at this layer: the node is carried up.
                None => {}
            }
        } else {
            let sibling = left
                .next()
                .ok_or_else(|| ProofError::Malformed("append path too short".into()))?;
            current = branch_hash(sibling, &current);
        }
        index >>= 1;
    }
    Ok(current)
}

fn next_layer(layer: &[Hash]) -> Vec<Hash> {
    layer
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => branch_hash(left, right),
            [single] => *single,
            _ => EMPTY_HASH,
        })
        .collect()
}

/// Root of the tree over `values`, computed layer by layer.
pub fn merkle_root(values: &[Vec<u8>]) -> Hash {
    let mut layer: Vec<Hash> = values.iter().map(|v| leaf_hash(v)).collect();
    while layer.len() > 1 {
        layer = next_layer(&layer);
    }
    layer.first().copied().unwrap_or(EMPTY_HASH)
}

/// Generates the right witness that completes the first `size` of `values`
/// to the root over all of them.
pub fn generate_right_witness(size: usize, values: &[Vec<u8>]) -> Result<Vec<Vec<u8>>, ProofError> {
    if size > values.len() {
        return Err(ProofError::Malformed(format!(
            "witness index {size} beyond tree of size {}",
            values.len()
        )));
    }
    if size == values.len() {
        return Ok(Vec::new());
    }
    if size == 0 {
        return Ok(vec![merkle_root(values).to_vec()]);
    }

    let mut layer: Vec<Hash> = values.iter().map(|v| leaf_hash(v)).collect();
    let height = size.trailing_zeros();
    for _ in 0..height {
        layer = next_layer(&layer);
    }
    let mut index = (size - 1) >> height;
    let mut witness = Vec::new();
    while layer.len() > 1 {
        if index & 1 == 0 {
            if let Some(sibling) = layer.get(index + 1) {
                witness.push(sibling.to_vec());
            }
        }
        layer = next_layer(&layer);
        index >>= 1;
    }
    Ok(witness)
}
