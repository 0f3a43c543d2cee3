// Path: crates/crypto/src/algorithms/hash/mod.rs
//! SHA-256, the only hash function used by the protocol.

use sha2::{Digest, Sha256};

/// Length of a SHA-256 digest.
pub const DIGEST_LENGTH: usize = 32;

/// Hashes `message`.
pub fn sha256(message: &[u8]) -> [u8; DIGEST_LENGTH] {
    Sha256::digest(message).into()
}

/// Hashes the concatenation of `parts` without allocating it.
pub fn sha256_concat(parts: &[&[u8]]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
