// Path: crates/crypto/src/algorithms/mod.rs
/// SHA-256 helpers.
pub mod hash;
