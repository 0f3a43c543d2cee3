// Path: crates/crypto/src/sign/mod.rs
/// BLS12-381 signatures, tagged messages and weighted aggregate verification.
pub mod bls;
