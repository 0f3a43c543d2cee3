// Path: crates/crypto/src/lib.rs
//! # Meridian Kernel Crypto Crate Lints
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
//! # Meridian Kernel Cryptography
//!
//! SHA-256 hashing and BLS12-381 signatures (public keys in G1, signatures in
//! G2) as used by certificates and cross-chain updates.

/// Hash functions.
pub mod algorithms;
/// Local error types.
pub mod error;
/// Signature schemes.
pub mod sign;

pub use algorithms::hash::{sha256, sha256_concat};
