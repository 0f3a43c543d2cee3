// Path: crates/test_utils/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Meridian Kernel Test Utilities
//!
//! Deterministic randomness, assertion macros and fixtures for building
//! certified cross-chain updates in tests.

pub mod assertions;
pub mod fixtures;
pub mod randomness;

#[doc(hidden)]
pub use hex;
