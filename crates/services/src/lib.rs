// Path: crates/services/src/lib.rs
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! Modules of the Meridian kernel.
//!
//! The interoperability module accepts cross-chain updates: batches of
//! cross-chain messages proven by a certificate of the sending chain.

pub mod interoperability;
