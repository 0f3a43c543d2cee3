// Path: crates/consensus/src/lib.rs
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
#![deny(missing_docs)]
//! # Meridian Kernel Consensus
//!
//! BFT vote tracking over a bounded window of recent blocks, the height-indexed
//! BFT parameters store with its memoizing cache, and certificates: the
//! attestations of finalized blocks that partner chains verify.
//!
//! ## Architectural Role
//!
//! The vote functions in [`bft::votes`] are pure transformations of a
//! [`meridian_types::app::BftVotes`] value; [`bft::BftMethod`] loads and stores
//! that value around them. Certificate helpers are shared with the
//! interoperability module, which verifies certificates of partner chains.

/// BFT votes, parameters and the method that drives them per block.
pub mod bft;
/// Certificates computed from block headers and their BLS signatures.
pub mod certificate;

pub use bft::{BftHeights, BftMethod, BftParametersCache, BftParametersStore};
