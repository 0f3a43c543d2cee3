// Path: crates/consensus/src/bft/mod.rs
//! BFT finality gadget state.

/// The per-block driver that loads, updates and persists the votes.
pub mod method;
/// The height-indexed BFT parameters store and its cache.
pub mod params;
/// Pure vote-tracking functions over `BftVotes`.
pub mod votes;

pub use method::BftMethod;
pub use params::{bft_module_prefix, BftParametersCache, BftParametersStore};
pub use votes::BftHeights;

#[cfg(test)]
mod tests;
