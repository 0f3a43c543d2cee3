// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::indexing_slicing))]

//! # Meridian Kernel Types
//!
//! This crate is the foundational library for the Meridian kernel. It owns the
//! deterministic, schema-driven binary codec, every on-chain data structure that
//! is encoded with it, the error enums and the configuration objects.
//!
//! ## Architectural Role
//!
//! As the base crate, `meridian-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. The codec lives here because
//! the byte layout it defines is what blocks, state entries and cross-chain
//! messages are hashed over; every crate must agree on it bit for bit.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::CodecError> = std::result::Result<T, E>;

/// Core application-level data structures: BFT records, certificates and cross-chain types.
pub mod app;
/// The canonical, schema-driven binary codec and its JSON mapping.
pub mod codec;
/// Shared configuration structures (`InteropConfig`, `BftConfig`).
pub mod config;
/// A unified set of all error types used across the kernel.
pub mod error;
/// Constants for well-known state keys, store prefixes and context-store keys.
pub mod keys;
/// Codec traits and `OptionExt`, which maps absent entries to `NotFound`.
pub mod prelude;
