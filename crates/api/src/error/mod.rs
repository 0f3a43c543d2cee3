// Path: crates/api/src/error/mod.rs
// Re-export all core error types from the central types crate.
pub use meridian_types::error::{
    BftError, CodecError, CryptoError, ErrorCode, InteropError, ProofError, SchemaError,
    StateError,
};
pub use meridian_types::Result;
