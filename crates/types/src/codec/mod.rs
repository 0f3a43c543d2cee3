// Path: crates/types/src/codec/mod.rs
//! The canonical, schema-driven binary codec.
//!
//! All consensus-critical data (cross-chain messages, certificates, state entries)
//! is encoded with this module. A value has exactly one valid encoding under a
//! given schema, so encoded buffers can be used directly as hash preimages.
//!
//! Typed structures implement [`SchemaObject`] and get `encode`/`decode` through
//! the dynamic [`Object`] representation.

mod json;
mod key;
mod reader;
mod schema;
mod validate;
mod value;
pub mod varint;
mod writer;

pub use json::{from_json, to_json};
pub use key::{generate_key, read_key, DecodedKey, WireType, MAX_FIELD_NUMBER};
pub use reader::decode;
pub use schema::{
    compile_static, DataType, ItemKind, Property, PropertyKind, Schema, SchemaBuilder,
};
pub use validate::validate;
pub use value::{bytes_list, object_list, Object, Value};
pub use writer::encode;

use crate::error::CodecError;

/// A typed structure with a fixed schema.
pub trait SchemaObject: Sized {
    /// The compiled schema the structure is encoded with.
    fn schema() -> &'static Schema;

    /// Converts the structure into its dynamic representation.
    fn to_object(&self) -> Object;

    /// Builds the structure from its dynamic representation.
    fn from_object(object: &Object) -> Result<Self, CodecError>;

    /// Encodes the structure.
    fn encode(&self) -> Result<Vec<u8>, CodecError> {
        encode(Self::schema(), &self.to_object())
    }

    /// Decodes the structure without bound checks.
    fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::from_object(&decode(Self::schema(), bytes)?)
    }

    /// Decodes the structure and checks it against the schema's length bounds.
    fn decode_validated(bytes: &[u8]) -> Result<Self, CodecError> {
        let object = decode(Self::schema(), bytes)?;
        validate(Self::schema(), &object)?;
        Self::from_object(&object)
    }

    /// Maps the structure to its JSON-safe representation.
    fn to_json(&self) -> Result<serde_json::Value, CodecError> {
        to_json(Self::schema(), &self.to_object())
    }

    /// Builds the structure from its JSON-safe representation.
    fn from_json(json: &serde_json::Value) -> Result<Self, CodecError> {
        Self::from_object(&from_json(Self::schema(), json)?)
    }
}

#[cfg(test)]
mod tests;
