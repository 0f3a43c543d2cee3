// Path: crates/types/src/codec/key.rs
//! Wire keys: `varint(field_number << 3 | wire_type)`.

use super::varint::{read_u32, write_u32};
use crate::error::CodecError;

/// The largest field number whose key still fits a `u32`.
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// How the value that follows a key is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    /// A single varint (integers and booleans).
    Varint = 0,
    /// A varint length followed by that many bytes (bytes, strings, objects, arrays).
    LengthDelimited = 2,
}

impl WireType {
    fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Varint),
            2 => Some(Self::LengthDelimited),
            _ => None,
        }
    }
}

/// Derives the key bytes for a property.
pub fn generate_key(field_number: u32, wire_type: WireType) -> Vec<u8> {
    let mut key = Vec::with_capacity(2);
    write_u32((field_number << 3) | wire_type as u32, &mut key);
    key
}

/// A key read back from a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedKey {
    /// The field number carried by the key.
    pub field_number: u32,
    /// The wire type carried by the key.
    pub wire_type: WireType,
    /// Number of bytes the key occupied.
    pub size: usize,
}

/// Reads a key at `offset`.
pub fn read_key(buf: &[u8], offset: usize) -> Result<DecodedKey, CodecError> {
    let (raw, size) = read_u32(buf, offset)?;
    let wire_type = WireType::from_raw(raw & 0x07).ok_or(CodecError::InvalidWireType)?;
    Ok(DecodedKey {
        field_number: raw >> 3,
        wire_type,
        size,
    })
}
