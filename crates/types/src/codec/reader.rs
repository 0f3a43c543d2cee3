// Path: crates/types/src/codec/reader.rs
//! The decode half of the codec.
//!
//! Decoding walks the schema's properties in field-number order while a cursor
//! moves forward through the buffer. Each property either consumes the pair under
//! the cursor or is treated as absent; any bytes left once the schema is exhausted
//! mean the buffer repeated a field or carried trailing garbage.

use super::key::{read_key, DecodedKey, WireType};
use super::schema::{DataType, ItemKind, Property, PropertyKind, Schema};
use super::value::{Object, Value};
use super::varint::{read_s32, read_s64, read_u32, read_u64};
use crate::error::CodecError;

/// Decodes `bytes` under `schema`.
pub fn decode(schema: &Schema, bytes: &[u8]) -> Result<Object, CodecError> {
    read_object(schema, bytes, 0)
}

/// `window` ends where the enclosing object ends; `index` is the first byte of
/// this object inside it.
fn read_object(schema: &Schema, window: &[u8], mut index: usize) -> Result<Object, CodecError> {
    let end = window.len();
    let mut result = Object::new();
    let mut last_field = 0;

    for property in schema.properties() {
        let mandatory = property.is_required() && !property.is_array();
        if index >= end {
            if mandatory {
                return Err(CodecError::MissingField(property.field_number()));
            }
            absent(property, &mut result);
            continue;
        }

        let key = match read_key(window, index) {
            Ok(key) => key,
            Err(err) if mandatory => return Err(err),
            Err(_) => {
                absent(property, &mut result);
                continue;
            }
        };
        if key.field_number != property.field_number() {
            if mandatory || schema.property_by_field(key.field_number).is_none() {
                return Err(CodecError::InvalidFieldNumber);
            }
            absent(property, &mut result);
            continue;
        }
        if key.wire_type != property.wire_type() {
            return Err(CodecError::InvalidWireType);
        }
        index += key.size;
        last_field = key.field_number;

        let value = match property.kind() {
            PropertyKind::Scalar(data_type) => {
                let (value, size) = read_scalar(*data_type, window, index)?;
                index += size;
                value
            }
            PropertyKind::Object(nested) => {
                let (body, next) = length_delimited(window, index)?;
                let object = read_object(nested, body, next)?;
                index = body.len();
                Value::Object(object)
            }
            PropertyKind::Array(items) => {
                let (list, next) = read_array(property, items, window, index)?;
                index = next;
                Value::Array(list)
            }
        };
        result.insert(property.name(), value);
    }

    if index != end {
        // A leftover pair behind an already consumed field is out of order; a
        // repeated field or unparseable garbage is a bad terminate index.
        return Err(match read_key(window, index) {
            Ok(key) if key.field_number < last_field => CodecError::InvalidFieldNumber,
            _ => CodecError::InvalidTerminateIndex,
        });
    }
    Ok(result)
}

fn absent(property: &Property, result: &mut Object) {
    if property.is_array() {
        result.insert(property.name(), Value::Array(Vec::new()));
    }
}

/// Reads a length prefix at `index` and returns the window that ends with the
/// delimited bytes together with the offset of their first byte.
fn length_delimited(window: &[u8], index: usize) -> Result<(&[u8], usize), CodecError> {
    let (len, size) = read_u32(window, index)?;
    let start = index + size;
    let stop = start
        .checked_add(len as usize)
        .ok_or(CodecError::InvalidBufferLength)?;
    let body = window.get(..stop).ok_or(CodecError::InvalidBufferLength)?;
    Ok((body, start))
}

fn read_array(
    property: &Property,
    items: &ItemKind,
    window: &[u8],
    mut index: usize,
) -> Result<(Vec<Value>, usize), CodecError> {
    let mut list = Vec::new();

    if let ItemKind::Scalar(data_type) = items {
        if data_type.is_packable() {
            let (body, mut cursor) = length_delimited(window, index)?;
            if cursor == body.len() {
                return Err(CodecError::InvalidBufferLength);
            }
            while cursor < body.len() {
                let (value, size) = read_scalar(*data_type, body, cursor)?;
                cursor += size;
                list.push(value);
            }
            return Ok((list, cursor));
        }
    }

    loop {
        match items {
            ItemKind::Scalar(data_type) => {
                let (value, size) = read_scalar(*data_type, window, index)?;
                index += size;
                list.push(value);
            }
            ItemKind::Object(schema) => {
                let (body, start) = length_delimited(window, index)?;
                list.push(Value::Object(read_object(schema, body, start)?));
                index = body.len();
            }
        }
        match read_key(window, index) {
            Ok(DecodedKey {
                field_number,
                wire_type,
                size,
            }) if field_number == property.field_number() => {
                if wire_type != WireType::LengthDelimited {
                    return Err(CodecError::InvalidWireType);
                }
                index += size;
            }
            _ => return Ok((list, index)),
        }
    }
}

fn read_scalar(
    data_type: DataType,
    window: &[u8],
    index: usize,
) -> Result<(Value, usize), CodecError> {
    Ok(match data_type {
        DataType::UInt32 => {
            let (v, size) = read_u32(window, index)?;
            (Value::UInt32(v), size)
        }
        DataType::SInt32 => {
            let (v, size) = read_s32(window, index)?;
            (Value::SInt32(v), size)
        }
        DataType::UInt64 => {
            let (v, size) = read_u64(window, index)?;
            (Value::UInt64(v), size)
        }
        DataType::SInt64 => {
            let (v, size) = read_s64(window, index)?;
            (Value::SInt64(v), size)
        }
        DataType::Boolean => {
            let byte = window.get(index).ok_or(CodecError::InvalidBufferLength)?;
            let value = match *byte {
                0x00 => false,
                0x01 => true,
                _ => return Err(CodecError::InvalidBoolean),
            };
            (Value::Boolean(value), 1)
        }
        DataType::Bytes => {
            let (body, start) = length_delimited(window, index)?;
            let bytes = body.get(start..).ok_or(CodecError::InvalidBufferLength)?;
            (Value::Bytes(bytes.to_vec()), body.len() - index)
        }
        DataType::String => {
            let (body, start) = length_delimited(window, index)?;
            let bytes = body.get(start..).ok_or(CodecError::InvalidBufferLength)?;
            let text = std::str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
            (Value::String(text.to_string()), body.len() - index)
        }
    })
}
