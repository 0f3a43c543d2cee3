// Path: crates/types/src/codec/writer.rs
//! The encode half of the codec.

use super::schema::{DataType, ItemKind, Property, PropertyKind, Schema};
use super::value::{Object, Value};
use super::varint::{write_s32, write_s64, write_u32, write_u64};
use crate::error::CodecError;

/// Encodes `value` under `schema`.
///
/// Properties are written in field-number order regardless of how the value was
/// built. Absent optional properties and empty arrays produce no bytes.
pub fn encode(schema: &Schema, value: &Object) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    write_object(schema, value, &mut out)?;
    Ok(out)
}

fn write_object(schema: &Schema, object: &Object, out: &mut Vec<u8>) -> Result<(), CodecError> {
    for property in schema.properties() {
        let Some(value) = object.get(property.name()) else {
            if property.is_required() && !property.is_array() {
                return Err(CodecError::MissingProperty(property.name().to_string()));
            }
            continue;
        };
        match (property.kind(), value) {
            (PropertyKind::Scalar(data_type), value) => {
                out.extend_from_slice(property.key());
                write_scalar(property.name(), *data_type, value, out)?;
            }
            (PropertyKind::Object(nested), Value::Object(inner)) => {
                out.extend_from_slice(property.key());
                write_nested(nested, inner, out)?;
            }
            (PropertyKind::Array(items), Value::Array(list)) => {
                write_array(property, items, list, out)?;
            }
            (PropertyKind::Object(_), _) => return Err(mismatch(property.name(), "object")),
            (PropertyKind::Array(_), _) => return Err(mismatch(property.name(), "array")),
        }
    }
    Ok(())
}

fn write_nested(schema: &Schema, object: &Object, out: &mut Vec<u8>) -> Result<(), CodecError> {
    let mut body = Vec::new();
    write_object(schema, object, &mut body)?;
    write_length_delimited(&body, out)
}

fn write_array(
    property: &Property,
    items: &ItemKind,
    list: &[Value],
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    if list.is_empty() {
        return Ok(());
    }
    match items {
        ItemKind::Scalar(data_type) if data_type.is_packable() => {
            let mut body = Vec::new();
            for item in list {
                write_scalar(property.name(), *data_type, item, &mut body)?;
            }
            out.extend_from_slice(property.key());
            write_length_delimited(&body, out)?;
        }
        ItemKind::Scalar(data_type) => {
            for item in list {
                out.extend_from_slice(property.key());
                write_scalar(property.name(), *data_type, item, out)?;
            }
        }
        ItemKind::Object(schema) => {
            for item in list {
                let Value::Object(inner) = item else {
                    return Err(mismatch(property.name(), "object"));
                };
                out.extend_from_slice(property.key());
                write_nested(schema, inner, out)?;
            }
        }
    }
    Ok(())
}

fn write_scalar(
    name: &str,
    data_type: DataType,
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<(), CodecError> {
    match (data_type, value) {
        (DataType::UInt32, Value::UInt32(v)) => write_u32(*v, out),
        (DataType::SInt32, Value::SInt32(v)) => write_s32(*v, out),
        (DataType::UInt64, Value::UInt64(v)) => write_u64(*v, out),
        (DataType::SInt64, Value::SInt64(v)) => write_s64(*v, out),
        (DataType::Boolean, Value::Boolean(v)) => out.push(u8::from(*v)),
        (DataType::Bytes, Value::Bytes(v)) => write_length_delimited(v, out)?,
        (DataType::String, Value::String(v)) => write_length_delimited(v.as_bytes(), out)?,
        _ => return Err(mismatch(name, data_type.as_str())),
    }
    Ok(())
}

fn write_length_delimited(bytes: &[u8], out: &mut Vec<u8>) -> Result<(), CodecError> {
    let len = u32::try_from(bytes.len()).map_err(|_| CodecError::OutOfRange("uint32"))?;
    write_u32(len, out);
    out.extend_from_slice(bytes);
    Ok(())
}

fn mismatch(name: &str, expected: &'static str) -> CodecError {
    CodecError::TypeMismatch {
        name: name.to_string(),
        expected,
    }
}
