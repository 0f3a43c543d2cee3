// Path: crates/types/src/codec/validate.rs
//! Shape and bound checks for values before they are acted upon.

use super::schema::{DataType, ItemKind, Property, PropertyKind, Schema};
use super::value::{Object, Value};
use crate::error::CodecError;

/// Checks that `object` conforms to `schema`: no unknown properties, every
/// required property present with the declared type, and every declared length
/// bound respected.
pub fn validate(schema: &Schema, object: &Object) -> Result<(), CodecError> {
    for (name, _) in object.iter() {
        if schema.property(name).is_none() {
            return Err(CodecError::UnknownProperty(name.clone()));
        }
    }
    for property in schema.properties() {
        match object.get(property.name()) {
            None if property.is_required() => {
                return Err(CodecError::MissingProperty(property.name().to_string()))
            }
            None => {}
            Some(value) => validate_property(property, value)?,
        }
    }
    Ok(())
}

fn validate_property(property: &Property, value: &Value) -> Result<(), CodecError> {
    let name = property.name();
    let length = match (property.kind(), value) {
        (PropertyKind::Scalar(data_type), value) => {
            check_scalar(name, *data_type, value)?;
            match value {
                Value::Bytes(bytes) => Some(bytes.len()),
                Value::String(text) => Some(text.len()),
                _ => None,
            }
        }
        (PropertyKind::Object(nested), Value::Object(inner)) => {
            validate(nested, inner)?;
            None
        }
        (PropertyKind::Array(items), Value::Array(list)) => {
            for item in list {
                match (items, item) {
                    (ItemKind::Scalar(data_type), item) => check_scalar(name, *data_type, item)?,
                    (ItemKind::Object(nested), Value::Object(inner)) => validate(nested, inner)?,
                    _ => return Err(mismatch(name, "object")),
                }
            }
            Some(list.len())
        }
        (PropertyKind::Object(_), _) => return Err(mismatch(name, "object")),
        (PropertyKind::Array(_), _) => return Err(mismatch(name, "array")),
    };

    if let Some(length) = length {
        let (min, max) = property.length_bounds();
        let min = min.unwrap_or(0);
        let max = max.unwrap_or(usize::MAX);
        if length < min || length > max {
            return Err(CodecError::LengthBounds {
                name: name.to_string(),
                length,
                min,
                max,
            });
        }
    }
    Ok(())
}

fn check_scalar(name: &str, data_type: DataType, value: &Value) -> Result<(), CodecError> {
    let matches = matches!(
        (data_type, value),
        (DataType::UInt32, Value::UInt32(_))
            | (DataType::SInt32, Value::SInt32(_))
            | (DataType::UInt64, Value::UInt64(_))
            | (DataType::SInt64, Value::SInt64(_))
            | (DataType::Boolean, Value::Boolean(_))
            | (DataType::Bytes, Value::Bytes(_))
            | (DataType::String, Value::String(_))
    );
    if matches {
        Ok(())
    } else {
        Err(mismatch(name, data_type.as_str()))
    }
}

fn mismatch(name: &str, expected: &'static str) -> CodecError {
    CodecError::TypeMismatch {
        name: name.to_string(),
        expected,
    }
}
