// Path: crates/types/src/codec/json.rs
//! JSON-safe mapping of decoded values.
//!
//! Bytes become lowercase hex strings and 64-bit integers become decimal strings,
//! so no value loses precision in a JSON number.

use super::schema::{DataType, ItemKind, PropertyKind, Schema};
use super::value::{Object, Value};
use crate::error::CodecError;
use serde_json::{Map, Value as Json};

/// Converts a decoded object to its JSON representation.
pub fn to_json(schema: &Schema, object: &Object) -> Result<Json, CodecError> {
    let mut map = Map::new();
    for property in schema.properties() {
        let Some(value) = object.get(property.name()) else {
            continue;
        };
        let json = match (property.kind(), value) {
            (PropertyKind::Scalar(data_type), value) => {
                scalar_to_json(property.name(), *data_type, value)?
            }
            (PropertyKind::Object(nested), Value::Object(inner)) => to_json(nested, inner)?,
            (PropertyKind::Array(items), Value::Array(list)) => Json::Array(
                list.iter()
                    .map(|item| match (items, item) {
                        (ItemKind::Scalar(data_type), item) => {
                            scalar_to_json(property.name(), *data_type, item)
                        }
                        (ItemKind::Object(nested), Value::Object(inner)) => to_json(nested, inner),
                        _ => Err(mismatch(property.name(), "object")),
                    })
                    .collect::<Result<_, _>>()?,
            ),
            _ => return Err(mismatch(property.name(), kind_name(property.kind()))),
        };
        map.insert(property.name().to_string(), json);
    }
    Ok(Json::Object(map))
}

/// Converts a JSON representation back into a value object.
pub fn from_json(schema: &Schema, json: &Json) -> Result<Object, CodecError> {
    let map = json.as_object().ok_or_else(|| CodecError::Json {
        name: schema.id().to_string(),
        reason: "expected an object".into(),
    })?;
    let mut object = Object::new();
    for (name, entry) in map {
        let property = schema
            .property(name)
            .ok_or_else(|| CodecError::UnknownProperty(name.clone()))?;
        let value = match property.kind() {
            PropertyKind::Scalar(data_type) => scalar_from_json(name, *data_type, entry)?,
            PropertyKind::Object(nested) => Value::Object(from_json(nested, entry)?),
            PropertyKind::Array(items) => {
                let list = entry.as_array().ok_or_else(|| json_error(name, "expected an array"))?;
                Value::Array(
                    list.iter()
                        .map(|item| match items {
                            ItemKind::Scalar(data_type) => scalar_from_json(name, *data_type, item),
                            ItemKind::Object(nested) => from_json(nested, item).map(Value::Object),
                        })
                        .collect::<Result<_, _>>()?,
                )
            }
        };
        object.insert(name, value);
    }
    Ok(object)
}

fn scalar_to_json(name: &str, data_type: DataType, value: &Value) -> Result<Json, CodecError> {
    Ok(match (data_type, value) {
        (DataType::UInt32, Value::UInt32(v)) => Json::from(*v),
        (DataType::SInt32, Value::SInt32(v)) => Json::from(*v),
        (DataType::UInt64, Value::UInt64(v)) => Json::String(v.to_string()),
        (DataType::SInt64, Value::SInt64(v)) => Json::String(v.to_string()),
        (DataType::Boolean, Value::Boolean(v)) => Json::Bool(*v),
        (DataType::Bytes, Value::Bytes(v)) => Json::String(hex::encode(v)),
        (DataType::String, Value::String(v)) => Json::String(v.clone()),
        _ => return Err(mismatch(name, data_type.as_str())),
    })
}

fn scalar_from_json(name: &str, data_type: DataType, json: &Json) -> Result<Value, CodecError> {
    let value = match data_type {
        DataType::UInt32 => json
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(Value::UInt32),
        DataType::SInt32 => json
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Value::SInt32),
        DataType::UInt64 => json
            .as_str()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Value::UInt64),
        DataType::SInt64 => json
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Value::SInt64),
        DataType::Boolean => json.as_bool().map(Value::Boolean),
        DataType::Bytes => json
            .as_str()
            .and_then(|s| hex::decode(s).ok())
            .map(Value::Bytes),
        DataType::String => json.as_str().map(|s| Value::String(s.to_string())),
    };
    value.ok_or_else(|| json_error(name, &format!("expected {}", data_type.as_str())))
}

fn kind_name(kind: &PropertyKind) -> &'static str {
    match kind {
        PropertyKind::Scalar(data_type) => data_type.as_str(),
        PropertyKind::Object(_) => "object",
        PropertyKind::Array(_) => "array",
    }
}

fn mismatch(name: &str, expected: &'static str) -> CodecError {
    CodecError::TypeMismatch {
        name: name.to_string(),
        expected,
    }
}

fn json_error(name: &str, reason: &str) -> CodecError {
    CodecError::Json {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}
