// Path: crates/types/src/codec/value.rs
//! Dynamic values produced by `decode` and consumed by `encode`.

use crate::error::CodecError;
use std::collections::BTreeMap;

/// A decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// `uint32`
    UInt32(u32),
    /// `sint32`
    SInt32(i32),
    /// `uint64`
    UInt64(u64),
    /// `sint64`
    SInt64(i64),
    /// `boolean`
    Boolean(bool),
    /// `bytes`
    Bytes(Vec<u8>),
    /// `string`
    String(String),
    /// Nested object.
    Object(Object),
    /// Array of values of a single kind.
    Array(Vec<Value>),
}

impl Value {
    /// A short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::UInt32(_) => "uint32",
            Self::SInt32(_) => "sint32",
            Self::UInt64(_) => "uint64",
            Self::SInt64(_) => "sint64",
            Self::Boolean(_) => "boolean",
            Self::Bytes(_) => "bytes",
            Self::String(_) => "string",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value.into())
            }
        })*
    };
}

impl_from! {
    u32 => UInt32,
    i32 => SInt32,
    u64 => UInt64,
    i64 => SInt64,
    bool => Boolean,
    Vec<u8> => Bytes,
    &[u8] => Bytes,
    String => String,
    &str => String,
    Object => Object,
    Vec<Value> => Array,
}

/// A decoded object: property name to value, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object(BTreeMap<String, Value>);

impl Object {
    /// Creates an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts or replaces a property.
    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_string(), value.into());
    }

    /// Returns a property if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Removes a property.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Iterates properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of present properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no property is present.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn require(&self, name: &str) -> Result<&Value, CodecError> {
        self.get(name)
            .ok_or_else(|| CodecError::MissingProperty(name.to_string()))
    }

    fn mismatch(name: &str, expected: &'static str) -> CodecError {
        CodecError::TypeMismatch {
            name: name.to_string(),
            expected,
        }
    }

    /// Reads a `uint32` property.
    pub fn get_u32(&self, name: &str) -> Result<u32, CodecError> {
        match self.require(name)? {
            Value::UInt32(v) => Ok(*v),
            _ => Err(Self::mismatch(name, "uint32")),
        }
    }

    /// Reads a `sint32` property.
    pub fn get_i32(&self, name: &str) -> Result<i32, CodecError> {
        match self.require(name)? {
            Value::SInt32(v) => Ok(*v),
            _ => Err(Self::mismatch(name, "sint32")),
        }
    }

    /// Reads a `uint64` property.
    pub fn get_u64(&self, name: &str) -> Result<u64, CodecError> {
        match self.require(name)? {
            Value::UInt64(v) => Ok(*v),
            _ => Err(Self::mismatch(name, "uint64")),
        }
    }

    /// Reads a `sint64` property.
    pub fn get_i64(&self, name: &str) -> Result<i64, CodecError> {
        match self.require(name)? {
            Value::SInt64(v) => Ok(*v),
            _ => Err(Self::mismatch(name, "sint64")),
        }
    }

    /// Reads a `boolean` property.
    pub fn get_bool(&self, name: &str) -> Result<bool, CodecError> {
        match self.require(name)? {
            Value::Boolean(v) => Ok(*v),
            _ => Err(Self::mismatch(name, "boolean")),
        }
    }

    /// Reads a `bytes` property.
    pub fn get_bytes(&self, name: &str) -> Result<&[u8], CodecError> {
        match self.require(name)? {
            Value::Bytes(v) => Ok(v),
            _ => Err(Self::mismatch(name, "bytes")),
        }
    }

    /// Reads a `bytes` property into a fixed-size array.
    pub fn get_fixed<const N: usize>(&self, name: &str) -> Result<[u8; N], CodecError> {
        let bytes = self.get_bytes(name)?;
        <[u8; N]>::try_from(bytes).map_err(|_| CodecError::LengthBounds {
            name: name.to_string(),
            length: bytes.len(),
            min: N,
            max: N,
        })
    }

    /// Reads a `string` property.
    pub fn get_str(&self, name: &str) -> Result<&str, CodecError> {
        match self.require(name)? {
            Value::String(v) => Ok(v),
            _ => Err(Self::mismatch(name, "string")),
        }
    }

    /// Reads a nested object property.
    pub fn get_object(&self, name: &str) -> Result<&Object, CodecError> {
        match self.require(name)? {
            Value::Object(v) => Ok(v),
            _ => Err(Self::mismatch(name, "object")),
        }
    }

    /// Reads an array property. An absent array reads as empty.
    pub fn get_list(&self, name: &str) -> Result<&[Value], CodecError> {
        match self.get(name) {
            None => Ok(&[]),
            Some(Value::Array(v)) => Ok(v),
            Some(_) => Err(Self::mismatch(name, "array")),
        }
    }

    /// Reads an array of `bytes` items.
    pub fn get_bytes_list(&self, name: &str) -> Result<Vec<Vec<u8>>, CodecError> {
        self.get_list(name)?
            .iter()
            .map(|item| match item {
                Value::Bytes(v) => Ok(v.clone()),
                _ => Err(Self::mismatch(name, "bytes")),
            })
            .collect()
    }

    /// Maps an array of object items through `f`.
    pub fn map_objects<T>(
        &self,
        name: &str,
        f: impl Fn(&Object) -> Result<T, CodecError>,
    ) -> Result<Vec<T>, CodecError> {
        self.get_list(name)?
            .iter()
            .map(|item| match item {
                Value::Object(object) => f(object),
                _ => Err(Self::mismatch(name, "object")),
            })
            .collect()
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Wraps a list of byte strings as an array value.
pub fn bytes_list(items: &[Vec<u8>]) -> Value {
    Value::Array(items.iter().map(|item| Value::Bytes(item.clone())).collect())
}

/// Wraps a list of objects as an array value.
pub fn object_list(items: impl IntoIterator<Item = Object>) -> Value {
    Value::Array(items.into_iter().map(Value::Object).collect())
}
