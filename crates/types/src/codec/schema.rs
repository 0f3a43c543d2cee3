// Path: crates/types/src/codec/schema.rs
//! Compiled schema descriptors.
//!
//! A [`Schema`] is built once per type, either with [`SchemaBuilder`] or from a
//! JSON description, and is immutable afterwards. Properties are stored sorted by
//! field number with their wire keys precomputed, so encode and decode are a single
//! ordered walk and lookups by field number are a binary search.

use super::key::{generate_key, WireType, MAX_FIELD_NUMBER};
use crate::error::SchemaError;
use std::collections::HashSet;
use std::sync::Arc;

/// Leaf data types understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Unsigned 32-bit varint.
    UInt32,
    /// Zigzag signed 32-bit varint.
    SInt32,
    /// Unsigned 64-bit varint.
    UInt64,
    /// Zigzag signed 64-bit varint.
    SInt64,
    /// Length-prefixed UTF-8.
    String,
    /// Length-prefixed raw bytes.
    Bytes,
    /// A single `0x00`/`0x01` byte.
    Boolean,
}

impl DataType {
    /// The wire type a scalar of this type is written with.
    pub fn wire_type(self) -> WireType {
        match self {
            Self::String | Self::Bytes => WireType::LengthDelimited,
            _ => WireType::Varint,
        }
    }

    /// Arrays of numeric and boolean items are packed behind a single key.
    pub fn is_packable(self) -> bool {
        self.wire_type() == WireType::Varint
    }

    /// The name used in JSON schema descriptions.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UInt32 => "uint32",
            Self::SInt32 => "sint32",
            Self::UInt64 => "uint64",
            Self::SInt64 => "sint64",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Boolean => "boolean",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "uint32" => Self::UInt32,
            "sint32" => Self::SInt32,
            "uint64" => Self::UInt64,
            "sint64" => Self::SInt64,
            "string" => Self::String,
            "bytes" => Self::Bytes,
            "boolean" => Self::Boolean,
            _ => return None,
        })
    }
}

/// The item type of an array property.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    /// Scalar items; packed when numeric or boolean.
    Scalar(DataType),
    /// Nested object items, each written under its own key.
    Object(Arc<Schema>),
}

/// The shape of a property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    /// A leaf value.
    Scalar(DataType),
    /// A nested object.
    Object(Arc<Schema>),
    /// A homogeneous list.
    Array(ItemKind),
}

/// A compiled property descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    name: String,
    field_number: u32,
    kind: PropertyKind,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    key: Vec<u8>,
}

impl Property {
    /// The property name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field number written in the key.
    pub fn field_number(&self) -> u32 {
        self.field_number
    }

    /// The property shape.
    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    /// Whether encoding fails when the property is absent.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the property is an array.
    pub fn is_array(&self) -> bool {
        matches!(self.kind, PropertyKind::Array(_))
    }

    /// Inclusive length bounds, if any were declared.
    pub fn length_bounds(&self) -> (Option<usize>, Option<usize>) {
        (self.min_length, self.max_length)
    }

    /// The precomputed wire key.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// The wire type the key carries.
    pub fn wire_type(&self) -> WireType {
        match &self.kind {
            PropertyKind::Scalar(data_type) => data_type.wire_type(),
            PropertyKind::Object(_) | PropertyKind::Array(_) => WireType::LengthDelimited,
        }
    }
}

/// An immutable, compiled schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    id: String,
    properties: Vec<Property>,
}

impl Schema {
    /// Starts a new schema description.
    pub fn builder(id: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            id: id.into(),
            properties: Vec::new(),
        }
    }

    /// The schema identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Properties in ascending field-number order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Looks up a property by field number.
    pub fn property_by_field(&self, field_number: u32) -> Option<&Property> {
        self.properties
            .binary_search_by_key(&field_number, |p| p.field_number)
            .ok()
            .and_then(|index| self.properties.get(index))
    }

    /// Looks up a property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Compiles a JSON schema description such as
    /// `{"$id": "/x", "type": "object", "required": ["a"], "properties": {"a": {"dataType": "uint32", "fieldNumber": 1}}}`.
    ///
    /// When the description has no `required` list every property is required.
    pub fn from_json(description: &serde_json::Value) -> Result<Self, SchemaError> {
        let id = description
            .get("$id")
            .and_then(|v| v.as_str())
            .unwrap_or("/anonymous");
        let properties = description
            .get("properties")
            .and_then(|v| v.as_object())
            .ok_or_else(|| SchemaError::Malformed(format!("{id}: missing properties")))?;
        let required: Option<HashSet<&str>> = description
            .get("required")
            .and_then(|v| v.as_array())
            .map(|names| names.iter().filter_map(|n| n.as_str()).collect());

        let mut builder = Schema::builder(id);
        for (name, spec) in properties {
            let field_number = spec
                .get("fieldNumber")
                .and_then(|v| v.as_u64())
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| SchemaError::Malformed(format!("{name}: missing fieldNumber")))?;
            let kind = parse_kind(name, spec)?;
            builder = builder.property(name, field_number, kind);
            if let Some(required) = &required {
                if !required.contains(name.as_str()) {
                    builder = builder.optional();
                }
            }
            if let Some(min) = spec.get("minLength").and_then(|v| v.as_u64()) {
                builder = builder.min_length(min as usize);
            }
            if let Some(max) = spec.get("maxLength").and_then(|v| v.as_u64()) {
                builder = builder.max_length(max as usize);
            }
        }
        builder.build()
    }
}

fn parse_kind(name: &str, spec: &serde_json::Value) -> Result<PropertyKind, SchemaError> {
    if let Some(data_type) = spec.get("dataType").and_then(|v| v.as_str()) {
        return DataType::parse(data_type)
            .map(PropertyKind::Scalar)
            .ok_or_else(|| SchemaError::Malformed(format!("{name}: unknown dataType {data_type}")));
    }
    match spec.get("type").and_then(|v| v.as_str()) {
        Some("object") => Ok(PropertyKind::Object(Arc::new(Schema::from_json(spec)?))),
        Some("array") => {
            let items = spec
                .get("items")
                .ok_or_else(|| SchemaError::Malformed(format!("{name}: array without items")))?;
            if let Some(data_type) = items.get("dataType").and_then(|v| v.as_str()) {
                let data_type = DataType::parse(data_type).ok_or_else(|| {
                    SchemaError::Malformed(format!("{name}: unknown dataType {data_type}"))
                })?;
                Ok(PropertyKind::Array(ItemKind::Scalar(data_type)))
            } else {
                Ok(PropertyKind::Array(ItemKind::Object(Arc::new(
                    Schema::from_json(items)?,
                ))))
            }
        }
        _ => Err(SchemaError::Malformed(format!(
            "{name}: expected dataType or type"
        ))),
    }
}

struct PropertySpec {
    name: String,
    field_number: u32,
    kind: PropertyKind,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
}

/// Incremental description of a schema. Modifiers such as [`SchemaBuilder::optional`]
/// apply to the most recently added property; properties are required by default.
pub struct SchemaBuilder {
    id: String,
    properties: Vec<PropertySpec>,
}

impl SchemaBuilder {
    /// Adds a property of any kind.
    pub fn property(mut self, name: &str, field_number: u32, kind: PropertyKind) -> Self {
        self.properties.push(PropertySpec {
            name: name.to_string(),
            field_number,
            kind,
            required: true,
            min_length: None,
            max_length: None,
        });
        self
    }

    /// Adds a `uint32` property.
    pub fn uint32(self, name: &str, field_number: u32) -> Self {
        self.property(name, field_number, PropertyKind::Scalar(DataType::UInt32))
    }

    /// Adds a `sint32` property.
    pub fn sint32(self, name: &str, field_number: u32) -> Self {
        self.property(name, field_number, PropertyKind::Scalar(DataType::SInt32))
    }

    /// Adds a `uint64` property.
    pub fn uint64(self, name: &str, field_number: u32) -> Self {
        self.property(name, field_number, PropertyKind::Scalar(DataType::UInt64))
    }

    /// Adds a `sint64` property.
    pub fn sint64(self, name: &str, field_number: u32) -> Self {
        self.property(name, field_number, PropertyKind::Scalar(DataType::SInt64))
    }

    /// Adds a `string` property.
    pub fn string(self, name: &str, field_number: u32) -> Self {
        self.property(name, field_number, PropertyKind::Scalar(DataType::String))
    }

    /// Adds a `bytes` property.
    pub fn bytes(self, name: &str, field_number: u32) -> Self {
        self.property(name, field_number, PropertyKind::Scalar(DataType::Bytes))
    }

    /// Adds a `boolean` property.
    pub fn boolean(self, name: &str, field_number: u32) -> Self {
        self.property(name, field_number, PropertyKind::Scalar(DataType::Boolean))
    }

    /// Adds a nested object property.
    pub fn object(self, name: &str, field_number: u32, schema: Arc<Schema>) -> Self {
        self.property(name, field_number, PropertyKind::Object(schema))
    }

    /// Adds an array of scalars.
    pub fn array_of(self, name: &str, field_number: u32, item: DataType) -> Self {
        self.property(name, field_number, PropertyKind::Array(ItemKind::Scalar(item)))
    }

    /// Adds an array of nested objects.
    pub fn array_of_objects(self, name: &str, field_number: u32, item: Arc<Schema>) -> Self {
        self.property(name, field_number, PropertyKind::Array(ItemKind::Object(item)))
    }

    /// Marks the last property as optional.
    pub fn optional(mut self) -> Self {
        if let Some(last) = self.properties.last_mut() {
            last.required = false;
        }
        self
    }

    /// Sets the inclusive minimum length of the last property.
    pub fn min_length(mut self, min: usize) -> Self {
        if let Some(last) = self.properties.last_mut() {
            last.min_length = Some(min);
        }
        self
    }

    /// Sets the inclusive maximum length of the last property.
    pub fn max_length(mut self, max: usize) -> Self {
        if let Some(last) = self.properties.last_mut() {
            last.max_length = Some(max);
        }
        self
    }

    /// Sets both length bounds of the last property to `len`.
    pub fn exact_length(self, len: usize) -> Self {
        self.min_length(len).max_length(len)
    }

    /// Validates and compiles the description.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut numbers = HashSet::new();
        let mut names = HashSet::new();
        let mut properties = Vec::with_capacity(self.properties.len());
        for spec in self.properties {
            if spec.field_number == 0 || spec.field_number > MAX_FIELD_NUMBER {
                return Err(SchemaError::InvalidFieldNumber(spec.field_number, spec.name));
            }
            if !numbers.insert(spec.field_number) {
                return Err(SchemaError::DuplicateFieldNumber(
                    spec.field_number,
                    self.id,
                ));
            }
            if !names.insert(spec.name.clone()) {
                return Err(SchemaError::DuplicateName(spec.name, self.id));
            }
            let wire_type = match &spec.kind {
                PropertyKind::Scalar(data_type) => data_type.wire_type(),
                _ => WireType::LengthDelimited,
            };
            properties.push(Property {
                key: generate_key(spec.field_number, wire_type),
                name: spec.name,
                field_number: spec.field_number,
                kind: spec.kind,
                required: spec.required,
                min_length: spec.min_length,
                max_length: spec.max_length,
            });
        }
        properties.sort_by_key(|p| p.field_number);
        Ok(Schema {
            id: self.id,
            properties,
        })
    }
}

/// Compiles a schema that is fixed in the source code.
///
/// # Panics
///
/// Panics if the description is malformed. Only use this for `static` schemas,
/// where a malformed description is a programming error.
pub fn compile_static(builder: SchemaBuilder) -> Arc<Schema> {
    match builder.build() {
        Ok(schema) => Arc::new(schema),
        Err(err) => panic!("static schema is malformed: {err}"),
    }
}
