// Path: crates/types/src/codec/tests/mod.rs
use super::varint::write_s64;
use super::*;
use crate::error::CodecError;
use proptest::collection::vec;
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn data_later(declared_later_first: bool) -> Schema {
    let builder = Schema::builder("/test/dataLater");
    let builder = if declared_later_first {
        builder.uint32("later", 3).uint32("data", 1)
    } else {
        builder.uint32("data", 1).uint32("later", 3)
    };
    builder.build().unwrap()
}

fn with_packed_list() -> Schema {
    Schema::builder("/test/packed")
        .uint32("data", 1)
        .array_of("list", 2, DataType::UInt32)
        .build()
        .unwrap()
}

#[test]
fn test_field_number_governs_wire_order() {
    let value = Object::new().with("data", 20u32).with("later", 9999u32);
    let a = encode(&data_later(false), &value).unwrap();
    let b = encode(&data_later(true), &value).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, vec![0x08, 0x14, 0x18, 0x8f, 0x4e]);
    assert_eq!(decode(&data_later(true), &a).unwrap(), value);
}

#[test]
fn test_decode_non_ascii_string() {
    let schema = Schema::builder("/test/string")
        .string("data", 1)
        .build()
        .unwrap();
    let bytes = hex::decode("0a18436865636b6f7574204c69736b2053444b21c2a2c2a3c2a1").unwrap();
    let decoded = decode(&schema, &bytes).unwrap();
    assert_eq!(decoded.get_str("data").unwrap(), "Checkout Lisk SDK!¢£¡");
    assert_eq!(encode(&schema, &decoded).unwrap(), bytes);
}

#[test]
fn test_decode_rejects_out_of_order_fields() {
    let bytes = [0x18, 0x01, 0x08, 0x14];
    let err = decode(&data_later(false), &bytes).unwrap_err();
    assert_eq!(err.to_string(), "Invalid field number while decoding");
}

#[test]
fn test_decode_rejects_unknown_field() {
    let schema = Schema::builder("/test/one").uint32("data", 1).build().unwrap();
    // field 99, varint wire type
    let bytes = [0x98, 0x06, 0x01, 0x08, 0x14];
    assert_eq!(decode(&schema, &bytes), Err(CodecError::InvalidFieldNumber));
}

#[test]
fn test_decode_rejects_duplicate_field() {
    let schema = Schema::builder("/test/one").uint32("data", 1).build().unwrap();
    let err = decode(&schema, &[0x08, 0x14, 0x08, 0x15]).unwrap_err();
    assert_eq!(err.to_string(), "Invalid terminate index.");
}

#[test]
fn test_decode_rejects_trailing_bytes() {
    let schema = Schema::builder("/test/one").uint32("data", 1).build().unwrap();
    assert_eq!(
        decode(&schema, &[0x08, 0x14, 0xff, 0xff]),
        Err(CodecError::InvalidTerminateIndex)
    );
}

#[test]
fn test_decode_reports_missing_required_field() {
    let err = decode(&data_later(false), &[0x08, 0x14]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Message does not contain a property for fieldNumber: 3."
    );
}

#[test]
fn test_decode_optional_fields_may_be_absent() {
    let schema = Schema::builder("/test/optional")
        .uint32("data", 1)
        .optional()
        .string("note", 2)
        .optional()
        .uint32("later", 3)
        .build()
        .unwrap();
    let decoded = decode(&schema, &[0x18, 0x05]).unwrap();
    assert_eq!(decoded, Object::new().with("later", 5u32));
    // out of order even though both fields are optional
    assert_eq!(
        decode(&schema, &[0x18, 0x05, 0x08, 0x01]),
        Err(CodecError::InvalidFieldNumber)
    );
}

#[test]
fn test_decode_rejects_invalid_boolean() {
    let schema = Schema::builder("/test/bool").boolean("flag", 1).build().unwrap();
    let err = decode(&schema, &[0x08, 0x02]).unwrap_err();
    assert_eq!(err.to_string(), "Invalid boolean bytes.");
    assert_eq!(
        decode(&schema, &[0x08, 0x01]).unwrap(),
        Object::new().with("flag", true)
    );
}

#[test]
fn test_packed_array_absent_versus_empty() {
    let schema = with_packed_list();
    // absent key: empty list
    let decoded = decode(&schema, &[0x08, 0x14]).unwrap();
    assert_eq!(decoded.get_list("list").unwrap(), &[] as &[Value]);
    assert_eq!(encode(&schema, &decoded).unwrap(), vec![0x08, 0x14]);

    // key without a length
    assert_eq!(
        decode(&schema, &[0x08, 0x14, 0x12]).unwrap_err().to_string(),
        "Invalid buffer length"
    );
    // key with a zero length
    assert_eq!(
        decode(&schema, &[0x08, 0x14, 0x12, 0x00]),
        Err(CodecError::InvalidBufferLength)
    );
}

#[test]
fn test_array_layouts() {
    let schema = with_packed_list();
    let value = Object::new()
        .with("data", 1u32)
        .with("list", vec![Value::from(1u32), Value::from(300u32)]);
    assert_eq!(
        encode(&schema, &value).unwrap(),
        vec![0x08, 0x01, 0x12, 0x03, 0x01, 0xac, 0x02]
    );

    let names = Schema::builder("/test/names")
        .array_of("names", 1, DataType::String)
        .build()
        .unwrap();
    let value = Object::new().with("names", vec![Value::from("a"), Value::from("b")]);
    let bytes = encode(&names, &value).unwrap();
    assert_eq!(bytes, vec![0x0a, 0x01, b'a', 0x0a, 0x01, b'b']);
    assert_eq!(decode(&names, &bytes).unwrap(), value);
}

#[test]
fn test_decode_out_of_range_sint() {
    let schema = Schema::builder("/test/sint").sint32("value", 1).build().unwrap();
    let mut bytes = Vec::new();
    write_s64(i64::MAX, &mut bytes);
    let err = decode(&schema, &bytes).unwrap_err();
    assert_eq!(err.to_string(), "Value out of range of uint32");
}

#[test]
fn test_encode_requires_required_properties() {
    let err = encode(&data_later(false), &Object::new().with("data", 1u32)).unwrap_err();
    assert_eq!(err, CodecError::MissingProperty("later".into()));
    let err = encode(&data_later(false), &Object::new().with("data", "x").with("later", 1u32))
        .unwrap_err();
    assert!(matches!(err, CodecError::TypeMismatch { .. }));
}

#[test]
fn test_json_mapping() {
    let schema = sample_schema();
    let value = Object::new()
        .with("a", 7u32)
        .with("b", -5i64)
        .with("c", "hi")
        .with("d", vec![0xdeu8, 0xad])
        .with("e", true)
        .with("f", vec![Value::from(u64::MAX)])
        .with("g", Vec::<Value>::new())
        .with("h", Object::new().with("x", -1i32).with("y", vec![1u8]))
        .with("i", Vec::<Value>::new());
    let json = to_json(&schema, &value).unwrap();
    assert_eq!(json["b"], json!("-5"));
    assert_eq!(json["d"], json!("dead"));
    assert_eq!(json["f"], json!(["18446744073709551615"]));
    assert_eq!(json["h"]["x"], json!(-1));
    assert_eq!(from_json(&schema, &json).unwrap(), value);

    let bad = json!({ "a": 1, "unknown": 2 });
    assert_eq!(
        from_json(&schema, &bad),
        Err(CodecError::UnknownProperty("unknown".into()))
    );
}

#[test]
fn test_validate_checks_length_bounds() {
    let schema = Schema::builder("/test/bounded")
        .bytes("chainID", 1)
        .exact_length(4)
        .build()
        .unwrap();
    assert!(validate(&schema, &Object::new().with("chainID", vec![0u8; 4])).is_ok());
    assert!(matches!(
        validate(&schema, &Object::new().with("chainID", vec![0u8; 3])),
        Err(CodecError::LengthBounds { length: 3, .. })
    ));
    assert_eq!(
        validate(&schema, &Object::new()),
        Err(CodecError::MissingProperty("chainID".into()))
    );
}

fn inner_schema() -> Arc<Schema> {
    Arc::new(
        Schema::builder("/test/inner")
            .sint32("x", 1)
            .bytes("y", 2)
            .build()
            .unwrap(),
    )
}

fn sample_schema() -> Schema {
    Schema::builder("/test/sample")
        .uint32("a", 1)
        .sint64("b", 2)
        .string("c", 3)
        .bytes("d", 4)
        .boolean("e", 5)
        .array_of("f", 6, DataType::UInt64)
        .array_of("g", 7, DataType::String)
        .object("h", 8, inner_schema())
        .array_of_objects("i", 9, inner_schema())
        .build()
        .unwrap()
}

prop_compose! {
    fn arb_inner()(x in any::<i32>(), y in vec(any::<u8>(), 0..8)) -> Object {
        Object::new().with("x", x).with("y", y)
    }
}

prop_compose! {
    fn arb_sample()(
        a in any::<u32>(),
        b in any::<i64>(),
        c in ".{0,12}",
        d in vec(any::<u8>(), 0..16),
        e in any::<bool>(),
        f in vec(any::<u64>(), 0..4),
        g in vec(".{0,5}", 0..3),
        h in arb_inner(),
        i in vec(arb_inner(), 0..3),
    ) -> Object {
        Object::new()
            .with("a", a)
            .with("b", b)
            .with("c", c)
            .with("d", d)
            .with("e", e)
            .with("f", f.into_iter().map(Value::from).collect::<Vec<_>>())
            .with("g", g.into_iter().map(Value::from).collect::<Vec<_>>())
            .with("h", h)
            .with("i", object_list(i))
    }
}

proptest! {
    #[test]
    fn prop_decode_inverts_encode(value in arb_sample()) {
        let schema = sample_schema();
        let bytes = encode(&schema, &value).unwrap();
        let decoded = decode(&schema, &bytes).unwrap();
        prop_assert_eq!(&decoded, &value);
        // canonical: re-encoding reproduces the bytes exactly
        prop_assert_eq!(encode(&schema, &decoded).unwrap(), bytes);
        let json = to_json(&schema, &decoded).unwrap();
        prop_assert_eq!(from_json(&schema, &json).unwrap(), value);
    }

    #[test]
    fn prop_out_of_order_pairs_fail(first in any::<u32>(), second in any::<u32>()) {
        let schema = Schema::builder("/test/pair").uint32("a", 1).uint32("b", 2).build().unwrap();
        let mut bytes = vec![0x10];
        varint::write_u32(second, &mut bytes);
        bytes.push(0x08);
        varint::write_u32(first, &mut bytes);
        prop_assert_eq!(decode(&schema, &bytes), Err(CodecError::InvalidFieldNumber));
    }

    #[test]
    fn prop_boolean_is_strict(byte in 2u8..) {
        let schema = Schema::builder("/test/bool").boolean("flag", 1).build().unwrap();
        prop_assert_eq!(decode(&schema, &[0x08, byte]), Err(CodecError::InvalidBoolean));
    }
}
