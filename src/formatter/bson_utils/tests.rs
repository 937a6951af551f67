//! Tests for the BSON conversion strategies

use super::*;
use mongodb::bson::{
    Binary, Bson, DateTime, Decimal128, Regex, Timestamp, doc, oid::ObjectId, spec::BinarySubtype,
};
use serde_json::Value as JsonValue;

// ===== CellTextConverter Tests =====

#[test]
fn test_cell_text_scalars() {
    let converter = CellTextConverter::new();
    assert_eq!(converter.convert(&Bson::String("Ana".to_string())), "Ana");
    assert_eq!(converter.convert(&Bson::Int32(42)), "42");
    assert_eq!(converter.convert(&Bson::Int64(-7)), "-7");
    assert_eq!(converter.convert(&Bson::Double(19.9)), "19.9");
    assert_eq!(converter.convert(&Bson::Double(225.0)), "225.0");
    assert_eq!(converter.convert(&Bson::Boolean(true)), "True");
    assert_eq!(converter.convert(&Bson::Boolean(false)), "False");
}

#[test]
fn test_cell_text_null_and_undefined_are_empty() {
    let converter = CellTextConverter::new();
    assert_eq!(converter.convert(&Bson::Null), "");
    assert_eq!(converter.convert(&Bson::Undefined), "");
}

#[test]
fn test_cell_text_object_id_is_hex() {
    let converter = CellTextConverter::new();
    let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
    assert_eq!(
        converter.convert(&Bson::ObjectId(oid)),
        "507f1f77bcf86cd799439011"
    );
}

#[test]
fn test_cell_text_datetime_is_naive_utc() {
    let converter = CellTextConverter::new();
    assert_eq!(
        converter.convert(&Bson::DateTime(DateTime::from_millis(1_500_000_000_123))),
        "2017-07-14 02:40:00.123000"
    );
    assert_eq!(
        converter.convert(&Bson::DateTime(DateTime::from_millis(0))),
        "1970-01-01 00:00:00"
    );
}

#[test]
fn test_cell_text_bson_specific_scalars() {
    let converter = CellTextConverter::new();

    let bin = Binary {
        subtype: BinarySubtype::Generic,
        bytes: vec![0xde, 0xad],
    };
    assert_eq!(converter.convert(&Bson::Binary(bin)), "dead");

    let regex = Regex {
        pattern: "^a".to_string(),
        options: "i".to_string(),
    };
    assert_eq!(converter.convert(&Bson::RegularExpression(regex)), "/^a/i");

    let ts = Timestamp {
        time: 10,
        increment: 2,
    };
    assert_eq!(converter.convert(&Bson::Timestamp(ts)), "Timestamp(10, 2)");

    let dec: Decimal128 = "12.50".parse().unwrap();
    assert_eq!(converter.convert(&Bson::Decimal128(dec)), "12.50");
}

#[test]
fn test_cell_text_container_renders_spaced_json() {
    let converter = CellTextConverter::new();
    let value = Bson::Document(doc! { "a": 1, "b": ["x", "y"] });
    assert_eq!(converter.convert(&value), r#"{"a": 1, "b": ["x", "y"]}"#);
}

// ===== JsonConverter Tests =====

#[test]
fn test_json_converter_scalars() {
    let converter = JsonConverter::new();
    assert_eq!(
        converter.convert(&Bson::String("test".to_string())),
        JsonValue::String("test".to_string())
    );
    assert_eq!(converter.convert(&Bson::Int32(42)), JsonValue::from(42));
    assert_eq!(converter.convert(&Bson::Boolean(true)), JsonValue::Bool(true));
    assert_eq!(converter.convert(&Bson::Null), JsonValue::Null);
}

#[test]
fn test_json_converter_keeps_field_order() {
    let converter = JsonConverter::new();
    let value = converter.convert(&Bson::Document(doc! { "z": 1, "a": 2, "m": 3 }));

    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn test_json_converter_bson_types_become_strings() {
    let converter = JsonConverter::new();
    let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
    assert_eq!(
        converter.convert(&Bson::ObjectId(oid)),
        JsonValue::String("507f1f77bcf86cd799439011".to_string())
    );
    assert_eq!(
        converter.convert(&Bson::DateTime(DateTime::from_millis(1_500_000_000_000))),
        JsonValue::String("2017-07-14 02:40:00".to_string())
    );
}

#[test]
fn test_json_converter_decimal_stays_text() {
    let converter = JsonConverter::new();
    let dec: Decimal128 = "0.10".parse().unwrap();
    assert_eq!(
        converter.convert(&Bson::Decimal128(dec)),
        JsonValue::String("0.10".to_string())
    );
}
