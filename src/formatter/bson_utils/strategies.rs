//! Strategy implementations for BSON conversion
//!
//! - CellTextConverter: scalar text for flattened cells
//! - JsonConverter: JSON value conversion for lists and sub-documents
//!
//! Cell text follows the conventions of Python's `str()`: `True`/`False`
//! and naive UTC datetimes such as `2017-07-14 02:40:00.123000`.

use mongodb::bson::{Binary, Bson, DateTime, Decimal128, Document, Regex, Timestamp, oid::ObjectId};
use serde_json::Value as JsonValue;

use super::converter::{BsonConverter, BsonJsonConverter, BsonStringConverter};
use super::helpers::*;
use crate::formatter::json::JsonTextFormatter;

/// Plain text converter for flattened cells
///
/// Strings are written verbatim, numbers in their shortest form, and
/// BSON-specific scalars in a stable textual form. Containers that reach
/// this converter are rendered as JSON text.
pub struct CellTextConverter {
    json: JsonTextFormatter,
}

impl CellTextConverter {
    /// Create a new cell text converter
    pub fn new() -> Self {
        Self {
            json: JsonTextFormatter::new(),
        }
    }
}

impl Default for CellTextConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl BsonConverter for CellTextConverter {
    type Output = String;

    fn convert(&self, value: &Bson) -> String {
        self.convert_to_string(value)
    }
}

impl BsonStringConverter for CellTextConverter {
    fn format_string(&self, s: &str) -> String {
        s.to_string()
    }

    fn format_int32(&self, n: i32) -> String {
        n.to_string()
    }

    fn format_int64(&self, n: i64) -> String {
        n.to_string()
    }

    fn format_double(&self, f: f64) -> String {
        format_double(f)
    }

    fn format_boolean(&self, b: bool) -> String {
        format_boolean(b)
    }

    fn format_null(&self) -> String {
        String::new()
    }

    fn format_object_id(&self, oid: &ObjectId) -> String {
        oid.to_hex()
    }

    fn format_datetime(&self, dt: &DateTime) -> String {
        datetime_to_text(dt)
    }

    fn format_decimal128(&self, d: &Decimal128) -> String {
        d.to_string()
    }

    fn format_binary(&self, bin: &Binary) -> String {
        binary_to_hex(bin)
    }

    fn format_regex(&self, regex: &Regex) -> String {
        format!("/{}/{}", regex.pattern, regex.options)
    }

    fn format_timestamp(&self, ts: &Timestamp) -> String {
        format!("Timestamp({}, {})", ts.time, ts.increment)
    }

    fn format_container(&self, value: &Bson) -> String {
        self.json.format(value)
    }

    fn format_unknown(&self, value: &Bson) -> String {
        format!("{:?}", value)
    }
}

/// JSON value converter
///
/// Converts BSON values to standard JSON (serde_json::Value), keeping
/// document field order. BSON-specific types become plain strings.
#[derive(Debug, Default)]
pub struct JsonConverter;

impl JsonConverter {
    /// Create a new JSON converter
    pub fn new() -> Self {
        Self
    }
}

impl BsonConverter for JsonConverter {
    type Output = JsonValue;

    fn convert(&self, value: &Bson) -> JsonValue {
        self.convert_to_json(value)
    }
}

impl BsonJsonConverter for JsonConverter {
    fn convert_object_id(&self, oid: &ObjectId) -> JsonValue {
        JsonValue::String(oid.to_hex())
    }

    fn convert_datetime(&self, dt: &DateTime) -> JsonValue {
        JsonValue::String(datetime_to_text(dt))
    }

    fn convert_decimal128(&self, d: &Decimal128) -> JsonValue {
        // Kept as text: a JSON number would lose decimal precision
        JsonValue::String(d.to_string())
    }

    fn convert_array(&self, arr: &[Bson]) -> JsonValue {
        JsonValue::Array(arr.iter().map(|v| self.convert_to_json(v)).collect())
    }

    fn convert_document_to_json(&self, doc: &Document) -> JsonValue {
        let mut map = serde_json::Map::new();
        for (key, value) in doc.iter() {
            map.insert(key.clone(), self.convert_to_json(value));
        }
        JsonValue::Object(map)
    }

    fn convert_binary(&self, bin: &Binary) -> JsonValue {
        JsonValue::String(binary_to_base64(bin))
    }

    fn convert_regex(&self, regex: &Regex) -> JsonValue {
        JsonValue::String(format!("/{}/{}", regex.pattern, regex.options))
    }

    fn convert_timestamp(&self, ts: &Timestamp) -> JsonValue {
        serde_json::json!({ "t": ts.time, "i": ts.increment })
    }
}
