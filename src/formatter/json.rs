//! JSON text rendering for flattened cells
//!
//! Lists and depth-limited sub-documents are stored in a single cell as
//! JSON text with a space after each item separator and each key
//! separator, e.g. `["a", "b"]` and `{"k": 1}`.

use std::io;

use mongodb::bson::Bson;
use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_json::ser::Formatter;

use super::bson_utils::{BsonConverter, JsonConverter};

/// Compact JSON formatter that spaces out `,` and `:` separators
#[derive(Debug, Default, Clone, Copy)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize a JSON value with spaced separators
///
/// Non-ASCII characters are written as UTF-8, not escaped.
///
/// # Arguments
/// * `value` - JSON value to serialize
///
/// # Returns
/// * `String` - JSON text
pub fn to_spaced_json(value: &JsonValue) -> String {
    let mut buf = Vec::with_capacity(64);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);

    // Serializing a Value into memory only fails on non-string map keys,
    // which a Value cannot hold
    if value.serialize(&mut serializer).is_err() {
        return value.to_string();
    }

    String::from_utf8(buf).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Renders BSON containers as spaced JSON text
pub struct JsonTextFormatter {
    converter: JsonConverter,
}

impl JsonTextFormatter {
    /// Create a new JSON text formatter
    pub fn new() -> Self {
        Self {
            converter: JsonConverter::new(),
        }
    }

    /// Render a BSON value as spaced JSON text
    pub fn format(&self, value: &Bson) -> String {
        to_spaced_json(&self.converter.convert(value))
    }
}

impl Default for JsonTextFormatter {
    fn default() -> Self {
        Self::new()
    }
}
