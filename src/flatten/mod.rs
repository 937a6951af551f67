//! Document flattening
//!
//! Turns a nested BSON document into a single-level row of text cells.
//! Nested documents are expanded into `parent_child` columns up to a depth
//! limit; lists and anything past the limit are stored as JSON text.
//!
//! # Example
//!
//! ```rust
//! use mongo_flatten_export::flatten::Flattener;
//! use mongodb::bson::doc;
//!
//! let row = Flattener::new(3).flatten(&doc! { "a": { "b": 1 }, "tags": ["x", "y"] });
//! assert_eq!(row["a_b"], "1");
//! assert_eq!(row["tags"], r#"["x", "y"]"#);
//! ```

use std::collections::BTreeMap;

use mongodb::bson::{Bson, Document};

use crate::formatter::{BsonConverter, CellTextConverter, JsonTextFormatter};

/// Default nesting depth expanded into separate columns
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Separator placed between parent and child keys
pub const KEY_SEPARATOR: &str = "_";

/// One flattened document: column name to cell text
pub type FlatRow = BTreeMap<String, String>;

/// Shape of a BSON value as seen by the flattener
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind<'a> {
    /// Null or undefined
    Null,
    /// Any non-container value
    Scalar(&'a Bson),
    /// Nested document
    Document(&'a Document),
    /// Array
    List(&'a [Bson]),
}

impl<'a> FieldKind<'a> {
    /// Classify a BSON value
    pub fn of(value: &'a Bson) -> Self {
        match value {
            Bson::Null | Bson::Undefined => FieldKind::Null,
            Bson::Document(doc) => FieldKind::Document(doc),
            Bson::Array(items) => FieldKind::List(items),
            other => FieldKind::Scalar(other),
        }
    }
}

/// Flattens documents into rows of text cells
pub struct Flattener {
    max_depth: usize,
    text: CellTextConverter,
    json: JsonTextFormatter,
}

impl Flattener {
    /// Create a flattener expanding at most `max_depth` levels of nesting
    ///
    /// # Arguments
    /// * `max_depth` - Nesting levels expanded into columns; 0 keeps every
    ///   sub-document as JSON text
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            text: CellTextConverter::new(),
            json: JsonTextFormatter::new(),
        }
    }

    /// Flatten one document into a row
    ///
    /// # Arguments
    /// * `doc` - Document to flatten
    ///
    /// # Returns
    /// * `FlatRow` - Column name to cell text; no value in it is nested
    pub fn flatten(&self, doc: &Document) -> FlatRow {
        let mut row = FlatRow::new();
        self.flatten_into(doc, "", 0, &mut row);
        row
    }

    /// Flatten `doc` into `out`, prefixing every key with `prefix`
    ///
    /// When two paths collide on the same column name the later one wins.
    pub fn flatten_into(&self, doc: &Document, prefix: &str, depth: usize, out: &mut FlatRow) {
        for (key, value) in doc {
            let column = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}{KEY_SEPARATOR}{key}")
            };

            match FieldKind::of(value) {
                FieldKind::Document(nested) if depth < self.max_depth => {
                    self.flatten_into(nested, &column, depth + 1, out);
                }
                // Empty containers past the depth limit
                FieldKind::Document(nested) if nested.is_empty() => {
                    out.insert(column, String::new());
                }
                FieldKind::List(items) if items.is_empty() => {
                    out.insert(column, String::new());
                }
                FieldKind::Document(_) | FieldKind::List(_) => {
                    out.insert(column, self.json.format(value));
                }
                FieldKind::Null => {
                    out.insert(column, String::new());
                }
                FieldKind::Scalar(scalar) => {
                    out.insert(column, self.text.convert(scalar));
                }
            }
        }
    }
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}
