//! BSON value conversion utilities
//!
//! Two conversion strategies share a common trait:
//! - Cell text conversion for scalar values written into CSV/Parquet cells
//! - JSON value conversion for lists and depth-limited sub-documents
//!
//! # Design
//!
//! The module uses a strategy pattern with a common trait `BsonConverter`
//! so the flattener can hold one converter per output shape.

mod converter;
mod helpers;
mod strategies;

pub use converter::{BsonConverter, BsonJsonConverter, BsonStringConverter};
pub use helpers::{datetime_to_text, format_boolean, format_double};
pub use strategies::{CellTextConverter, JsonConverter};

#[cfg(test)]
mod tests;
