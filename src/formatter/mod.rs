//! Output formatting for the exporter
//!
//! - BSON scalar conversion for flattened cells
//! - Spaced JSON text for lists and depth-limited sub-documents
//! - Tables for run summaries and listings

pub mod bson_utils;
pub mod json;
pub mod table;

pub use bson_utils::{BsonConverter, CellTextConverter, JsonConverter};
pub use json::{JsonTextFormatter, to_spaced_json};
pub use table::{TableFormatter, TableStyle};

/// Format bytes as human-readable size
///
/// # Arguments
/// * `bytes` - Number of bytes
///
/// # Returns
/// * `String` - Formatted size (e.g., "1.50 MB")
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", size as u64, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}
