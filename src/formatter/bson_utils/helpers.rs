//! Helper functions for BSON value conversion

use mongodb::bson::{Binary, DateTime};

/// Convert DateTime to naive UTC text
///
/// Seconds carry a six-digit fraction only when the value has one, so
/// `2017-07-14 02:40:00.123000` and `2017-07-14 02:40:00`.
///
/// # Arguments
/// * `dt` - BSON DateTime value
///
/// # Returns
/// Formatted string, or the raw milliseconds when out of range
pub fn datetime_to_text(dt: &DateTime) -> String {
    let millis = dt.timestamp_millis();
    match chrono::DateTime::<chrono::Utc>::from_timestamp_millis(millis) {
        Some(utc) if millis.rem_euclid(1000) == 0 => {
            utc.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string()
        }
        Some(utc) => utc.naive_utc().format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        None => millis.to_string(),
    }
}

/// Format a boolean as `True` or `False`
pub fn format_boolean(b: bool) -> String {
    let text = if b { "True" } else { "False" };
    text.to_string()
}

/// Convert Binary data to hexadecimal string
pub fn binary_to_hex(bin: &Binary) -> String {
    hex::encode(&bin.bytes)
}

/// Convert Binary data to Base64 string
pub fn binary_to_base64(bin: &Binary) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(&bin.bytes)
}

/// Format a double as shortest round-trip text
///
/// Whole numbers keep a trailing `.0` so a double column never reads as an
/// integer column (`225.0`, not `225`). Non-finite values fall back to
/// `NaN`, `inf`, `-inf`.
///
/// # Arguments
/// * `f` - Double value
///
/// # Returns
/// Formatted string
pub fn format_double(f: f64) -> String {
    serde_json::Number::from_f64(f)
        .map(|n| n.to_string())
        .unwrap_or_else(|| f.to_string())
}
