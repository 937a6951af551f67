//! Object storage for finished export files
//!
//! Uploads go through the [`ObjectStore`] trait. Two stores ship with the
//! crate:
//! - [`LocalObjectStore`]: buckets are directories under a root, which also
//!   covers buckets mounted into the filesystem
//! - [`MemoryObjectStore`]: an in-process store for tests

use std::path::Path;

use async_trait::async_trait;

use crate::config::ExportFormat;
use crate::error::{Result, StorageError, StorageErrorKind};

pub mod local;
pub mod memory;

pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;

/// Metadata of a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub key: String,
    pub size: u64,
    pub content_type: Option<String>,
}

/// Trait for object storage operations
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file
    ///
    /// # Arguments
    /// * `bucket` - Destination bucket
    /// * `key` - Destination object key
    /// * `path` - Local file to upload
    /// * `content_type` - Content type recorded on the object
    ///
    /// # Returns
    /// * `Result<ObjectMetadata>` - Metadata of the stored object
    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<ObjectMetadata>;

    /// List objects whose key starts with `prefix`, sorted by key
    async fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<ObjectMetadata>>;

    /// Human-readable location of an object
    fn location(&self, bucket: &str, key: &str) -> String;
}

/// Object key of a collection export: `<prefix>/<collection>.<ext>`
///
/// Leading and trailing slashes of the prefix are ignored; an empty prefix
/// yields a bare file name.
pub fn object_key(prefix: &str, collection: &str, format: ExportFormat) -> String {
    let file_name = format!("{collection}.{}", format.extension());
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        file_name
    } else {
        format!("{prefix}/{file_name}")
    }
}

/// Reject keys that could escape the bucket
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.split('/').any(|part| part.is_empty() || part == "." || part == "..");

    if bad {
        return Err(StorageError::new(
            StorageErrorKind::InvalidInput,
            format!("invalid object key '{key}'"),
        )
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key() {
        assert_eq!(
            object_key("brazilian-ecommerce-exports", "orders", ExportFormat::Csv),
            "brazilian-ecommerce-exports/orders.csv"
        );
        assert_eq!(
            object_key("/a/b/", "orders", ExportFormat::Parquet),
            "a/b/orders.parquet"
        );
        assert_eq!(object_key("", "orders", ExportFormat::Csv), "orders.csv");
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("exports/orders.csv").is_ok());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("/abs").is_err());
        assert!(validate_key("a//b").is_err());
        assert!(validate_key("").is_err());
    }
}
