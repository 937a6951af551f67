//! Directory-backed object store
//!
//! Bucket `b` with key `p/k` lives at `<root>/b/p/k`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{ObjectMetadata, ObjectStore, validate_key};
use crate::config::ExportFormat;
use crate::error::{Result, StorageError, StorageErrorKind};

/// Object store writing into a local directory tree
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        let mut path = self.root.join(bucket);
        for part in key.split('/') {
            path.push(part);
        }
        path
    }
}

/// Content type guessed from the object's extension
fn content_type_for(key: &str) -> &'static str {
    if key.ends_with(".csv") {
        ExportFormat::Csv.content_type()
    } else {
        ExportFormat::Parquet.content_type()
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<ObjectMetadata> {
        validate_key(key)?;
        let target = self.object_path(bucket, key);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StorageError::from)?;
        }
        let size = tokio::fs::copy(path, &target)
            .await
            .map_err(StorageError::from)?;
        debug!("Stored {} bytes at {}", size, target.display());

        Ok(ObjectMetadata {
            key: key.to_string(),
            size,
            content_type: Some(content_type.to_string()),
        })
    }

    async fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<ObjectMetadata>> {
        let bucket_dir = self.root.join(bucket);
        if !tokio::fs::try_exists(&bucket_dir).await.unwrap_or(false) {
            return Err(StorageError::new(
                StorageErrorKind::NotFound,
                format!("Bucket {bucket} not found under {}", self.root.display()),
            )
            .into());
        }

        let mut objects = Vec::new();
        let mut pending = vec![(bucket_dir, String::new())];

        while let Some((dir, key_prefix)) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await.map_err(StorageError::from)?;
            while let Some(entry) = entries.next_entry().await.map_err(StorageError::from)? {
                let name = entry.file_name().to_string_lossy().into_owned();
                let key = if key_prefix.is_empty() {
                    name
                } else {
                    format!("{key_prefix}/{name}")
                };

                let file_type = entry.file_type().await.map_err(StorageError::from)?;
                if file_type.is_dir() {
                    pending.push((entry.path(), key));
                } else if prefix.is_none_or(|p| key.starts_with(p)) {
                    let size = entry.metadata().await.map_err(StorageError::from)?.len();
                    objects.push(ObjectMetadata {
                        content_type: Some(content_type_for(&key).to_string()),
                        key,
                        size,
                    });
                }
            }
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    fn location(&self, bucket: &str, key: &str) -> String {
        self.object_path(bucket, key).display().to_string()
    }
}
