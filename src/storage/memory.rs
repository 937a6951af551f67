//! In-memory object store

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::{ObjectMetadata, ObjectStore, validate_key};
use crate::error::{Result, StorageError, StorageErrorKind};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
}

type BucketStorage = Arc<Mutex<HashMap<String, HashMap<String, StoredObject>>>>;

/// Object store keeping everything in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryObjectStore {
    storage: BucketStorage,
    rejected: Arc<Mutex<HashSet<String>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every upload to `key` with a permission error
    pub fn reject_key(&self, key: impl Into<String>) {
        lock(&self.rejected).insert(key.into());
    }

    /// Contents and content type of an object
    pub fn get_object(&self, bucket: &str, key: &str) -> Option<(Vec<u8>, String)> {
        lock(&self.storage)
            .get(bucket)
            .and_then(|b| b.get(key))
            .map(|o| (o.data.clone(), o.content_type.clone()))
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<ObjectMetadata> {
        validate_key(key)?;
        if lock(&self.rejected).contains(key) {
            return Err(StorageError::new(
                StorageErrorKind::PermissionDenied,
                format!("write to {bucket}/{key} denied"),
            )
            .into());
        }

        let data = tokio::fs::read(path).await.map_err(StorageError::from)?;
        let size = data.len() as u64;

        lock(&self.storage).entry(bucket.to_string()).or_default().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );

        Ok(ObjectMetadata {
            key: key.to_string(),
            size,
            content_type: Some(content_type.to_string()),
        })
    }

    async fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> Result<Vec<ObjectMetadata>> {
        let storage = lock(&self.storage);
        let bucket_map = storage.get(bucket).ok_or_else(|| {
            StorageError::new(StorageErrorKind::NotFound, format!("Bucket {bucket} not found"))
        })?;

        let mut objects: Vec<ObjectMetadata> = bucket_map
            .iter()
            .filter(|(key, _)| prefix.is_none_or(|p| key.starts_with(p)))
            .map(|(key, object)| ObjectMetadata {
                key: key.clone(),
                size: object.data.len() as u64,
                content_type: Some(object.content_type.clone()),
            })
            .collect();

        drop(storage);
        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    fn location(&self, bucket: &str, key: &str) -> String {
        format!("memory://{bucket}/{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_list() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.parquet");
        tokio::fs::write(&file, b"PAR1").await.unwrap();

        let store = MemoryObjectStore::new();
        store
            .put_file("b", "p/a.parquet", &file, "application/octet-stream")
            .await
            .unwrap();

        let (data, content_type) = store.get_object("b", "p/a.parquet").unwrap();
        assert_eq!(data, b"PAR1");
        assert_eq!(content_type, "application/octet-stream");

        let listed = store.list_objects("b", Some("p/")).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].size, 4);
        assert_eq!(store.location("b", "p/a.parquet"), "memory://b/p/a.parquet");
    }

    #[tokio::test]
    async fn test_rejected_key() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.csv");
        tokio::fs::write(&file, b"x").await.unwrap();

        let store = MemoryObjectStore::new();
        store.reject_key("p/a.csv");

        let err = store.put_file("b", "p/a.csv", &file, "text/csv").await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::ExporterError::Storage(StorageError {
                kind: StorageErrorKind::PermissionDenied,
                ..
            })
        ));
        assert!(store.get_object("b", "p/a.csv").is_none());
    }
}
