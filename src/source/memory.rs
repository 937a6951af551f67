//! In-memory document source
//!
//! Serves fixed documents per collection. Used by tests and by anything
//! that wants to run the export pipeline without a server.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::Document;

use super::streaming::{BufferedStreamingQuery, StreamingQuery};
use super::{CollectionSource, SourceFactory};
use crate::error::{ConnectionError, Result};

#[derive(Debug, Clone, Default)]
struct MemoryCollection {
    documents: Arc<Vec<Document>>,
    reported_count: Option<u64>,
}

/// Source factory over in-memory collections
#[derive(Debug, Clone)]
pub struct MemorySourceFactory {
    collections: HashMap<String, MemoryCollection>,
    batch_size: usize,
    unreachable: bool,
}

impl MemorySourceFactory {
    pub fn new() -> Self {
        Self {
            collections: HashMap::new(),
            batch_size: 1000,
            unreachable: false,
        }
    }

    /// Add a collection holding `documents` in natural order
    pub fn with_collection(
        mut self,
        name: impl Into<String>,
        documents: impl IntoIterator<Item = Document>,
    ) -> Self {
        self.collections.insert(
            name.into(),
            MemoryCollection {
                documents: Arc::new(documents.into_iter().collect()),
                reported_count: None,
            },
        );
        self
    }

    /// Make `count` report a fixed number regardless of the stored documents
    pub fn with_reported_count(mut self, name: &str, count: u64) -> Self {
        if let Some(collection) = self.collections.get_mut(name) {
            collection.reported_count = Some(count);
        }
        self
    }

    /// Batch size handed out by scans
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Make `list_collections` fail as if the server were down
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }
}

impl Default for MemorySourceFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceFactory for MemorySourceFactory {
    async fn list_collections(&self) -> Result<Vec<String>> {
        if self.unreachable {
            return Err(ConnectionError::ConnectionFailed("server unreachable".to_string()).into());
        }

        let mut names: Vec<String> = self.collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn open(&self, collection: &str) -> Result<Box<dyn CollectionSource>> {
        let data = self.collections.get(collection).cloned().unwrap_or_default();
        Ok(Box::new(MemoryCollectionSource {
            name: collection.to_string(),
            data,
            batch_size: self.batch_size,
        }))
    }
}

struct MemoryCollectionSource {
    name: String,
    data: MemoryCollection,
    batch_size: usize,
}

#[async_trait]
impl CollectionSource for MemoryCollectionSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn count(&self, limit: Option<u64>) -> Result<u64> {
        let count = self
            .data
            .reported_count
            .unwrap_or(self.data.documents.len() as u64);
        Ok(limit.map_or(count, |l| count.min(l)))
    }

    async fn scan(&self, limit: Option<u64>) -> Result<Box<dyn StreamingQuery>> {
        let take = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));
        let docs = self.data.documents.iter().take(take).cloned();
        Ok(Box::new(BufferedStreamingQuery::new(docs, self.batch_size)))
    }
}
