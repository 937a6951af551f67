//! Streaming document scans
//!
//! A scan hands documents to the export job in batches so a collection is
//! never loaded into memory as a whole.

use std::collections::VecDeque;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::Cursor;
use mongodb::bson::Document;
use tracing::debug;

use crate::error::Result;

/// Trait for streaming scan results in batches
#[async_trait]
pub trait StreamingQuery: Send {
    /// Fetch the next batch of documents
    ///
    /// # Returns
    /// * `Result<Option<Vec<Document>>>` - Next batch of documents, or None if exhausted
    async fn next_batch(&mut self) -> Result<Option<Vec<Document>>>;

    /// Close the scan and release resources
    async fn close(&mut self) -> Result<()>;
}

/// Cursor-backed streaming scan over a MongoDB find
pub struct CursorStreamingQuery {
    cursor: Option<Cursor<Document>>,
    batch_size: u32,
    total_fetched: u64,
    collection: String,
    closed: bool,
}

impl CursorStreamingQuery {
    /// Create a new cursor streaming query
    ///
    /// # Arguments
    /// * `cursor` - MongoDB cursor from a find operation
    /// * `batch_size` - Number of documents to hand out per batch
    /// * `collection` - Collection name for logging
    pub fn new(cursor: Cursor<Document>, batch_size: u32, collection: impl Into<String>) -> Self {
        Self {
            cursor: Some(cursor),
            batch_size: batch_size.max(1),
            total_fetched: 0,
            collection: collection.into(),
            closed: false,
        }
    }
}

#[async_trait]
impl StreamingQuery for CursorStreamingQuery {
    async fn next_batch(&mut self) -> Result<Option<Vec<Document>>> {
        if self.closed {
            return Ok(None);
        }

        let cursor = match self.cursor.as_mut() {
            Some(c) => c,
            None => return Ok(None),
        };

        let mut batch = Vec::with_capacity(self.batch_size as usize);

        for _ in 0..self.batch_size {
            match cursor.try_next().await {
                Ok(Some(doc)) => batch.push(doc),
                Ok(None) => break,
                Err(e) => {
                    // Release the server cursor before surfacing the error
                    self.cursor = None;
                    self.closed = true;
                    return Err(e.into());
                }
            }
        }

        if batch.is_empty() {
            debug!(
                "Scan of '{}' exhausted after {} documents",
                self.collection, self.total_fetched
            );
            self.cursor = None;
            self.closed = true;
            Ok(None)
        } else {
            self.total_fetched += batch.len() as u64;
            debug!(
                "Fetched batch of {} documents from '{}' (total: {})",
                batch.len(),
                self.collection,
                self.total_fetched
            );
            Ok(Some(batch))
        }
    }

    async fn close(&mut self) -> Result<()> {
        if !self.closed {
            self.cursor = None;
            self.closed = true;
            debug!(
                "Closed scan of '{}' after fetching {} documents",
                self.collection, self.total_fetched
            );
        }
        Ok(())
    }
}

impl Drop for CursorStreamingQuery {
    fn drop(&mut self) {
        if !self.closed {
            debug!("CursorStreamingQuery dropped without explicit close");
            self.cursor = None;
        }
    }
}

/// Streaming scan over documents already held in memory
pub struct BufferedStreamingQuery {
    documents: VecDeque<Document>,
    batch_size: usize,
}

impl BufferedStreamingQuery {
    pub fn new(documents: impl IntoIterator<Item = Document>, batch_size: usize) -> Self {
        Self {
            documents: documents.into_iter().collect(),
            batch_size: batch_size.max(1),
        }
    }
}

#[async_trait]
impl StreamingQuery for BufferedStreamingQuery {
    async fn next_batch(&mut self) -> Result<Option<Vec<Document>>> {
        if self.documents.is_empty() {
            return Ok(None);
        }

        let take = self.batch_size.min(self.documents.len());
        Ok(Some(self.documents.drain(..take).collect()))
    }

    async fn close(&mut self) -> Result<()> {
        self.documents.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_streaming_query_trait_object() {
        fn _accepts_streaming_query(_query: Box<dyn StreamingQuery>) {}
    }

    #[tokio::test]
    async fn test_buffered_query_batches_in_order() {
        let docs = (0..5).map(|i| doc! { "i": i });
        let mut query = BufferedStreamingQuery::new(docs, 2);

        let mut sizes = Vec::new();
        let mut seen = Vec::new();
        while let Some(batch) = query.next_batch().await.unwrap() {
            sizes.push(batch.len());
            seen.extend(batch.iter().map(|d| d.get_i32("i").unwrap()));
        }

        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        query.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_buffered_query_empty() {
        let mut query = BufferedStreamingQuery::new(Vec::new(), 10);
        assert!(query.next_batch().await.unwrap().is_none());
    }
}
