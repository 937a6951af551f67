//! MongoDB-backed document source

use async_trait::async_trait;
use mongodb::bson::{Document, doc};
use mongodb::options::{ClientOptions, CountOptions, FindOptions};
use mongodb::{Client, Collection};
use tracing::debug;

use super::streaming::{CursorStreamingQuery, StreamingQuery};
use super::{CollectionSource, SourceFactory};
use crate::error::{ConnectionError, Result};

/// Opens collection handles on a MongoDB database
///
/// The primary client only lists collections. Every [`open`](SourceFactory::open)
/// builds a fresh client from the shared options so concurrent jobs never
/// share a connection pool.
pub struct MongoSourceFactory {
    client: Client,
    options: ClientOptions,
    database: String,
    batch_size: u32,
}

impl MongoSourceFactory {
    /// Create a factory
    ///
    /// # Arguments
    /// * `client` - Connected primary client
    /// * `options` - Options the primary client was built from
    /// * `database` - Database to read
    /// * `batch_size` - Cursor batch size for scans
    pub fn new(client: Client, options: ClientOptions, database: String, batch_size: u32) -> Self {
        Self {
            client,
            options,
            database,
            batch_size: batch_size.max(1),
        }
    }
}

#[async_trait]
impl SourceFactory for MongoSourceFactory {
    async fn list_collections(&self) -> Result<Vec<String>> {
        let names = self
            .client
            .database(&self.database)
            .list_collection_names()
            .await
            .map_err(|e| ConnectionError::ConnectionFailed(e.to_string()))?;
        Ok(names)
    }

    async fn open(&self, collection: &str) -> Result<Box<dyn CollectionSource>> {
        let client = Client::with_options(self.options.clone())
            .map_err(|e| ConnectionError::ConnectionFailed(e.to_string()))?;
        let handle = client.database(&self.database).collection::<Document>(collection);
        debug!("Opened independent client for '{}'", collection);

        Ok(Box::new(MongoCollectionSource {
            name: collection.to_string(),
            collection: handle,
            batch_size: self.batch_size,
        }))
    }
}

/// One collection read through its own client
pub struct MongoCollectionSource {
    name: String,
    collection: Collection<Document>,
    batch_size: u32,
}

#[async_trait]
impl CollectionSource for MongoCollectionSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn count(&self, limit: Option<u64>) -> Result<u64> {
        let mut options = CountOptions::default();
        options.limit = limit;

        let count = self
            .collection
            .count_documents(doc! {})
            .with_options(options)
            .await?;
        Ok(count)
    }

    async fn scan(&self, limit: Option<u64>) -> Result<Box<dyn StreamingQuery>> {
        let mut options = FindOptions::default();
        options.limit = limit.map(|n| n.min(i64::MAX as u64) as i64);
        options.batch_size = Some(self.batch_size);

        let cursor = self
            .collection
            .find(doc! {})
            .with_options(options)
            .await?;

        Ok(Box::new(CursorStreamingQuery::new(
            cursor,
            self.batch_size,
            self.name.clone(),
        )))
    }
}
