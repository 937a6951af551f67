//! Document sources
//!
//! The export pipeline reads collections through two traits so the same
//! coordinator runs against MongoDB or an in-memory fixture:
//! - [`SourceFactory`] lists collections and opens an independent handle per job
//! - [`CollectionSource`] counts and scans a single collection

use async_trait::async_trait;

use crate::error::Result;

pub mod memory;
pub mod mongo;
pub mod streaming;

pub use memory::MemorySourceFactory;
pub use mongo::MongoSourceFactory;
pub use streaming::{BufferedStreamingQuery, CursorStreamingQuery, StreamingQuery};

/// Read access to one collection
#[async_trait]
pub trait CollectionSource: Send + Sync {
    /// Collection name
    fn name(&self) -> &str;

    /// Number of documents the export will read
    ///
    /// # Arguments
    /// * `limit` - Optional cap on the count
    async fn count(&self, limit: Option<u64>) -> Result<u64>;

    /// Start a scan in natural order
    ///
    /// # Arguments
    /// * `limit` - Optional cap on the number of documents returned
    async fn scan(&self, limit: Option<u64>) -> Result<Box<dyn StreamingQuery>>;
}

/// Creates collection handles
#[async_trait]
pub trait SourceFactory: Send + Sync {
    /// Names of all collections in the source database
    async fn list_collections(&self) -> Result<Vec<String>>;

    /// Open an independent handle on `collection`
    ///
    /// Handles are never shared between concurrent jobs.
    async fn open(&self, collection: &str) -> Result<Box<dyn CollectionSource>>;
}
