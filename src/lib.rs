//! mongo-flatten-export library
//!
//! Exports MongoDB collections as flat tables. Nested documents are
//! flattened into underscore-joined columns, the columns of a collection are
//! reconciled into one sorted schema, and every row is written to a CSV or
//! Parquet file, optionally uploaded to an object store.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `connection`: MongoDB connection management
//! - `error`: Error types and handling
//! - `export`: Export coordinator, jobs and row writers
//! - `flatten`: Document flattening
//! - `formatter`: Cell text, JSON text and table rendering
//! - `schema`: Column schema reconciliation
//! - `source`: Document sources (MongoDB and in-memory)
//! - `storage`: Object stores for uploads
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use mongo_flatten_export::export::{ExportCoordinator, ExportSettings};
//! use mongo_flatten_export::source::MemorySourceFactory;
//! use mongodb::bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = MemorySourceFactory::new()
//!         .with_collection("customers", vec![doc! { "id": 1, "address": { "city": "Rio" } }]);
//!
//!     let coordinator = ExportCoordinator::new(Arc::new(source), ExportSettings::default());
//!     let summary = coordinator.run(&["customers".to_string()]).await?;
//!
//!     println!("{} rows exported", summary.total_rows());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod export;
pub mod flatten;
pub mod formatter;
pub mod schema;
pub mod source;
pub mod storage;

// Re-export commonly used types
pub use config::{Config, ExportFormat};
pub use connection::ConnectionManager;
pub use error::{ExporterError, Result};
pub use export::{ExportCoordinator, ExportSettings, RunSummary};
pub use flatten::{FlatRow, Flattener};
pub use schema::{ColumnSchema, SchemaMode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
