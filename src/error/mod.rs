//! Error handling for the exporter.
//!
//! - Run-level errors (connection, configuration) abort the process
//! - Job-level errors (export, storage, encoding) are recorded per collection
//! - MongoDB driver errors are rendered from the driver's typed error kinds
//!
//! # Example
//!
//! ```rust
//! use mongo_flatten_export::error::{ExportError, ExporterError, Result};
//!
//! fn missing(name: &str) -> Result<()> {
//!     Err(ExportError::CollectionNotFound(name.to_string()).into())
//! }
//!
//! let err = missing("orders").unwrap_err();
//! assert!(matches!(err, ExporterError::Export(_)));
//! ```

pub mod kinds;
pub mod mongo;

// Re-export commonly used types
pub use kinds::{
    ConfigError, ConnectionError, ExportError, ExporterError, Result, StorageError,
    StorageErrorKind,
};
pub use mongo::ErrorInfo;
