use std::{fmt, io};

use crate::error::mongo::format_mongodb_error;

/// Crate-wide `Result` type using [`ExporterError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Top-level error type for export operations.
///
/// Connection and configuration errors abort a run before any job starts.
/// Everything else is caught at the job boundary and recorded on the job
/// result.
#[derive(Debug)]
pub enum ExporterError {
    /// Connection-related errors.
    Connection(ConnectionError),

    /// Configuration errors.
    Config(ConfigError),

    /// Per-collection export errors.
    Export(ExportError),

    /// Object storage errors.
    Storage(StorageError),

    /// I/O errors.
    Io(io::Error),

    /// MongoDB driver errors.
    MongoDb(mongodb::error::Error),

    /// Arrow conversion errors.
    Arrow(arrow::error::ArrowError),

    /// Parquet encoding errors.
    Parquet(parquet::errors::ParquetError),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Connection-specific errors.
#[derive(Debug)]
pub enum ConnectionError {
    /// Failed to establish a connection.
    ConnectionFailed(String),

    /// Invalid connection URI.
    InvalidUri(String),

    /// Not currently connected to MongoDB.
    NotConnected,

    /// Ping command failed.
    PingFailed(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Missing required field.
    MissingField(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Errors raised while exporting a single collection.
#[derive(Debug)]
pub enum ExportError {
    /// The collection does not exist in the source database.
    CollectionNotFound(String),

    /// The collection reported documents but the schema pass read none.
    EmptySample(String),

    /// Writing the output file failed.
    WriteFailed(String),

    /// Uploading the finished file failed.
    UploadFailed(String),
}

/// Object storage error.
#[derive(Debug, Clone)]
pub struct StorageError {
    pub kind: StorageErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    NotFound,
    PermissionDenied,
    InvalidInput,
    Io,
}

impl StorageError {
    pub fn new(kind: StorageErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ExporterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExporterError::Connection(e) => write!(f, "Connection error: {e}"),
            ExporterError::Config(e) => write!(f, "Configuration error: {e}"),
            ExporterError::Export(e) => write!(f, "Export error: {e}"),
            ExporterError::Storage(e) => write!(f, "Storage error: {e}"),
            ExporterError::Io(e) => write!(f, "I/O error: {e}"),
            ExporterError::MongoDb(e) => format_mongodb_error(f, e),
            ExporterError::Arrow(e) => write!(f, "Arrow error: {e}"),
            ExporterError::Parquet(e) => write!(f, "Parquet error: {e}"),
            ExporterError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::ConnectionFailed(msg) => write!(f, "Failed to connect: {msg}"),
            ConnectionError::InvalidUri(msg) => write!(f, "Invalid connection URI: {msg}"),
            ConnectionError::NotConnected => write!(f, "Not connected to MongoDB"),
            ConnectionError::PingFailed(msg) => write!(f, "Ping failed: {msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::MissingField(field) => write!(f, "Missing required field: {field}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::CollectionNotFound(name) => {
                write!(f, "Collection '{name}' not found in database")
            }
            ExportError::EmptySample(name) => {
                write!(f, "No documents returned while sampling schema of '{name}'")
            }
            ExportError::WriteFailed(msg) => write!(f, "Write failed: {msg}"),
            ExportError::UploadFailed(msg) => write!(f, "Upload failed: {msg}"),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ExporterError {}
impl std::error::Error for ConnectionError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for ExportError {}
impl std::error::Error for StorageError {}

/* ========================= Conversions to ExporterError ========================= */

impl From<io::Error> for ExporterError {
    fn from(err: io::Error) -> Self {
        ExporterError::Io(err)
    }
}

impl From<mongodb::error::Error> for ExporterError {
    fn from(err: mongodb::error::Error) -> Self {
        ExporterError::MongoDb(err)
    }
}

impl From<arrow::error::ArrowError> for ExporterError {
    fn from(err: arrow::error::ArrowError) -> Self {
        ExporterError::Arrow(err)
    }
}

impl From<parquet::errors::ParquetError> for ExporterError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        ExporterError::Parquet(err)
    }
}

impl From<ConnectionError> for ExporterError {
    fn from(err: ConnectionError) -> Self {
        ExporterError::Connection(err)
    }
}

impl From<ConfigError> for ExporterError {
    fn from(err: ConfigError) -> Self {
        ExporterError::Config(err)
    }
}

impl From<ExportError> for ExporterError {
    fn from(err: ExportError) -> Self {
        ExporterError::Export(err)
    }
}

impl From<StorageError> for ExporterError {
    fn from(err: StorageError) -> Self {
        ExporterError::Storage(err)
    }
}

impl From<String> for ExporterError {
    fn from(msg: String) -> Self {
        ExporterError::Generic(msg)
    }
}

impl From<&str> for ExporterError {
    fn from(msg: &str) -> Self {
        ExporterError::Generic(msg.to_owned())
    }
}

impl From<io::Error> for StorageError {
    fn from(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            _ => StorageErrorKind::Io,
        };
        StorageError::new(kind, err.to_string())
    }
}
