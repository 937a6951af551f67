//! Configuration management for the exporter
//!
//! This module handles loading, parsing, and managing configuration from various sources:
//! - Configuration files (TOML format)
//! - Environment variables (`MONGO_URI`, `MONGO_DATABASE`, `GCS_BUCKET`)
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::schema::SchemaMode;

/// Environment variable holding the MongoDB URI
pub const ENV_MONGO_URI: &str = "MONGO_URI";

/// Environment variable holding the database name
pub const ENV_MONGO_DATABASE: &str = "MONGO_DATABASE";

/// Environment variable holding the destination bucket
pub const ENV_BUCKET: &str = "GCS_BUCKET";

/// Database used when neither the config nor the URI names one
pub const DEFAULT_DATABASE: &str = "brazilian-ecommerce";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Source database settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Remote object storage settings
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Source database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// MongoDB connection URI
    #[serde(default)]
    pub uri: Option<String>,

    /// Database name
    #[serde(default)]
    pub database: Option<String>,

    /// Server selection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Collections to export, in order
    #[serde(default = "default_collections")]
    pub collections: Vec<String>,

    /// Directory receiving the output files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Output file format
    #[serde(default)]
    pub format: ExportFormat,

    /// Maximum number of documents per collection
    #[serde(default)]
    pub limit: Option<u64>,

    /// Number of collections exported concurrently
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Nesting levels expanded into separate columns
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Derive the schema from the first N documents instead of a full scan
    #[serde(default)]
    pub schema_sample: Option<u64>,

    /// Documents fetched per cursor batch
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,

    /// Rows per Parquet row group
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

/// Remote object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Destination bucket; uploads are disabled when unset
    #[serde(default)]
    pub bucket: Option<String>,

    /// Key prefix for uploaded objects
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Local directory holding buckets (a mounted bucket or a plain directory)
    #[serde(default = "default_store_root")]
    pub root: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Output file format
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma separated values with a header row
    #[default]
    Csv,

    /// Apache Parquet, every column stored as UTF-8 text
    Parquet,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_timeout() -> u64 {
    5
}

fn default_collections() -> Vec<String> {
    [
        "customers",
        "orders",
        "order_items",
        "order_payments",
        "order_reviews",
        "products",
        "sellers",
        "geolocation",
        "product_categories",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_workers() -> usize {
    1
}

fn default_max_depth() -> usize {
    crate::flatten::DEFAULT_MAX_DEPTH
}

fn default_batch_size() -> u32 {
    1000
}

fn default_row_group_size() -> usize {
    10_000
}

fn default_prefix() -> String {
    "brazilian-ecommerce-exports".to_string()
}

fn default_store_root() -> PathBuf {
    PathBuf::from("buckets")
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            uri: None,
            database: None,
            timeout: default_timeout(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            collections: default_collections(),
            output_dir: default_output_dir(),
            format: ExportFormat::default(),
            limit: None,
            workers: default_workers(),
            max_depth: default_max_depth(),
            schema_sample: None,
            batch_size: default_batch_size(),
            row_group_size: default_row_group_size(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            prefix: default_prefix(),
            root: default_store_root(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    ///
    /// An explicitly given path must exist. When no path is given the
    /// default location is tried and defaults are used if it is absent.
    ///
    /// # Arguments
    /// * `path` - Optional path to the configuration file
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_config_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an environment lookup
    ///
    /// Empty values are ignored.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of an environment variable
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(uri) = get(ENV_MONGO_URI) {
            self.source.uri = Some(uri);
        }
        if let Some(database) = get(ENV_MONGO_DATABASE) {
            self.source.database = Some(database);
        }
        if let Some(bucket) = get(ENV_BUCKET) {
            self.remote.bucket = Some(bucket);
        }
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        fn invalid(field: &str, value: impl ToString) -> crate::error::ExporterError {
            ConfigError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
            }
            .into()
        }

        if let Some(uri) = &self.source.uri
            && !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://"))
        {
            return Err(invalid("source.uri", crate::cli::sanitize_uri(uri)));
        }
        if self.source.timeout == 0 {
            return Err(invalid("source.timeout", self.source.timeout));
        }
        if self.export.collections.is_empty() {
            return Err(ConfigError::MissingField("export.collections".to_string()).into());
        }
        if let Some(name) = self.export.collections.iter().find(|c| c.trim().is_empty()) {
            return Err(invalid("export.collections", format!("{name:?}")));
        }
        if self.export.batch_size == 0 {
            return Err(invalid("export.batch_size", self.export.batch_size));
        }
        if self.export.row_group_size == 0 {
            return Err(invalid("export.row_group_size", self.export.row_group_size));
        }
        if self.export.limit == Some(0) {
            return Err(invalid("export.limit", 0));
        }
        if self.export.schema_sample == Some(0) {
            return Err(invalid("export.schema_sample", 0));
        }
        if let Some(bucket) = &self.remote.bucket
            && (bucket.trim().is_empty() || bucket.contains('/'))
        {
            return Err(invalid("remote.bucket", bucket));
        }

        Ok(())
    }

    /// The source URI, which has no default
    pub fn require_uri(&self) -> Result<&str> {
        self.source
            .uri
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField(format!("source.uri (or {ENV_MONGO_URI})")).into())
    }

    /// Database to export
    ///
    /// Priority: configured name, then the path of the URI, then
    /// [`DEFAULT_DATABASE`].
    pub fn database(&self) -> String {
        if let Some(db) = &self.source.database {
            return db.clone();
        }

        self.source
            .uri
            .as_deref()
            .and_then(crate::cli::extract_database_from_uri)
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string())
    }

    /// Schema discovery policy
    pub fn schema_mode(&self) -> SchemaMode {
        SchemaMode::from_sample(self.export.schema_sample)
    }

    /// Worker count, at least one
    pub fn workers(&self) -> usize {
        self.export.workers.max(1)
    }

    /// Server selection timeout as Duration
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout)
    }

    /// Serialize to TOML with credentials masked
    pub fn to_toml(&self) -> Result<String> {
        let mut shown = self.clone();
        shown.source.uri = shown.source.uri.as_deref().map(crate::cli::sanitize_uri);
        toml::to_string_pretty(&shown).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mongo-flatten-export")
            .join("config.toml")
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl ExportFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }

    /// Content type recorded on uploaded objects
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Parquet => "application/octet-stream",
        }
    }
}
