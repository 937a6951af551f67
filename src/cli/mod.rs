//! Command-line interface for mongo-flatten-export
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading (file, then environment, then flags)
//! - The `version` and `config` subcommands
//! - Connection string helpers

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::{Config, ExportFormat, LogLevel};
use crate::error::Result;

/// Extract database name from MongoDB connection URI
///
/// # Arguments
/// * `uri` - MongoDB connection URI
///
/// # Returns
/// * `Option<String>` - Database name if found in URI
pub fn extract_database_from_uri(uri: &str) -> Option<String> {
    // Format: mongodb://[username:password@]host[:port][/database][?options]
    if let Some(after_scheme) = uri.split("://").nth(1)
        && let Some(path_part) = after_scheme.split('/').nth(1)
    {
        let db_name = path_part.split('?').next().unwrap_or("");
        if !db_name.is_empty() {
            return Some(db_name.to_string());
        }
    }
    None
}

/// Sanitize URI by hiding credentials
///
/// # Arguments
/// * `uri` - The URI to sanitize
///
/// # Returns
/// * `String` - URI with everything between `://` and `@` replaced by `***`
pub fn sanitize_uri(uri: &str) -> String {
    if let Some(proto_end) = uri.find("://")
        && let Some(host_start) = uri.rfind('@')
        && host_start > proto_end
    {
        let proto = &uri[..proto_end + 3];
        let host = &uri[host_start..];
        return format!("{}***{}", proto, host);
    }

    if uri.contains('@') {
        "mongodb://***".to_string()
    } else {
        uri.to_string()
    }
}

/// Export MongoDB collections as flattened CSV or Parquet files
#[derive(Parser, Debug)]
#[command(
    name = "mongo-flatten-export",
    version,
    about = "Export MongoDB collections as flattened CSV or Parquet files",
    long_about = "Reads each requested collection, flattens nested documents into
underscore-joined columns and writes one CSV or Parquet file per collection,
optionally uploading it to a bucket."
)]
pub struct CliArgs {
    /// MongoDB connection URI (overrides MONGO_URI)
    ///
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    #[arg(value_name = "URI")]
    pub uri: Option<String>,

    /// Database name to export from
    #[arg(long, value_name = "NAME")]
    pub database: Option<String>,

    /// Collections to export, comma separated
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub collections: Option<Vec<String>>,

    /// Directory receiving the output files
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long, value_enum, value_name = "FORMAT")]
    pub format: Option<ExportFormat>,

    /// Maximum number of documents per collection
    #[arg(short = 'l', long, value_name = "N")]
    pub limit: Option<u64>,

    /// Number of collections exported concurrently
    #[arg(short = 'w', long, value_name = "N")]
    pub workers: Option<usize>,

    /// Nesting levels expanded into separate columns
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Derive the column schema from the first N documents only
    #[arg(long, value_name = "N")]
    pub schema_sample: Option<u64>,

    /// Documents fetched per cursor batch
    #[arg(long, value_name = "N")]
    pub batch_size: Option<u32>,

    /// Upload finished files to this bucket
    #[arg(long, value_name = "NAME")]
    pub bucket: Option<String>,

    /// Key prefix of uploaded objects
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Directory holding buckets
    #[arg(long, value_name = "DIR")]
    pub store_root: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Quiet mode (errors only, no progress bars)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Server selection timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for mongo-flatten-export
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Export the configured collections (default)
    Export,

    /// List collections with their document counts
    List,

    /// List objects already uploaded under the prefix
    ListFiles,

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Show version information
    Version,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args, |key| std::env::var(key).ok())?;
        Ok(Self { args, config })
    }

    /// Load configuration from file, environment and arguments
    ///
    /// The merged configuration is validated unless the `config`
    /// subcommand runs, which reports problems itself.
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    /// * `env` - Environment lookup
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config<F>(args: &CliArgs, env: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;
        config.apply_env_from(env);
        Self::apply_args_to_config(&mut config, args);

        if !matches!(args.command, Some(Commands::Config { .. })) {
            config.validate()?;
        }

        Ok(config)
    }

    /// Get the configuration
    ///
    /// # Returns
    /// * `&Config` - Reference to configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Subcommand to run, `export` when none was given
    pub fn command(&self) -> Commands {
        self.args.command.clone().unwrap_or(Commands::Export)
    }

    /// Whether progress bars should be drawn
    pub fn show_progress(&self) -> bool {
        !self.args.no_progress && !self.args.quiet
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    ///
    /// # Arguments
    /// * `config` - Configuration to modify
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_source_args(config, args);
        Self::apply_export_args(config, args);
        Self::apply_remote_args(config, args);
        Self::apply_logging_args(config, args);
    }

    /// Apply connection-related CLI arguments to configuration
    fn apply_source_args(config: &mut Config, args: &CliArgs) {
        if let Some(uri) = &args.uri {
            config.source.uri = Some(uri.clone());
        }
        if let Some(database) = &args.database {
            config.source.database = Some(database.clone());
        }
        if let Some(timeout) = args.timeout {
            config.source.timeout = timeout;
        }
    }

    /// Apply export-related CLI arguments to configuration
    fn apply_export_args(config: &mut Config, args: &CliArgs) {
        let export = &mut config.export;

        if let Some(collections) = &args.collections {
            export.collections = collections
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
        }
        if let Some(dir) = &args.output_dir {
            export.output_dir = dir.clone();
        }
        if let Some(format) = args.format {
            export.format = format;
        }
        if args.limit.is_some() {
            export.limit = args.limit;
        }
        if let Some(workers) = args.workers {
            export.workers = workers;
        }
        if let Some(depth) = args.max_depth {
            export.max_depth = depth;
        }
        if args.schema_sample.is_some() {
            export.schema_sample = args.schema_sample;
        }
        if let Some(batch_size) = args.batch_size {
            export.batch_size = batch_size;
        }
    }

    /// Apply remote storage CLI arguments to configuration
    fn apply_remote_args(config: &mut Config, args: &CliArgs) {
        if let Some(bucket) = &args.bucket {
            config.remote.bucket = Some(bucket.clone());
        }
        if let Some(prefix) = &args.prefix {
            config.remote.prefix = prefix.clone();
        }
        if let Some(root) = &args.store_root {
            config.remote.root = root.clone();
        }
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    /// Handle subcommands that need no database
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false to continue
    pub fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Show version information
    fn show_version(&self) {
        println!("mongo-flatten-export version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config();
        }

        if show || !validate {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate the effective configuration
    fn validate_config(&self) {
        let path = self.get_config_path();
        println!("Validating configuration: {}", path.display());

        match self.config.validate() {
            Ok(()) => println!("Configuration is valid"),
            Err(e) => println!("Configuration validation failed: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Configuration file: {}", path.display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml()?);

        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .as_deref()
            .map(Path::to_path_buf)
            .unwrap_or_else(Config::default_config_path)
    }
}
