//! mongo-flatten-export
//!
//! Exports MongoDB collections as flattened CSV or Parquet files.
//!
//! # Usage
//!
//! ```bash
//! # Export the default collections as CSV into ./exports
//! mongo-flatten-export mongodb://localhost:27017/brazilian-ecommerce
//!
//! # Parquet, four collections at a time, uploaded to a bucket
//! MONGO_URI=mongodb://localhost:27017 mongo-flatten-export \
//!     --format parquet --workers 4 --bucket my-bucket
//!
//! # Collections with their document counts
//! mongo-flatten-export mongodb://localhost:27017 list
//! ```

use std::sync::Arc;

use tracing::{Level, info, warn};

use mongo_flatten_export::cli::{CliInterface, Commands};
use mongo_flatten_export::config::Config;
use mongo_flatten_export::connection::ConnectionManager;
use mongo_flatten_export::error::{ConfigError, Result};
use mongo_flatten_export::export::{ExportCoordinator, ExportSettings, RemoteTarget};
use mongo_flatten_export::formatter::TableFormatter;
use mongo_flatten_export::source::MongoSourceFactory;
use mongo_flatten_export::storage::{LocalObjectStore, ObjectStore};

/// Application entry point
#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Dispatch the subcommand
///
/// # Returns
/// * `Result<i32>` - Process exit status or a fatal error
async fn run() -> Result<i32> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if cli.handle_subcommand()? {
        return Ok(0);
    }

    match cli.command() {
        Commands::List => list_collections(cli.config()).await,
        Commands::ListFiles => list_files(cli.config()).await,
        _ => run_export(&cli).await,
    }
}

/// Connect and verify the server
async fn connect(config: &Config) -> Result<ConnectionManager> {
    let uri = config.require_uri()?;
    let mut manager = ConnectionManager::new(uri.to_string(), config.connection_timeout());
    manager.connect().await?;
    Ok(manager)
}

/// Export every configured collection
async fn run_export(cli: &CliInterface) -> Result<i32> {
    let config = cli.config();
    let mut manager = connect(config).await?;

    let database = config.database();
    let source = MongoSourceFactory::new(
        manager.get_client()?.clone(),
        manager.client_options()?.clone(),
        database.clone(),
        config.export.batch_size,
    );

    let settings = ExportSettings::from_config(config, cli.show_progress());
    let mut coordinator = ExportCoordinator::new(Arc::new(source), settings);

    if let Some(bucket) = &config.remote.bucket {
        info!(
            "Uploading to bucket {} under {}",
            bucket,
            config.remote.root.display()
        );
        coordinator = coordinator.with_remote(RemoteTarget {
            store: Arc::new(LocalObjectStore::new(config.remote.root.clone())),
            bucket: bucket.clone(),
            prefix: config.remote.prefix.clone(),
        });
    }

    info!("Exporting from database {}", database);
    let summary = coordinator.run(&config.export.collections).await?;
    manager.disconnect().await?;

    println!("{}", TableFormatter::new().format_run_summary(&summary));
    let failed = summary.failed_collections();
    if failed.is_empty() {
        println!(
            "Exported {} documents from {} collection(s)",
            summary.total_rows(),
            summary.succeeded()
        );
    } else {
        warn!("{} collection(s) failed", failed.len());
        println!("Failed collections: {}", failed.join(", "));
    }

    Ok(summary.exit_code())
}

/// Print every collection with its document count
async fn list_collections(config: &Config) -> Result<i32> {
    let mut manager = connect(config).await?;
    let database = config.database();

    let counts = manager.collection_counts(&database).await?;
    manager.disconnect().await?;

    println!("Database: {}", database);
    println!("{}", TableFormatter::new().format_collection_counts(&counts));
    Ok(0)
}

/// Print objects already uploaded under the configured prefix
async fn list_files(config: &Config) -> Result<i32> {
    let bucket = config
        .remote
        .bucket
        .as_deref()
        .ok_or_else(|| ConfigError::MissingField("remote.bucket (or GCS_BUCKET)".to_string()))?;

    let store = LocalObjectStore::new(config.remote.root.clone());
    let prefix = config.remote.prefix.trim_matches('/');
    let prefix = (!prefix.is_empty()).then(|| format!("{prefix}/"));

    let objects = store.list_objects(bucket, prefix.as_deref()).await?;

    println!("{}", TableFormatter::new().format_object_listing(&objects));
    println!("{} object(s) in bucket {}", objects.len(), bucket);
    Ok(0)
}

/// Initialize logging system based on the configured level
///
/// # Arguments
/// * `cli` - CLI interface with logging settings
fn initialize_logging(cli: &CliInterface) {
    let level: Level = cli.config().logging.level.to_tracing_level();

    // Build subscriber with level filter
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    // Configure timestamps
    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
