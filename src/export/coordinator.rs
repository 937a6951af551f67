//! Export coordinator for orchestrating collection exports
//!
//! Each requested collection becomes one job: count, discover the column
//! schema, stream again through the flattener into a row writer, then
//! optionally upload the finished file. Jobs run concurrently up to the
//! configured worker count and never abort each other.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::{StreamExt, stream};
use indicatif::MultiProgress;
use tempfile::TempDir;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::config::{Config, ExportFormat};
use crate::error::{ExportError, Result};
use crate::flatten::{DEFAULT_MAX_DEPTH, Flattener};
use crate::schema::{ColumnSchema, SchemaBuilder, SchemaMode};
use crate::source::{CollectionSource, SourceFactory};
use crate::storage::{ObjectStore, object_key};

use super::job::{JobResult, RunSummary};
use super::progress::ProgressTracker;
use super::writers::create_row_writer;

/// Settings shared by every job of a run
#[derive(Debug, Clone)]
pub struct ExportSettings {
    /// Directory receiving output files when nothing is uploaded
    pub output_dir: PathBuf,
    /// Output format
    pub format: ExportFormat,
    /// Maximum documents per collection
    pub limit: Option<u64>,
    /// Nesting levels expanded into columns
    pub max_depth: usize,
    /// Schema discovery policy
    pub schema_mode: SchemaMode,
    /// Rows per Parquet row group
    pub row_group_size: usize,
    /// Collections exported concurrently
    pub workers: usize,
    /// Draw progress bars
    pub show_progress: bool,
}

impl ExportSettings {
    /// Derive settings from the loaded configuration
    pub fn from_config(config: &Config, show_progress: bool) -> Self {
        Self {
            output_dir: config.export.output_dir.clone(),
            format: config.export.format,
            limit: config.export.limit,
            max_depth: config.export.max_depth,
            schema_mode: config.schema_mode(),
            row_group_size: config.export.row_group_size,
            workers: config.workers(),
            show_progress,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exports"),
            format: ExportFormat::Csv,
            limit: None,
            max_depth: DEFAULT_MAX_DEPTH,
            schema_mode: SchemaMode::FullScan,
            row_group_size: 10_000,
            workers: 1,
            show_progress: false,
        }
    }
}

/// Upload destination for finished files
#[derive(Clone)]
pub struct RemoteTarget {
    pub store: Arc<dyn ObjectStore>,
    pub bucket: String,
    pub prefix: String,
}

/// Where a job writes before any upload
struct OutputFile {
    path: PathBuf,
    /// Removed when the job ends
    _staging: Option<TempDir>,
}

/// Outcome of the write pass
struct WriteStats {
    rows: u64,
    bytes: u64,
    dropped_columns: usize,
}

/// Coordinator for export runs
///
/// Brings together the document source, flattener, schema reconciliation,
/// row writers and the optional object store.
pub struct ExportCoordinator {
    source: Arc<dyn SourceFactory>,
    settings: ExportSettings,
    remote: Option<RemoteTarget>,
    flattener: Flattener,
    progress: Option<MultiProgress>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    ///
    /// # Arguments
    /// * `source` - Factory opening one handle per job
    /// * `settings` - Run settings
    pub fn new(source: Arc<dyn SourceFactory>, settings: ExportSettings) -> Self {
        let flattener = Flattener::new(settings.max_depth);
        let progress = settings.show_progress.then(MultiProgress::new);
        Self {
            source,
            settings,
            remote: None,
            flattener,
            progress,
        }
    }

    /// Upload every finished file to `target`
    pub fn with_remote(mut self, target: RemoteTarget) -> Self {
        self.remote = Some(target);
        self
    }

    /// Export `collections`
    ///
    /// Listing the source's collections is the only fatal step; every
    /// later error is recorded on the job it belongs to.
    ///
    /// # Arguments
    /// * `collections` - Collection names in the order results are reported
    ///
    /// # Returns
    /// * `Result<RunSummary>` - One result per requested collection
    pub async fn run(&self, collections: &[String]) -> Result<RunSummary> {
        let available: HashSet<String> = self.source.list_collections().await?.into_iter().collect();
        let workers = self.settings.workers.max(1);

        info!(
            "Exporting {} collections as {} with {} worker(s)",
            collections.len(),
            self.settings.format.extension(),
            workers
        );

        let results: Vec<JobResult> = stream::iter(collections)
            .map(|name| {
                let span = info_span!("export", collection = %name);
                self.run_job(name, available.contains(name)).instrument(span)
            })
            .buffered(workers)
            .collect()
            .await;

        let summary = RunSummary::new(results);
        info!(
            "Run finished: {} succeeded, {} skipped, {} failed, {} documents",
            summary.succeeded(),
            summary.skipped(),
            summary.failed(),
            summary.total_rows()
        );

        Ok(summary)
    }

    /// Run one job and turn any error into a failed result
    async fn run_job(&self, name: &str, exists: bool) -> JobResult {
        let start = Instant::now();

        if !exists {
            let err = crate::error::ExporterError::from(ExportError::CollectionNotFound(name.to_string()));
            error!("{}", err);
            return JobResult::failed(name, err.to_string(), start.elapsed());
        }

        match self.export_collection(name, start).await {
            Ok(result) => result,
            Err(e) => {
                error!("Export of {} failed: {}", name, e);
                JobResult::failed(name, e.to_string(), start.elapsed())
            }
        }
    }

    async fn export_collection(&self, name: &str, start: Instant) -> Result<JobResult> {
        let source = self.source.open(name).await?;

        let total = source.count(self.settings.limit).await?;
        if total == 0 {
            warn!("Collection {} is empty, skipping", name);
            return Ok(JobResult::skipped(name, "empty collection", start.elapsed()));
        }
        info!("Exporting {} documents from {}", total, name);

        let schema = self.discover_schema(source.as_ref()).await?;
        let output = self.prepare_output(name).await?;

        let tracker = ProgressTracker::new(self.progress.as_ref(), name, total);
        let outcome = self
            .write_collection(source.as_ref(), &schema, &output.path, &tracker)
            .await;
        tracker.finish();
        let stats = outcome?;

        let location = match &self.remote {
            Some(remote) => self.upload(remote, name, &output.path).await?,
            None => output.path.display().to_string(),
        };

        info!(
            "Exported {} documents ({:.2} MB) to {}",
            stats.rows,
            stats.bytes as f64 / (1024.0 * 1024.0),
            location
        );
        if stats.dropped_columns > 0 {
            warn!(
                "{} column(s) outside the discovered schema were dropped",
                stats.dropped_columns
            );
        }

        Ok(JobResult::succeeded(
            name,
            stats.rows,
            stats.bytes,
            Some(location),
            stats.dropped_columns,
            start.elapsed(),
        ))
    }

    /// First pass: collect the columns of the scanned documents
    async fn discover_schema(&self, source: &dyn CollectionSource) -> Result<ColumnSchema> {
        let scan_limit = self.settings.schema_mode.scan_limit(self.settings.limit);
        let mut scan = source.scan(scan_limit).await?;
        let mut builder = SchemaBuilder::new();

        while let Some(docs) = scan.next_batch().await? {
            for doc in &docs {
                builder.observe(&self.flattener.flatten(doc));
            }
        }
        scan.close().await?;

        if builder.rows_seen() == 0 {
            return Err(ExportError::EmptySample(source.name().to_string()).into());
        }

        let rows_seen = builder.rows_seen();
        let schema = builder.finish();
        debug!(
            "Schema of {} has {} columns from {} documents",
            source.name(),
            schema.len(),
            rows_seen
        );
        Ok(schema)
    }

    /// Output file path, staged in a temporary directory when uploading
    async fn prepare_output(&self, name: &str) -> Result<OutputFile> {
        let file_name = format!("{}.{}", name, self.settings.format.extension());

        if self.remote.is_some() {
            let staging = tempfile::Builder::new()
                .prefix("mongo-flatten-export-")
                .tempdir()?;
            return Ok(OutputFile {
                path: staging.path().join(file_name),
                _staging: Some(staging),
            });
        }

        tokio::fs::create_dir_all(&self.settings.output_dir).await?;
        Ok(OutputFile {
            path: self.settings.output_dir.join(file_name),
            _staging: None,
        })
    }

    /// Second pass: flatten, project and write every document in source order
    async fn write_collection(
        &self,
        source: &dyn CollectionSource,
        schema: &ColumnSchema,
        path: &Path,
        tracker: &ProgressTracker,
    ) -> Result<WriteStats> {
        let mut writer = create_row_writer(
            self.settings.format,
            path,
            schema,
            self.settings.row_group_size,
        )
        .await?;
        let mut scan = source.scan(self.settings.limit).await?;

        let mut dropped: HashSet<String> = HashSet::new();
        let mut exported = 0u64;
        let mut batch_count = 0u32;

        while let Some(docs) = scan.next_batch().await? {
            let mut rows = Vec::with_capacity(docs.len());
            for doc in &docs {
                let flat = self.flattener.flatten(doc);
                dropped.extend(schema.unknown_columns(&flat).cloned());
                rows.push(schema.materialize(&flat));
            }

            writer.write_rows(&rows).await?;
            exported += rows.len() as u64;
            tracker.update(exported);
            batch_count += 1;

            // Log progress periodically
            if batch_count % 10 == 0 {
                info!(
                    "Progress: {} documents exported ({} batches)",
                    exported, batch_count
                );
            }
        }

        writer.finalize().await?;
        scan.close().await?;

        Ok(WriteStats {
            rows: exported,
            bytes: writer.file_size().await?,
            dropped_columns: dropped.len(),
        })
    }

    async fn upload(&self, remote: &RemoteTarget, name: &str, path: &Path) -> Result<String> {
        let key = object_key(&remote.prefix, name, self.settings.format);
        let metadata = remote
            .store
            .put_file(&remote.bucket, &key, path, self.settings.format.content_type())
            .await
            .map_err(|e| ExportError::UploadFailed(format!("{}/{}: {}", remote.bucket, key, e)))?;

        let location = remote.store.location(&remote.bucket, &metadata.key);
        debug!("Uploaded {} bytes to {}", metadata.size, location);
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::JobStatus;
    use crate::source::{BufferedStreamingQuery, MemorySourceFactory, StreamingQuery};
    use crate::storage::MemoryObjectStore;
    use arrow::array::{Array, StringArray};
    use mongodb::bson::{Document, doc};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    fn settings(dir: &Path) -> ExportSettings {
        ExportSettings {
            output_dir: dir.to_path_buf(),
            ..ExportSettings::default()
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn customers() -> Vec<Document> {
        vec![
            doc! { "id": 1, "name": "Ana" },
            doc! { "id": 2, "name": "Bo" },
            doc! { "id": 3, "name": "Cy" },
        ]
    }

    async fn read(path: &Path) -> String {
        tokio::fs::read_to_string(path).await.unwrap()
    }

    #[tokio::test]
    async fn test_exports_flat_collection_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySourceFactory::new().with_collection("customers", customers());
        let coordinator = ExportCoordinator::new(Arc::new(source), settings(dir.path()));

        let summary = coordinator.run(&names(&["customers"])).await.unwrap();
        assert!(summary.is_success());

        let result = &summary.results[0];
        assert_eq!(result.status, JobStatus::Succeeded);
        assert_eq!(result.rows, 3);

        let path = dir.path().join("customers.csv");
        let content = read(&path).await;
        assert_eq!(content, "id,name\n1,Ana\n2,Bo\n3,Cy\n");
        assert_eq!(result.bytes, content.len() as u64);
        assert_eq!(result.location.as_deref(), Some(path.display().to_string().as_str()));
    }

    #[tokio::test]
    async fn test_list_field_written_as_json_text() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySourceFactory::new()
            .with_collection("items", vec![doc! { "id": 1, "tags": ["a", "b"] }]);
        let coordinator = ExportCoordinator::new(Arc::new(source), settings(dir.path()));

        let summary = coordinator.run(&names(&["items"])).await.unwrap();
        assert!(summary.is_success());

        let content = read(&dir.path().join("items.csv")).await;
        assert_eq!(content, "id,tags\n1,\"[\"\"a\"\", \"\"b\"\"]\"\n");
    }

    #[tokio::test]
    async fn test_nested_documents_are_flattened_and_sparse_fields_filled() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySourceFactory::new().with_collection(
            "orders",
            vec![
                doc! { "id": 1, "customer": { "city": "Rio", "zip": "20000" } },
                doc! { "id": 2, "status": "shipped" },
            ],
        );
        let coordinator = ExportCoordinator::new(Arc::new(source), settings(dir.path()));

        coordinator.run(&names(&["orders"])).await.unwrap();

        let content = read(&dir.path().join("orders.csv")).await;
        assert_eq!(
            content,
            "customer_city,customer_zip,id,status\nRio,20000,1,\n,,2,shipped\n"
        );
    }

    #[tokio::test]
    async fn test_empty_collection_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySourceFactory::new().with_collection("reviews", Vec::new());
        let coordinator = ExportCoordinator::new(Arc::new(source), settings(dir.path()));

        let summary = coordinator.run(&names(&["reviews"])).await.unwrap();

        assert!(matches!(summary.results[0].status, JobStatus::Skipped { .. }));
        assert!(summary.is_success());
        assert_eq!(summary.exit_code(), 0);
        assert!(!dir.path().join("reviews.csv").exists());
    }

    #[tokio::test]
    async fn test_one_failing_job_does_not_abort_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let collections = ["customers", "orders", "products", "sellers", "payments"];
        let mut source = MemorySourceFactory::new();
        for name in collections {
            source = source.with_collection(name, customers());
        }
        // A directory where the output file should go makes the sink fail
        std::fs::create_dir_all(dir.path().join("orders.csv")).unwrap();

        let coordinator = ExportCoordinator::new(
            Arc::new(source),
            ExportSettings {
                workers: 2,
                ..settings(dir.path())
            },
        );
        let summary = coordinator.run(&names(&collections)).await.unwrap();

        assert_eq!(summary.succeeded(), 4);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.failed_collections(), vec!["orders"]);
        assert_eq!(summary.exit_code(), 1);
        assert!(dir.path().join("payments.csv").is_file());
    }

    #[tokio::test]
    async fn test_missing_collection_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySourceFactory::new().with_collection("customers", customers());
        let coordinator = ExportCoordinator::new(Arc::new(source), settings(dir.path()));

        let summary = coordinator.run(&names(&["customers", "geolocation"])).await.unwrap();

        assert_eq!(summary.results[0].status, JobStatus::Succeeded);
        match &summary.results[1].status {
            JobStatus::Failed { error } => assert!(error.contains("not found")),
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_schema_sample_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySourceFactory::new()
            .with_collection("ghost", Vec::new())
            .with_reported_count("ghost", 5);
        let coordinator = ExportCoordinator::new(Arc::new(source), settings(dir.path()));

        let summary = coordinator.run(&names(&["ghost"])).await.unwrap();

        match &summary.results[0].status {
            JobStatus::Failed { error } => assert!(error.contains("sampling schema")),
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sampled_schema_drops_later_fields() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySourceFactory::new().with_collection(
            "products",
            vec![
                doc! { "id": 1 },
                doc! { "id": 2, "color": "red" },
                doc! { "id": 3, "color": "blue", "size": "L" },
            ],
        );
        let coordinator = ExportCoordinator::new(
            Arc::new(source),
            ExportSettings {
                schema_mode: SchemaMode::Sample(1),
                ..settings(dir.path())
            },
        );

        let summary = coordinator.run(&names(&["products"])).await.unwrap();

        let result = &summary.results[0];
        assert_eq!(result.status, JobStatus::Succeeded);
        assert_eq!(result.rows, 3);
        assert_eq!(result.dropped_columns, 2);
        assert_eq!(read(&dir.path().join("products.csv")).await, "id\n1\n2\n3\n");
    }

    #[tokio::test]
    async fn test_single_column_empty_values_keep_their_rows() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySourceFactory::new().with_collection(
            "events",
            vec![doc! { "a": 1 }, doc! { "b": 2 }, doc! { "a": null }],
        );
        let coordinator = ExportCoordinator::new(
            Arc::new(source),
            ExportSettings {
                schema_mode: SchemaMode::Sample(1),
                ..settings(dir.path())
            },
        );

        let summary = coordinator.run(&names(&["events"])).await.unwrap();
        assert_eq!(summary.results[0].rows, 3);

        let content = read(&dir.path().join("events.csv")).await;
        assert_eq!(content, "a\n1\n\"\"\n\"\"\n");
        let records = csv::Reader::from_reader(content.as_bytes()).records().count();
        assert_eq!(records, 3);
    }

    #[tokio::test]
    async fn test_full_scan_keeps_late_fields() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySourceFactory::new()
            .with_batch_size(1)
            .with_collection("products", vec![doc! { "id": 1 }, doc! { "id": 2, "color": "red" }]);
        let coordinator = ExportCoordinator::new(Arc::new(source), settings(dir.path()));

        let summary = coordinator.run(&names(&["products"])).await.unwrap();

        assert_eq!(summary.results[0].dropped_columns, 0);
        assert_eq!(read(&dir.path().join("products.csv")).await, "color,id\n,1\nred,2\n");
    }

    /// Source whose collection gains a field after the first scan
    struct ChangingSourceFactory;

    struct ChangingSource {
        scans: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl SourceFactory for ChangingSourceFactory {
        async fn list_collections(&self) -> Result<Vec<String>> {
            Ok(names(&["products"]))
        }

        async fn open(&self, _collection: &str) -> Result<Box<dyn CollectionSource>> {
            Ok(Box::new(ChangingSource {
                scans: std::sync::atomic::AtomicUsize::new(0),
            }))
        }
    }

    #[async_trait::async_trait]
    impl CollectionSource for ChangingSource {
        fn name(&self) -> &str {
            "products"
        }

        async fn count(&self, _limit: Option<u64>) -> Result<u64> {
            Ok(2)
        }

        async fn scan(&self, _limit: Option<u64>) -> Result<Box<dyn StreamingQuery>> {
            let scan = self
                .scans
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            let docs = if scan == 0 {
                vec![doc! { "id": 1 }, doc! { "id": 2 }]
            } else {
                vec![doc! { "id": 1 }, doc! { "id": 2, "color": "red", "size": "M" }]
            };
            Ok(Box::new(BufferedStreamingQuery::new(docs, 10)))
        }
    }

    #[tokio::test]
    async fn test_full_scan_counts_fields_added_between_passes() {
        let dir = tempfile::tempdir().unwrap();
        let coordinator =
            ExportCoordinator::new(Arc::new(ChangingSourceFactory), settings(dir.path()));

        let summary = coordinator.run(&names(&["products"])).await.unwrap();

        let result = &summary.results[0];
        assert_eq!(result.status, JobStatus::Succeeded);
        assert_eq!(result.rows, 2);
        assert_eq!(result.dropped_columns, 2);
        assert_eq!(read(&dir.path().join("products.csv")).await, "id\n1\n2\n");
    }

    #[tokio::test]
    async fn test_limit_caps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySourceFactory::new().with_collection("customers", customers());
        let coordinator = ExportCoordinator::new(
            Arc::new(source),
            ExportSettings {
                limit: Some(2),
                ..settings(dir.path())
            },
        );

        let summary = coordinator.run(&names(&["customers"])).await.unwrap();

        assert_eq!(summary.results[0].rows, 2);
        assert_eq!(read(&dir.path().join("customers.csv")).await, "id,name\n1,Ana\n2,Bo\n");
    }

    #[tokio::test]
    async fn test_parquet_export() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySourceFactory::new().with_collection("customers", customers());
        let coordinator = ExportCoordinator::new(
            Arc::new(source),
            ExportSettings {
                format: ExportFormat::Parquet,
                row_group_size: 2,
                ..settings(dir.path())
            },
        );

        let summary = coordinator.run(&names(&["customers"])).await.unwrap();
        assert!(summary.is_success());

        let file = std::fs::File::open(dir.path().join("customers.parquet")).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file).unwrap().build().unwrap();
        let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
        assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), 3);

        let ids = batches[0]
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(ids.value(0), "1");
        assert!(!ids.is_null(0));
    }

    #[tokio::test]
    async fn test_upload_to_remote_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryObjectStore::new();
        let source = MemorySourceFactory::new().with_collection("customers", customers());
        let coordinator = ExportCoordinator::new(Arc::new(source), settings(dir.path())).with_remote(
            RemoteTarget {
                store: Arc::new(store.clone()),
                bucket: "bkt".to_string(),
                prefix: "exports".to_string(),
            },
        );

        let summary = coordinator.run(&names(&["customers"])).await.unwrap();

        let result = &summary.results[0];
        assert_eq!(result.status, JobStatus::Succeeded);
        assert_eq!(result.location.as_deref(), Some("memory://bkt/exports/customers.csv"));

        let (data, content_type) = store.get_object("bkt", "exports/customers.csv").unwrap();
        assert_eq!(content_type, "text/csv");
        assert_eq!(String::from_utf8(data).unwrap(), "id,name\n1,Ana\n2,Bo\n3,Cy\n");
        assert!(!dir.path().join("customers.csv").exists());
    }

    #[tokio::test]
    async fn test_upload_failure_is_job_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryObjectStore::new();
        store.reject_key("exports/orders.csv");
        let source = MemorySourceFactory::new()
            .with_collection("customers", customers())
            .with_collection("orders", customers());
        let coordinator = ExportCoordinator::new(Arc::new(source), settings(dir.path())).with_remote(
            RemoteTarget {
                store: Arc::new(store.clone()),
                bucket: "bkt".to_string(),
                prefix: "exports".to_string(),
            },
        );

        let summary = coordinator.run(&names(&["customers", "orders"])).await.unwrap();

        assert_eq!(summary.failed_collections(), vec!["orders"]);
        match &summary.results[1].status {
            JobStatus::Failed { error } => assert!(error.contains("Upload failed")),
            other => panic!("unexpected status {other:?}"),
        }
        assert!(store.get_object("bkt", "exports/customers.csv").is_some());
    }

    #[tokio::test]
    async fn test_results_follow_requested_order() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySourceFactory::new()
            .with_collection("a", customers())
            .with_collection("b", Vec::new())
            .with_collection("c", customers());
        let coordinator = ExportCoordinator::new(
            Arc::new(source),
            ExportSettings {
                workers: 3,
                ..settings(dir.path())
            },
        );

        let summary = coordinator.run(&names(&["c", "b", "a"])).await.unwrap();

        let order: Vec<&str> = summary.results.iter().map(|r| r.collection.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_unreachable_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySourceFactory::new().unreachable();
        let coordinator = ExportCoordinator::new(Arc::new(source), settings(dir.path()));

        assert!(coordinator.run(&names(&["customers"])).await.is_err());
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::new();
        config.export.workers = 0;
        config.export.schema_sample = Some(100);
        config.export.format = ExportFormat::Parquet;

        let settings = ExportSettings::from_config(&config, true);
        assert_eq!(settings.workers, 1);
        assert_eq!(settings.schema_mode, SchemaMode::Sample(100));
        assert_eq!(settings.format, ExportFormat::Parquet);
        assert!(settings.show_progress);
    }
}
