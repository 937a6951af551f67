//! Row writers for export operations
//!
//! Writers receive rows already projected onto the column schema, so every
//! row has exactly one value per column in schema order.

use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;

use crate::config::ExportFormat;
use crate::error::{ExportError, ExporterError, Result};
use crate::schema::ColumnSchema;

pub mod csv;
pub mod parquet;

pub use csv::CsvWriter;
pub use parquet::ParquetWriter;

/// Trait for writing materialized rows to a file format
#[async_trait]
pub trait RowWriter: Send {
    /// Write a batch of rows
    ///
    /// # Arguments
    /// * `rows` - Rows in schema order
    ///
    /// # Returns
    /// * `Result<usize>` - Number of rows written
    async fn write_rows(&mut self, rows: &[Vec<String>]) -> Result<usize>;

    /// Finalize the output (flush buffers, write footers, etc.)
    ///
    /// # Returns
    /// * `Result<()>` - Success or error
    async fn finalize(&mut self) -> Result<()>;

    /// Get the current file size in bytes
    ///
    /// # Returns
    /// * `Result<u64>` - File size in bytes
    async fn file_size(&mut self) -> Result<u64>;
}

/// Create the writer for `format` at `path`
///
/// # Arguments
/// * `format` - Output format
/// * `path` - File to create (truncated if present)
/// * `schema` - Column schema of the rows
/// * `row_group_size` - Rows per Parquet row group
///
/// # Returns
/// * `Result<Box<dyn RowWriter>>` - Ready writer or error
pub async fn create_row_writer(
    format: ExportFormat,
    path: &Path,
    schema: &ColumnSchema,
    row_group_size: usize,
) -> Result<Box<dyn RowWriter>> {
    match format {
        ExportFormat::Csv => Ok(Box::new(CsvWriter::new(path, schema).await?)),
        ExportFormat::Parquet => Ok(Box::new(
            ParquetWriter::new(path, schema, row_group_size).await?,
        )),
    }
}

/// Create an output file, naming the path on failure
pub(crate) async fn create_file(path: &Path) -> Result<File> {
    File::create(path)
        .await
        .map_err(|e| write_failed(format!("Failed to create file {}", path.display()), e))
}

/// Size of a finished file
pub(crate) async fn file_len(path: &Path) -> Result<u64> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| write_failed("Failed to get file metadata", e))?;
    Ok(metadata.len())
}

pub(crate) fn write_failed(context: impl AsRef<str>, err: impl std::fmt::Display) -> ExporterError {
    ExportError::WriteFailed(format!("{}: {}", context.as_ref(), err)).into()
}
