//! Parquet writer for export operations
//!
//! Every column is a nullable UTF-8 string column. Rows are buffered and
//! written one row group at a time with Snappy compression.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use async_trait::async_trait;
use parquet::arrow::AsyncArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use tokio::fs::File;
use tracing::debug;

use crate::error::Result;
use crate::schema::ColumnSchema;

use super::{RowWriter, create_file, file_len, write_failed};

/// Writer for Parquet format
pub struct ParquetWriter {
    /// Arrow writer, taken on finalize
    writer: Option<AsyncArrowWriter<File>>,
    /// Arrow schema shared by all batches
    schema: SchemaRef,
    /// Path to the output file
    path: PathBuf,
    /// Rows waiting for a full row group
    pending: Vec<Vec<String>>,
    /// Rows per row group
    row_group_size: usize,
    /// Number of rows handed to the Arrow writer
    written: usize,
}

impl ParquetWriter {
    /// Create a new Parquet writer
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `schema` - Column schema, one string column per entry
    /// * `row_group_size` - Rows per row group
    ///
    /// # Returns
    /// * `Result<Self>` - New writer instance or error
    pub async fn new(path: &Path, schema: &ColumnSchema, row_group_size: usize) -> Result<Self> {
        let row_group_size = row_group_size.max(1);
        let fields: Vec<Field> = schema
            .columns()
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true))
            .collect();
        let arrow_schema: SchemaRef = Arc::new(Schema::new(fields));

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .set_max_row_group_size(row_group_size)
            .build();

        let file = create_file(path).await?;
        let writer = AsyncArrowWriter::try_new(file, arrow_schema.clone(), Some(props))
            .map_err(|e| write_failed("Failed to create Parquet writer", e))?;

        debug!(
            "Created Parquet writer for {} ({} columns, row groups of {})",
            path.display(),
            schema.len(),
            row_group_size
        );

        Ok(Self {
            writer: Some(writer),
            schema: arrow_schema,
            path: path.to_path_buf(),
            pending: Vec::with_capacity(row_group_size),
            row_group_size,
            written: 0,
        })
    }

    /// Build a record batch with one string array per column
    fn build_batch(&self, rows: &[Vec<String>]) -> Result<RecordBatch> {
        let width = self.schema.fields().len();
        let mut columns: Vec<ArrayRef> = Vec::with_capacity(width);

        for index in 0..width {
            let mut builder = StringBuilder::with_capacity(rows.len(), rows.len() * 16);
            for row in rows {
                builder.append_value(row.get(index).map(String::as_str).unwrap_or_default());
            }
            columns.push(Arc::new(builder.finish()));
        }

        // Row count is explicit so a column-less schema still carries rows
        let options = RecordBatchOptions::new().with_row_count(Some(rows.len()));
        Ok(RecordBatch::try_new_with_options(
            self.schema.clone(),
            columns,
            &options,
        )?)
    }

    async fn write_row_group(&mut self, rows: Vec<Vec<String>>) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let batch = self.build_batch(&rows)?;
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| write_failed("Parquet writer", "already finalized"))?;

        writer
            .write(&batch)
            .await
            .map_err(|e| write_failed("Failed to write row group", e))?;
        writer
            .flush()
            .await
            .map_err(|e| write_failed("Failed to flush row group", e))?;

        self.written += rows.len();
        Ok(())
    }
}

#[async_trait]
impl RowWriter for ParquetWriter {
    async fn write_rows(&mut self, rows: &[Vec<String>]) -> Result<usize> {
        self.pending.extend_from_slice(rows);

        while self.pending.len() >= self.row_group_size {
            let rest = self.pending.split_off(self.row_group_size);
            let group = std::mem::replace(&mut self.pending, rest);
            self.write_row_group(group).await?;
        }

        debug!(
            "Buffered {} rows for Parquet (written: {}, pending: {})",
            rows.len(),
            self.written,
            self.pending.len()
        );
        Ok(rows.len())
    }

    async fn finalize(&mut self) -> Result<()> {
        let remainder = std::mem::take(&mut self.pending);
        self.write_row_group(remainder).await?;

        if let Some(writer) = self.writer.take() {
            writer
                .close()
                .await
                .map_err(|e| write_failed("Failed to close Parquet file", e))?;
        }

        debug!(
            "Finalized Parquet file: {} ({} rows)",
            self.path.display(),
            self.written
        );
        Ok(())
    }

    async fn file_size(&mut self) -> Result<u64> {
        file_len(&self.path).await
    }
}
