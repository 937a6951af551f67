//! CSV writer for export operations
//!
//! Writes a header row from the column schema, then one line per row.
//! Lines end with `\n`; values are quoted only when needed, and a row made
//! of a single empty value is written as `""` so it survives a read-back.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::{Terminator, WriterBuilder};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::error::Result;
use crate::schema::ColumnSchema;

use super::{RowWriter, create_file, file_len, write_failed};

/// Writer for CSV format
pub struct CsvWriter {
    /// Buffered file writer
    writer: BufWriter<File>,
    /// Path to the output file
    path: PathBuf,
    /// Number of columns per row
    width: usize,
    /// Number of rows written
    written: usize,
}

impl CsvWriter {
    /// Create a new CSV writer and write the header row
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `schema` - Column schema, used for the header
    ///
    /// # Returns
    /// * `Result<Self>` - New writer instance or error
    pub async fn new(path: &Path, schema: &ColumnSchema) -> Result<Self> {
        let file = create_file(path).await?;
        let mut writer = Self {
            writer: BufWriter::with_capacity(1024 * 1024, file),
            path: path.to_path_buf(),
            width: schema.len(),
            written: 0,
        };

        let header = Self::encode_records([schema.columns()])?;
        writer.write_bytes(&header).await?;
        debug!(
            "Created CSV writer for {} ({} columns)",
            path.display(),
            schema.len()
        );

        Ok(writer)
    }

    /// Encode records as CSV text
    ///
    /// # Arguments
    /// * `records` - Records, each a sequence of field values
    ///
    /// # Returns
    /// * `Result<Vec<u8>>` - Encoded lines, each ending in `\n`
    fn encode_records<'a, I>(records: I) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut encoder = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for record in records {
            encoder
                .write_record(record)
                .map_err(|e| write_failed("Failed to encode row", e))?;
        }

        encoder
            .into_inner()
            .map_err(|e| write_failed("Failed to encode row", e.error()))
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .await
            .map_err(|e| write_failed("Failed to write row", e))
    }
}

#[async_trait]
impl RowWriter for CsvWriter {
    async fn write_rows(&mut self, rows: &[Vec<String>]) -> Result<usize> {
        debug_assert!(rows.iter().all(|row| row.len() == self.width));

        let encoded = Self::encode_records(rows.iter().map(Vec::as_slice))?;
        self.write_bytes(&encoded).await?;

        self.written += rows.len();
        debug!("Wrote {} rows to CSV (total: {})", rows.len(), self.written);

        Ok(rows.len())
    }

    async fn finalize(&mut self) -> Result<()> {
        self.writer
            .flush()
            .await
            .map_err(|e| write_failed("Failed to flush file", e))?;

        debug!(
            "Finalized CSV file: {} ({} rows)",
            self.path.display(),
            self.written
        );
        Ok(())
    }

    async fn file_size(&mut self) -> Result<u64> {
        file_len(&self.path).await
    }
}
