//! Table rendering for run summaries and listings using tabled

use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Columns, object::Rows, width::Width},
};

use super::format_bytes;
use crate::export::{JobStatus, RunSummary};
use crate::storage::ObjectMetadata;

/// Maximum width for a single column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 60;

/// Available table styles
#[derive(Debug, Clone, Copy)]
pub enum TableStyle {
    /// Rounded style
    Rounded,
    /// ASCII style with basic characters
    Ascii,
    /// Markdown style
    Markdown,
}

/// Table formatter for summaries and listings
pub struct TableFormatter {
    /// Maximum column width
    max_column_width: usize,

    /// Table style
    style: TableStyle,
}

impl TableFormatter {
    /// Create a new table formatter with default settings
    pub fn new() -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            style: TableStyle::Rounded,
        }
    }

    /// Set table style
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Render the per-collection results of an export run
    ///
    /// # Arguments
    /// * `summary` - Run summary to render
    ///
    /// # Returns
    /// * `String` - Rendered table
    pub fn format_run_summary(&self, summary: &RunSummary) -> String {
        let headers = ["collection", "status", "rows", "size", "details"];
        let rows = summary.results.iter().map(|result| {
            let details = match &result.status {
                JobStatus::Succeeded => {
                    let mut details = result.location.clone().unwrap_or_default();
                    if result.dropped_columns > 0 {
                        details.push_str(&format!(" ({} columns dropped)", result.dropped_columns));
                    }
                    details
                }
                JobStatus::Skipped { reason } => reason.clone(),
                JobStatus::Failed { error } => error.clone(),
            };

            vec![
                result.collection.clone(),
                result.status.label().to_string(),
                result.rows.to_string(),
                format_bytes(result.bytes),
                details,
            ]
        });

        self.render(&headers, rows)
    }

    /// Render collection names with their document counts
    pub fn format_collection_counts(&self, counts: &[(String, u64)]) -> String {
        let rows = counts
            .iter()
            .map(|(name, count)| vec![name.clone(), count.to_string()]);
        self.render(&["collection", "documents"], rows)
    }

    /// Render an object listing from the remote store
    pub fn format_object_listing(&self, objects: &[ObjectMetadata]) -> String {
        let rows = objects.iter().map(|object| {
            vec![
                object.key.clone(),
                format_bytes(object.size),
                object.content_type.clone().unwrap_or_default(),
            ]
        });
        self.render(&["object", "size", "content type"], rows)
    }

    fn render<I>(&self, headers: &[&str], rows: I) -> String
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut builder = Builder::default();
        builder.push_record(headers.iter().map(|h| h.to_string()));
        for row in rows {
            builder.push_record(row);
        }

        let mut table = builder.build();
        self.apply_style(&mut table);

        for i in 0..headers.len() {
            table.with(Modify::new(Columns::new(i..=i)).with(Width::wrap(self.max_column_width)));
        }
        table.with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn apply_style(&self, table: &mut Table) {
        match self.style {
            TableStyle::Rounded => table.with(Style::rounded()),
            TableStyle::Ascii => table.with(Style::ascii()),
            TableStyle::Markdown => table.with(Style::markdown()),
        };
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::JobResult;
    use std::time::Duration;

    #[test]
    fn test_run_summary_table_lists_every_job() {
        let summary = RunSummary::new(vec![
            JobResult::succeeded("customers", 3, 2048, Some("exports/customers.csv".into()), 0, Duration::ZERO),
            JobResult::skipped("sellers", "empty collection", Duration::ZERO),
            JobResult::failed("orders", "Write failed: disk full", Duration::ZERO),
        ]);

        let output = TableFormatter::new()
            .with_style(TableStyle::Ascii)
            .format_run_summary(&summary);

        assert!(output.contains("customers"));
        assert!(output.contains("exports/customers.csv"));
        assert!(output.contains("skipped"));
        assert!(output.contains("empty collection"));
        assert!(output.contains("failed"));
        assert!(output.contains("disk full"));
    }

    #[test]
    fn test_collection_counts_table() {
        let counts = vec![("orders".to_string(), 99441), ("sellers".to_string(), 3095)];
        let output = TableFormatter::new()
            .with_style(TableStyle::Markdown)
            .format_collection_counts(&counts);

        assert!(output.contains("| orders"));
        assert!(output.contains("99441"));
        assert!(output.contains("sellers"));
    }

    #[test]
    fn test_object_listing_table() {
        let objects = vec![ObjectMetadata {
            key: "exports/orders.parquet".to_string(),
            size: 3 * 1024 * 1024,
            content_type: Some("application/octet-stream".to_string()),
        }];
        let output = TableFormatter::new().format_object_listing(&objects);

        assert!(output.contains("exports/orders.parquet"));
        assert!(output.contains("3.00 MB"));
    }
}
