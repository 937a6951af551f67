//! Column schema reconciliation
//!
//! A collection has no fixed schema, so the output columns are the sorted
//! union of flattened keys seen over a full scan or a sample. Every row
//! written is projected onto exactly these columns.

use std::collections::BTreeSet;

use crate::flatten::FlatRow;

/// How the column set of a collection is discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaMode {
    /// Inspect every exported document before writing
    #[default]
    FullScan,

    /// Inspect only the first `n` documents; later-only fields are dropped
    Sample(u64),
}

impl SchemaMode {
    /// Build from an optional sample size; `None` means a full scan
    pub fn from_sample(sample: Option<u64>) -> Self {
        match sample {
            Some(n) => SchemaMode::Sample(n),
            None => SchemaMode::FullScan,
        }
    }

    /// Number of documents to read for the schema pass, given the export limit
    pub fn scan_limit(&self, export_limit: Option<u64>) -> Option<u64> {
        match (self, export_limit) {
            (SchemaMode::FullScan, limit) => limit,
            (SchemaMode::Sample(n), Some(limit)) => Some((*n).min(limit)),
            (SchemaMode::Sample(n), None) => Some(*n),
        }
    }
}

/// Incrementally collects column names
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    columns: BTreeSet<String>,
    rows_seen: u64,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the keys of one flattened row
    pub fn observe(&mut self, row: &FlatRow) {
        for key in row.keys() {
            if !self.columns.contains(key) {
                self.columns.insert(key.clone());
            }
        }
        self.rows_seen += 1;
    }

    /// Number of rows observed so far
    pub fn rows_seen(&self) -> u64 {
        self.rows_seen
    }

    pub fn finish(self) -> ColumnSchema {
        ColumnSchema {
            columns: self.columns.into_iter().collect(),
        }
    }
}

/// Sorted, de-duplicated output columns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnSchema {
    columns: Vec<String>,
}

impl ColumnSchema {
    /// Union of keys over `rows`, sorted lexicographically
    ///
    /// The result does not depend on the order of `rows`.
    pub fn reconcile<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a FlatRow>,
    {
        let mut builder = SchemaBuilder::new();
        for row in rows {
            builder.observe(row);
        }
        builder.finish()
    }

    /// Build from an arbitrary list of names
    pub fn from_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = columns.into_iter().map(Into::into).collect();
        Self {
            columns: set.into_iter().collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns
            .binary_search_by(|c| c.as_str().cmp(column))
            .is_ok()
    }

    /// Project a row onto the schema
    ///
    /// Missing columns become empty text; columns outside the schema are
    /// dropped.
    ///
    /// # Arguments
    /// * `row` - Flattened row
    ///
    /// # Returns
    /// * `Vec<String>` - One value per schema column, in schema order
    pub fn materialize(&self, row: &FlatRow) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| row.get(column).cloned().unwrap_or_default())
            .collect()
    }

    /// Columns of `row` that are not part of the schema
    pub fn unknown_columns<'a>(&'a self, row: &'a FlatRow) -> impl Iterator<Item = &'a String> + 'a {
        row.keys().filter(move |key| !self.contains(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> FlatRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_reconcile_is_sorted_union() {
        let rows = vec![row(&[("b", "1"), ("a", "2")]), row(&[("c", "3"), ("a", "4")])];
        let schema = ColumnSchema::reconcile(&rows);
        assert_eq!(schema.columns(), &["a", "b", "c"]);
    }

    #[test]
    fn test_reconcile_is_order_independent() {
        let r1 = row(&[("z", "1")]);
        let r2 = row(&[("a", "1"), ("m", "2")]);
        let r3 = row(&[("m", "3"), ("q", "4")]);

        let forward = ColumnSchema::reconcile([&r1, &r2, &r3]);
        let backward = ColumnSchema::reconcile([&r3, &r2, &r1]);
        let shuffled = ColumnSchema::reconcile([&r2, &r3, &r1]);

        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn test_reconcile_empty() {
        let schema = ColumnSchema::reconcile(std::iter::empty());
        assert!(schema.is_empty());
    }

    #[test]
    fn test_materialize_fills_missing_with_empty_text() {
        let schema = ColumnSchema::from_columns(["a", "b", "c"]);
        let values = schema.materialize(&row(&[("c", "3"), ("a", "1")]));
        assert_eq!(values, vec!["1", "", "3"]);
    }

    #[test]
    fn test_materialize_drops_unknown_columns() {
        let schema = ColumnSchema::from_columns(["a"]);
        let r = row(&[("a", "1"), ("late", "x")]);

        assert_eq!(schema.materialize(&r), vec!["1"]);
        let unknown: Vec<&String> = schema.unknown_columns(&r).collect();
        assert_eq!(unknown, vec!["late"]);
    }

    #[test]
    fn test_from_columns_dedups_and_sorts() {
        let schema = ColumnSchema::from_columns(["b", "a", "b"]);
        assert_eq!(schema.columns(), &["a", "b"]);
        assert!(schema.contains("a"));
        assert!(!schema.contains("c"));
    }

    #[test]
    fn test_schema_mode_scan_limit() {
        assert_eq!(SchemaMode::FullScan.scan_limit(None), None);
        assert_eq!(SchemaMode::FullScan.scan_limit(Some(50)), Some(50));
        assert_eq!(SchemaMode::Sample(100).scan_limit(None), Some(100));
        assert_eq!(SchemaMode::Sample(100).scan_limit(Some(10)), Some(10));
        assert_eq!(SchemaMode::from_sample(Some(5)), SchemaMode::Sample(5));
    }

    #[test]
    fn test_builder_counts_rows() {
        let mut builder = SchemaBuilder::new();
        builder.observe(&row(&[("a", "1")]));
        builder.observe(&row(&[]));
        assert_eq!(builder.rows_seen(), 2);
        assert_eq!(builder.finish().len(), 1);
    }
}
