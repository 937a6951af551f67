//! Export job results and the run summary

use std::time::Duration;

/// Outcome of one collection export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// File written (and uploaded when a remote store is configured)
    Succeeded,

    /// Nothing to export
    Skipped { reason: String },

    /// Job aborted; siblings keep running
    Failed { error: String },
}

impl JobStatus {
    /// Short lowercase label for tables and logs
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Succeeded => "succeeded",
            JobStatus::Skipped { .. } => "skipped",
            JobStatus::Failed { .. } => "failed",
        }
    }
}

/// Result of exporting a single collection
#[derive(Debug, Clone)]
pub struct JobResult {
    /// Collection name
    pub collection: String,

    /// Final status
    pub status: JobStatus,

    /// Rows written
    pub rows: u64,

    /// Size of the output file in bytes
    pub bytes: u64,

    /// Local path or remote location of the output
    pub location: Option<String>,

    /// Distinct columns dropped because they were outside the discovered schema
    pub dropped_columns: usize,

    /// Wall time spent on the job
    pub elapsed: Duration,
}

impl JobResult {
    pub fn succeeded(
        collection: impl Into<String>,
        rows: u64,
        bytes: u64,
        location: Option<String>,
        dropped_columns: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            collection: collection.into(),
            status: JobStatus::Succeeded,
            rows,
            bytes,
            location,
            dropped_columns,
            elapsed,
        }
    }

    pub fn skipped(collection: impl Into<String>, reason: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            collection: collection.into(),
            status: JobStatus::Skipped {
                reason: reason.into(),
            },
            rows: 0,
            bytes: 0,
            location: None,
            dropped_columns: 0,
            elapsed,
        }
    }

    pub fn failed(collection: impl Into<String>, error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            collection: collection.into(),
            status: JobStatus::Failed {
                error: error.into(),
            },
            rows: 0,
            bytes: 0,
            location: None,
            dropped_columns: 0,
            elapsed,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, JobStatus::Failed { .. })
    }
}

/// All job results of a run, in requested collection order
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub results: Vec<JobResult>,
}

impl RunSummary {
    pub fn new(results: Vec<JobResult>) -> Self {
        Self { results }
    }

    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, JobStatus::Succeeded))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, JobStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, JobStatus::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&JobStatus) -> bool) -> usize {
        self.results.iter().filter(|r| predicate(&r.status)).count()
    }

    /// Names of failed collections, in requested order
    pub fn failed_collections(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.is_failed())
            .map(|r| r.collection.as_str())
            .collect()
    }

    /// Total rows written across all jobs
    pub fn total_rows(&self) -> u64 {
        self.results.iter().map(|r| r.rows).sum()
    }

    /// True when no job failed; skipped jobs are fine
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Process exit status for this run
    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> RunSummary {
        RunSummary::new(vec![
            JobResult::succeeded("customers", 3, 40, Some("exports/customers.csv".into()), 0, Duration::ZERO),
            JobResult::skipped("reviews", "empty collection", Duration::ZERO),
            JobResult::failed("orders", "Write failed: disk full", Duration::ZERO),
            JobResult::succeeded("products", 7, 90, None, 2, Duration::ZERO),
        ])
    }

    #[test]
    fn test_counts() {
        let summary = summary();
        assert_eq!(summary.succeeded(), 2);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.total_rows(), 10);
        assert_eq!(summary.failed_collections(), vec!["orders"]);
        assert!(!summary.is_success());
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_skipped_only_is_success() {
        let summary = RunSummary::new(vec![JobResult::skipped("a", "empty collection", Duration::ZERO)]);
        assert!(summary.is_success());
        assert_eq!(summary.exit_code(), 0);
        assert!(RunSummary::default().is_success());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(JobStatus::Succeeded.label(), "succeeded");
        assert_eq!(
            JobStatus::Skipped {
                reason: String::new()
            }
            .label(),
            "skipped"
        );
        assert_eq!(JobStatus::Failed { error: String::new() }.label(), "failed");
    }
}
