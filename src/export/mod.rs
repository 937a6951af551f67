//! Collection export pipeline
//!
//! This module provides:
//! - Row writers for CSV and Parquet
//! - Progress tracking with indicatif
//! - Job results and the run summary
//! - The coordinator running one job per collection on a bounded worker pool

pub mod coordinator;
pub mod job;
pub mod progress;
pub mod writers;

pub use coordinator::{ExportCoordinator, ExportSettings, RemoteTarget};
pub use job::{JobResult, JobStatus, RunSummary};
pub use progress::ProgressTracker;
pub use writers::{RowWriter, create_row_writer};
