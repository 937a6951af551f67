//! Progress tracking for export operations
//!
//! One bar per collection job, all attached to a shared `MultiProgress` so
//! concurrent jobs render on separate lines.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{spinner:.green} {prefix:>20} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Progress tracker for one collection export
///
/// Tracks document processing progress and displays a progress bar
/// with the current speed.
pub struct ProgressTracker {
    /// Number of documents processed so far
    processed: AtomicU64,
    /// Start time of the operation
    start_time: Instant,
    /// Progress bar (optional, can be disabled)
    bar: Option<ProgressBar>,
}

impl ProgressTracker {
    /// Create a new progress tracker
    ///
    /// # Arguments
    /// * `multi` - Shared progress display, `None` disables the bar
    /// * `collection` - Collection name shown before the bar
    /// * `total` - Number of documents the job will write
    ///
    /// # Returns
    /// * `Self` - New progress tracker instance
    pub fn new(multi: Option<&MultiProgress>, collection: &str, total: u64) -> Self {
        let bar = multi.map(|multi| {
            let style = ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            let bar = multi.add(ProgressBar::new(total));
            bar.set_style(style);
            bar.set_prefix(collection.to_string());
            bar
        });

        Self {
            processed: AtomicU64::new(0),
            start_time: Instant::now(),
            bar,
        }
    }

    /// Tracker that never draws
    pub fn hidden() -> Self {
        Self::new(None, "", 0)
    }

    /// Update progress with new count
    ///
    /// # Arguments
    /// * `count` - Total number of documents processed so far
    pub fn update(&self, count: u64) {
        self.processed.store(count, Ordering::Relaxed);

        if let Some(ref bar) = self.bar {
            bar.set_position(count);

            let elapsed = self.start_time.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                let speed = count as f64 / elapsed;
                bar.set_message(format!("({:.0} docs/sec)", speed));
            }
        }
    }

    /// Number of documents reported so far
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Finish and clear the progress bar
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indicatif::ProgressDrawTarget;

    #[test]
    fn test_progress_tracker_hidden() {
        let tracker = ProgressTracker::hidden();
        tracker.update(500);
        assert_eq!(tracker.processed(), 500);
        tracker.finish();
    }

    #[test]
    fn test_progress_tracker_with_bar() {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let tracker = ProgressTracker::new(Some(&multi), "orders", 1000);
        tracker.update(250);
        assert_eq!(tracker.processed(), 250);
        tracker.finish();
    }
}
