//! Progress reporting for long upgrade runs.

/// Number of styles between progress log lines.
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Receives progress and recoverable failures from the upgrade runner.
pub trait ProgressSink {
    /// One more style has been processed.
    fn increment(&mut self);

    /// A style could not be migrated; the run continues.
    fn error(&mut self, key: &str, error: &dyn std::error::Error);

    /// The run is complete after `total` styles.
    fn finish(&mut self, total: u64);
}

/// Progress sink that reports through `tracing`.
#[derive(Debug)]
pub struct TracingProgress {
    processed: u64,
    interval: u64,
}

impl TracingProgress {
    pub fn new() -> Self {
        Self::with_interval(PROGRESS_INTERVAL)
    }

    pub fn with_interval(interval: u64) -> Self {
        Self {
            processed: 0,
            interval: interval.max(1),
        }
    }
}

impl Default for TracingProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TracingProgress {
    fn increment(&mut self) {
        self.processed += 1;
        if self.processed % self.interval == 0 {
            tracing::info!(processed = self.processed, "Processed {} styles", self.processed);
        }
    }

    fn error(&mut self, key: &str, error: &dyn std::error::Error) {
        tracing::error!(key, error = %error, "Error processing {}", key);
    }

    fn finish(&mut self, total: u64) {
        tracing::info!(total, "Finished processing {} styles", total);
    }
}
