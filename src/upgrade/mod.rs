//! Storage schema upgrade of file attachments.
//!
//! Iterates over every attachment of every record and, if its storage schema
//! is outdated, moves its files to the current layout and persists the new
//! version. Safe to re-run: already upgraded styles resolve to the same path
//! under both versions and are left alone.

mod progress;
mod runner;

pub use progress::{ProgressSink, TracingProgress, PROGRESS_INTERVAL};
pub use runner::StorageSchemaUpgrade;
pub use stowage_common::CURRENT_STORAGE_SCHEMA_VERSION;

use std::fmt;
use std::path::PathBuf;

/// Errors that stop an upgrade run.
#[derive(Debug, thiserror::Error)]
pub enum UpgradeError {
    #[error("The {0} storage driver is not supported for this operation at this time")]
    UnsupportedBackend(String),

    #[error("Record store error: {0}")]
    Store(#[from] stowage_common::Error),

    #[error("Failed to move {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: stowage_common::Error,
    },
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpgradeSummary {
    /// Files moved, or that would be moved in a dry run.
    pub upgraded: u64,
    /// Records saved, or that would be saved in a dry run.
    pub records: u64,
    /// Styles inspected, moved or not.
    pub styles: u64,
    pub dry_run: bool,
}

impl fmt::Display for UpgradeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Upgraded storage schema of {} files across {} records",
            self.upgraded, self.records
        )?;
        if self.dry_run {
            write!(f, " (DRY RUN)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let summary = UpgradeSummary {
            upgraded: 3,
            records: 2,
            styles: 4,
            dry_run: false,
        };
        assert_eq!(
            summary.to_string(),
            "Upgraded storage schema of 3 files across 2 records"
        );
    }

    #[test]
    fn test_summary_line_marks_dry_run() {
        let summary = UpgradeSummary {
            dry_run: true,
            ..UpgradeSummary::default()
        };
        assert!(summary.to_string().ends_with(" (DRY RUN)"));
    }

    #[test]
    fn test_unsupported_backend_message() {
        let err = UpgradeError::UnsupportedBackend("fog".into());
        assert_eq!(
            err.to_string(),
            "The fog storage driver is not supported for this operation at this time"
        );
    }
}
