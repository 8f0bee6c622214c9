//! The storage schema upgrade runner.

use stowage_common::{Attachable, RecordId, RecordKind, CURRENT_STORAGE_SCHEMA_VERSION};
use stowage_db::models::AnyRecord;
use stowage_db::store::RecordStore;

use super::{ProgressSink, UpgradeError, UpgradeSummary};
use crate::storage::{Backend, Relocation};

/// Mutable state of one run: counters plus the progress sink.
struct RunContext<'p> {
    dry_run: bool,
    summary: UpgradeSummary,
    progress: &'p mut dyn ProgressSink,
}

impl<'p> RunContext<'p> {
    fn new(dry_run: bool, progress: &'p mut dyn ProgressSink) -> Self {
        Self {
            dry_run,
            summary: UpgradeSummary {
                dry_run,
                ..UpgradeSummary::default()
            },
            progress,
        }
    }

    fn style_processed(&mut self) {
        self.summary.styles += 1;
        self.progress.increment();
    }
}

/// Moves attachment files from older storage layouts to the current one.
///
/// Records are scanned kind by kind in pages of `batch_size`, ordered by id.
/// Each record is saved at most once, after all its attachments are handled.
pub struct StorageSchemaUpgrade<'a, S: RecordStore> {
    store: &'a S,
    backend: &'a Backend,
    batch_size: usize,
}

impl<'a, S: RecordStore> StorageSchemaUpgrade<'a, S> {
    pub fn new(store: &'a S, backend: &'a Backend, batch_size: usize) -> Self {
        Self {
            store,
            backend,
            batch_size: batch_size.max(1),
        }
    }

    /// Run the upgrade over every record kind.
    ///
    /// With `dry_run` set, nothing is moved or saved; the summary counts what
    /// would have been.
    pub fn run(
        &self,
        dry_run: bool,
        progress: &mut dyn ProgressSink,
    ) -> Result<UpgradeSummary, UpgradeError> {
        if let Backend::Unsupported(name) = self.backend {
            return Err(UpgradeError::UnsupportedBackend(name.clone()));
        }

        tracing::info!(
            backend = self.backend.name(),
            dry_run,
            batch_size = self.batch_size,
            "Upgrading attachments to storage schema version {}",
            CURRENT_STORAGE_SCHEMA_VERSION
        );

        let mut ctx = RunContext::new(dry_run, progress);
        for kind in RecordKind::ALL {
            self.upgrade_kind(kind, &mut ctx)?;
        }

        let summary = ctx.summary;
        ctx.progress.finish(summary.styles);
        Ok(summary)
    }

    fn upgrade_kind(&self, kind: RecordKind, ctx: &mut RunContext<'_>) -> Result<(), UpgradeError> {
        let mut after: Option<RecordId> = None;

        loop {
            let batch = self.store.find_batch(kind, after, self.batch_size)?;
            let Some(last) = batch.last() else {
                break;
            };
            after = Some(last.id());
            let exhausted = batch.len() < self.batch_size;

            tracing::debug!(%kind, records = batch.len(), "Loaded batch");

            for mut record in batch {
                self.upgrade_record(&mut record, ctx)?;
            }

            if exhausted {
                break;
            }
        }

        Ok(())
    }

    fn upgrade_record(
        &self,
        record: &mut AnyRecord,
        ctx: &mut RunContext<'_>,
    ) -> Result<(), UpgradeError> {
        for name in record.attachment_names() {
            let Some(attachment) = record.attachment_mut(name) else {
                continue;
            };

            let previous_version = attachment.storage_schema_version();
            if attachment.is_blank() || previous_version >= CURRENT_STORAGE_SCHEMA_VERSION {
                continue;
            }

            for style in attachment.styles() {
                attachment.set_storage_schema_version(previous_version);
                let old_path = attachment.path(style);
                attachment.set_storage_schema_version(CURRENT_STORAGE_SCHEMA_VERSION);
                let new_path = attachment.path(style);

                if let (Some(old_path), Some(new_path)) = (old_path, new_path) {
                    if old_path != new_path {
                        self.relocate(&old_path, &new_path, ctx)?;
                    }
                }

                ctx.style_processed();
            }
        }

        if record.has_changes() {
            if !ctx.dry_run {
                self.store.save(record)?;
            }
            ctx.summary.records += 1;
        }

        Ok(())
    }

    fn relocate(
        &self,
        old_path: &str,
        new_path: &str,
        ctx: &mut RunContext<'_>,
    ) -> Result<(), UpgradeError> {
        match self.backend {
            Backend::Filesystem(fs) => {
                if ctx.dry_run {
                    ctx.summary.upgraded += 1;
                    return Ok(());
                }

                let outcome = fs
                    .relocate(old_path, new_path)
                    .map_err(|source| UpgradeError::Filesystem {
                        path: fs.resolve(old_path),
                        source,
                    })?;

                match outcome {
                    Relocation::Moved => {
                        tracing::debug!(from = old_path, to = new_path, "Moved file");
                        ctx.summary.upgraded += 1;
                    }
                    Relocation::SourceMissing => {
                        tracing::trace!(path = old_path, "Source file missing, skipping");
                    }
                }
            }
            Backend::ObjectStore(store) => {
                match store.exists(old_path) {
                    Ok(true) => {}
                    Ok(false) => return Ok(()),
                    Err(e) => {
                        ctx.progress.error(old_path, &e);
                        return Ok(());
                    }
                }

                if ctx.dry_run {
                    ctx.summary.upgraded += 1;
                    return Ok(());
                }

                match store.relocate(old_path, new_path) {
                    Ok(()) => {
                        tracing::debug!(from = old_path, to = new_path, "Moved object");
                        ctx.summary.upgraded += 1;
                    }
                    Err(e) => ctx.progress.error(old_path, &e),
                }
            }
            Backend::Unsupported(name) => {
                return Err(UpgradeError::UnsupportedBackend(name.clone()));
            }
        }

        Ok(())
    }
}
