//! Local filesystem storage.
//!
//! Attachment keys are relative paths under a root directory, e.g.
//! `{root}/accounts/avatars/000/000/001/original/me.png`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use stowage_common::Result;

/// Outcome of a filesystem relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relocation {
    Moved,
    /// Nothing existed at the source path; nothing was touched.
    SourceMissing,
}

/// Filesystem manager for attachment files.
#[derive(Debug, Clone)]
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a storage key.
    pub fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Move the file at `from` to `to`, creating parent directories of `to`.
    ///
    /// A missing source is not an error: it was never stored or has already
    /// been moved.
    pub fn relocate(&self, from: &str, to: &str) -> Result<Relocation> {
        let source = self.resolve(from);
        let destination = self.resolve(to);

        if let Err(e) = std::fs::symlink_metadata(&source) {
            if e.kind() == ErrorKind::NotFound {
                return Ok(Relocation::SourceMissing);
            }
            return Err(e.into());
        }

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match std::fs::rename(&source, &destination) {
            Ok(()) => Ok(Relocation::Moved),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Relocation::SourceMissing),
            Err(rename_err) => {
                // rename cannot cross filesystems; copy and remove instead
                copy_then_remove(&source, &destination, rename_err)?;
                Ok(Relocation::Moved)
            }
        }
    }
}

/// Copy `source` to `destination`, then remove `source`.
///
/// A failed copy removes whatever part of `destination` was written. The
/// returned error carries both the rename and the copy failure.
fn copy_then_remove(
    source: &Path,
    destination: &Path,
    rename_err: std::io::Error,
) -> std::io::Result<()> {
    if let Err(copy_err) = std::fs::copy(source, destination) {
        if let Err(e) = std::fs::remove_file(destination) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(path = ?destination, error = %e, "Failed to remove partial copy");
            }
        }
        return Err(std::io::Error::new(
            copy_err.kind(),
            format!("rename failed ({}), copy fallback failed: {}", rename_err, copy_err),
        ));
    }
    std::fs::remove_file(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_joins_root() {
        let store = FilesystemStore::new(PathBuf::from("/srv/system"));
        assert_eq!(
            store.resolve("accounts/avatars/000/000/001/original/a.png"),
            PathBuf::from("/srv/system/accounts/avatars/000/000/001/original/a.png")
        );
    }

    #[test]
    fn test_relocate_moves_file_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemStore::new(dir.path().to_path_buf());

        let from = "old/original/a.png";
        let to = "new/000/000/001/original/a.png";
        std::fs::create_dir_all(store.resolve("old/original")).unwrap();
        std::fs::write(store.resolve(from), b"png").unwrap();

        assert_eq!(store.relocate(from, to).unwrap(), Relocation::Moved);
        assert!(!store.resolve(from).exists());
        assert_eq!(std::fs::read(store.resolve(to)).unwrap(), b"png");
    }

    #[test]
    fn test_relocate_missing_source_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemStore::new(dir.path().to_path_buf());

        let outcome = store.relocate("missing/a.png", "new/deep/a.png").unwrap();

        assert_eq!(outcome, Relocation::SourceMissing);
        assert!(!store.resolve("new").exists());
    }

    #[test]
    fn test_failed_copy_fallback_cleans_up_and_reports_both_errors() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be copied, so the fallback fails
        let source = dir.path().join("not-a-file");
        std::fs::create_dir(&source).unwrap();
        let destination = dir.path().join("partial.png");
        std::fs::write(&destination, b"half").unwrap();

        let rename_err = std::io::Error::new(ErrorKind::Other, "cross-device link");
        let err = copy_then_remove(&source, &destination, rename_err).unwrap_err();

        assert!(!destination.exists());
        assert!(source.exists());
        let message = err.to_string();
        assert!(message.contains("cross-device link"), "{message}");
        assert!(message.contains("copy fallback failed"), "{message}");
    }

    #[test]
    fn test_relocate_overwrites_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemStore::new(dir.path().to_path_buf());

        std::fs::write(store.resolve("a.png"), b"fresh").unwrap();
        std::fs::create_dir_all(store.resolve("dest")).unwrap();
        std::fs::write(store.resolve("dest/a.png"), b"stale").unwrap();

        store.relocate("a.png", "dest/a.png").unwrap();
        assert_eq!(std::fs::read(store.resolve("dest/a.png")).unwrap(), b"fresh");
    }
}
