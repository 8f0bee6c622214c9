//! Attachment storage backends.
//!
//! The backend is chosen once at startup from configuration. Filesystem and
//! object-store backends each relocate files in their own way; the fog
//! driver is recognised so that it can be rejected cleanly.

mod filesystem;
mod s3;

pub use filesystem::{FilesystemStore, Relocation};
pub use s3::S3ObjectStore;

use stowage_common::Result;

use crate::config::StorageConfig;

/// Key-addressed object storage.
#[cfg_attr(test, mockall::automock)]
pub trait ObjectStore: Send + Sync {
    /// Whether an object exists under `key`.
    fn exists(&self, key: &str) -> Result<bool>;

    /// Move the object at `from` to `to`.
    fn relocate(&self, from: &str, to: &str) -> Result<()>;
}

/// The storage backend selected for this run.
pub enum Backend {
    Filesystem(FilesystemStore),
    ObjectStore(Box<dyn ObjectStore>),
    /// A backend this tool cannot operate on, named as in the config.
    Unsupported(String),
}

impl Backend {
    /// Build the backend described by the storage configuration.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        match config {
            StorageConfig::Filesystem { root } => {
                Ok(Self::Filesystem(FilesystemStore::new(root.clone())))
            }
            StorageConfig::S3(s3) => Ok(Self::ObjectStore(Box::new(S3ObjectStore::new(s3)?))),
            StorageConfig::Fog { .. } => Ok(Self::Unsupported(config.backend_name().to_string())),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Filesystem(_) => "filesystem",
            Self::ObjectStore(_) => "object store",
            Self::Unsupported(name) => name,
        }
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Filesystem(store) => f.debug_tuple("Filesystem").field(store).finish(),
            Self::ObjectStore(_) => f.write_str("ObjectStore"),
            Self::Unsupported(name) => f.debug_tuple("Unsupported").field(name).finish(),
        }
    }
}
