use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite database file
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Records loaded per page while scanning a table
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("stowage.db")
}

fn default_batch_size() -> usize {
    1000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            batch_size: default_batch_size(),
        }
    }
}

/// Where attachment files live. Selected by the `backend` key.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Files under a local directory.
    Filesystem {
        #[serde(default = "default_filesystem_root")]
        root: PathBuf,
    },

    /// Objects in an S3-compatible bucket.
    S3(S3Config),

    /// Legacy fog driver. Accepted in config files but not supported by upgrades.
    Fog {
        #[serde(default)]
        provider: Option<String>,
    },
}

fn default_filesystem_root() -> PathBuf {
    PathBuf::from("public/system")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            root: default_filesystem_root(),
        }
    }
}

impl StorageConfig {
    /// Short backend name, as written in the config file.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Filesystem { .. } => "filesystem",
            Self::S3(_) => "s3",
            Self::Fog { .. } => "fog",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct S3Config {
    /// Bucket name or ARN
    pub bucket: String,

    /// Region; falls back to the AWS environment when unset
    #[serde(default)]
    pub region: Option<String>,

    /// Custom endpoint for S3-compatible stores (MinIO, Ceph, ...)
    #[serde(default)]
    pub endpoint: Option<String>,
}
