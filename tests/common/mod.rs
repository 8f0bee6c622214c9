//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which pairs an in-memory record store with a
//! temporary storage root, plus an in-memory object store and a progress sink
//! that records what the runner reports.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

use stowage::storage::{Backend, FilesystemStore, ObjectStore};
use stowage::upgrade::{ProgressSink, StorageSchemaUpgrade, UpgradeError, UpgradeSummary};
use stowage_common::{Error, Result};
use stowage_db::pool::{get_conn, init_memory_pool, PooledConnection};
use stowage_db::store::SqliteRecordStore;
use tempfile::TempDir;

/// In-memory database plus a temporary filesystem root.
pub struct TestHarness {
    pub store: SqliteRecordStore,
    pub root: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let pool = init_memory_pool().expect("failed to create in-memory pool");
        let root = tempfile::tempdir().expect("failed to create storage root");
        Self {
            store: SqliteRecordStore::new(pool),
            root,
        }
    }

    /// Borrow the single pooled connection. Drop it before running an upgrade.
    pub fn conn(&self) -> PooledConnection {
        get_conn(self.store.pool()).expect("failed to get connection")
    }

    pub fn filesystem_backend(&self) -> Backend {
        Backend::Filesystem(FilesystemStore::new(self.root.path().to_path_buf()))
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.root.path().join(key)
    }

    /// Create a file under the storage root, including parent directories.
    pub fn put_file(&self, key: &str, contents: &[u8]) {
        let path = self.path(key);
        std::fs::create_dir_all(path.parent().expect("key has a parent")).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    pub fn read_file(&self, key: &str) -> Option<Vec<u8>> {
        std::fs::read(self.path(key)).ok()
    }

    pub fn run(
        &self,
        backend: &Backend,
        batch_size: usize,
        dry_run: bool,
    ) -> (std::result::Result<UpgradeSummary, UpgradeError>, RecordingProgress) {
        let mut progress = RecordingProgress::default();
        let result =
            StorageSchemaUpgrade::new(&self.store, backend, batch_size).run(dry_run, &mut progress);
        (result, progress)
    }
}

/// Object store backed by a map, with keys that can be made to fail.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    failing: Mutex<HashSet<String>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: &str, contents: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), contents.to_vec());
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Make every request whose source is `key` fail.
    pub fn fail_on(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.failing.lock().unwrap().contains(key) {
            return Err(Error::storage(format!("simulated failure for {}", key)));
        }
        Ok(())
    }
}

impl ObjectStore for MemoryObjectStore {
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    fn relocate(&self, from: &str, to: &str) -> Result<()> {
        self.check(from)?;
        let mut objects = self.objects.lock().unwrap();
        let body = objects
            .remove(from)
            .ok_or_else(|| Error::not_found(from.to_string()))?;
        objects.insert(to.to_string(), body);
        Ok(())
    }
}

/// Shares a [`MemoryObjectStore`] between the backend and the test body.
pub struct SharedObjectStore(pub std::sync::Arc<MemoryObjectStore>);

impl ObjectStore for SharedObjectStore {
    fn exists(&self, key: &str) -> Result<bool> {
        self.0.exists(key)
    }

    fn relocate(&self, from: &str, to: &str) -> Result<()> {
        self.0.relocate(from, to)
    }
}

/// Progress sink that keeps everything it is told.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub increments: u64,
    pub errors: Vec<(String, String)>,
    pub finished: Option<u64>,
}

impl ProgressSink for RecordingProgress {
    fn increment(&mut self) {
        self.increments += 1;
    }

    fn error(&mut self, key: &str, error: &dyn std::error::Error) {
        self.errors.push((key.to_string(), error.to_string()));
    }

    fn finish(&mut self, total: u64) {
        self.finished = Some(total);
    }
}
