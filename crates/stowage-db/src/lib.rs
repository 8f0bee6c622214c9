//! Stowage-DB: Record store for attachable records
//!
//! This crate provides the SQLite-backed record store using rusqlite with
//! r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Attachable record models
//! - `queries` - Per-table insert, lookup, pagination, and update
//! - `store` - The `RecordStore` abstraction used by the upgrade runner
//!
//! # Example
//!
//! ```no_run
//! use stowage_common::RecordKind;
//! use stowage_db::pool::init_pool;
//! use stowage_db::store::{RecordStore, SqliteRecordStore};
//!
//! let pool = init_pool("/var/lib/stowage/stowage.db").unwrap();
//! let store = SqliteRecordStore::new(pool);
//!
//! let first_page = store.find_batch(RecordKind::Account, None, 1000).unwrap();
//! println!("Loaded {} accounts", first_page.len());
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;
