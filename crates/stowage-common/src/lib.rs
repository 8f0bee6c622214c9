//! Stowage-Common: Shared types, attachment layout, and errors.
//!
//! This crate provides common functionality used across stowage:
//!
//! - **Typed IDs**: `RecordId`, the integer primary key shared by every record table
//! - **Core Types**: `RecordKind` and the fixed attachment definitions per kind
//! - **Attachments**: the `Attachment` field value and the `Attachable` capability
//! - **Path Layout**: relative paths / object keys for each storage schema version
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use stowage_common::{RecordId, RecordKind};
//! use stowage_common::paths::{attachment_path, PathParts};
//!
//! let parts = PathParts {
//!     kind: RecordKind::Account,
//!     id: RecordId::from(1),
//!     remote: false,
//!     attachment: "avatars",
//!     style: "original",
//!     file_name: "me.png",
//! };
//!
//! assert_eq!(
//!     attachment_path(&parts, 0),
//!     "accounts/avatars/000/000/001/original/me.png"
//! );
//! ```

pub mod attachment;
pub mod error;
pub mod ids;
pub mod paths;
pub mod types;

pub use attachment::{Attachable, Attachment, CURRENT_STORAGE_SCHEMA_VERSION};
pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
