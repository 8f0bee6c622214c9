//! Attachment field values and the `Attachable` capability.

use crate::paths::{attachment_path, PathParts};
use crate::types::AttachmentDefinition;
use crate::{RecordId, RecordKind};

/// Storage schema version that every attachment is upgraded to.
pub const CURRENT_STORAGE_SCHEMA_VERSION: i32 = 1;

/// The value of one attachment field on a loaded record.
///
/// Tracks the schema version as last read from or written to the store, so
/// that in-memory bumps can be detected before saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    kind: RecordKind,
    record_id: RecordId,
    remote: bool,
    definition: &'static AttachmentDefinition,
    file_name: Option<String>,
    storage_schema_version: i32,
    persisted_version: i32,
}

impl Attachment {
    /// Build an attachment as loaded from the store.
    ///
    /// A missing version column reads as schema version 0.
    pub fn new(
        kind: RecordKind,
        record_id: RecordId,
        remote: bool,
        definition: &'static AttachmentDefinition,
        file_name: Option<String>,
        storage_schema_version: Option<i32>,
    ) -> Self {
        let version = storage_schema_version.unwrap_or(0);
        Self {
            kind,
            record_id,
            remote,
            definition,
            file_name,
            storage_schema_version: version,
            persisted_version: version,
        }
    }

    /// Same field on the same record, holding a different file.
    pub fn with_file(&self, file_name: Option<String>, storage_schema_version: Option<i32>) -> Self {
        Self::new(
            self.kind,
            self.record_id,
            self.remote,
            self.definition,
            file_name,
            storage_schema_version,
        )
    }

    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// True when no file is attached.
    pub fn is_blank(&self) -> bool {
        self.file_name.as_deref().map_or(true, str::is_empty)
    }

    pub fn styles(&self) -> &'static [&'static str] {
        self.definition.styles
    }

    pub fn storage_schema_version(&self) -> i32 {
        self.storage_schema_version
    }

    /// Change the in-memory schema version. Nothing is persisted.
    pub fn set_storage_schema_version(&mut self, version: i32) {
        self.storage_schema_version = version;
    }

    /// Whether the in-memory version differs from the persisted one.
    pub fn is_changed(&self) -> bool {
        self.storage_schema_version != self.persisted_version
    }

    /// Record that the current in-memory state has been saved.
    pub fn mark_persisted(&mut self) {
        self.persisted_version = self.storage_schema_version;
    }

    /// Relative path / object key of `style` under the current in-memory version.
    ///
    /// Returns `None` for blank attachments.
    pub fn path(&self, style: &str) -> Option<String> {
        let file_name = self.file_name.as_deref().filter(|name| !name.is_empty())?;
        let parts = PathParts {
            kind: self.kind,
            id: self.record_id,
            remote: self.remote,
            attachment: self.definition.path_segment,
            style,
            file_name,
        };
        Some(attachment_path(&parts, self.storage_schema_version))
    }
}

/// Uniform access to the attachment fields of any record type.
pub trait Attachable {
    fn kind(&self) -> RecordKind;

    fn id(&self) -> RecordId;

    /// Names of the attachment fields, in declaration order.
    fn attachment_names(&self) -> Vec<&'static str> {
        self.kind().attachments().iter().map(|def| def.name).collect()
    }

    fn attachment(&self, name: &str) -> Option<&Attachment>;

    fn attachment_mut(&mut self, name: &str) -> Option<&mut Attachment>;

    /// Whether any attachment changed since the record was loaded or saved.
    fn has_changes(&self) -> bool {
        self.attachment_names()
            .into_iter()
            .filter_map(|name| self.attachment(name))
            .any(Attachment::is_changed)
    }

    /// Mark every attachment as persisted.
    fn mark_persisted(&mut self) {
        for name in self.attachment_names() {
            if let Some(attachment) = self.attachment_mut(name) {
                attachment.mark_persisted();
            }
        }
    }
}
