//! Attachable record models.
//!
//! One struct per table, each exposing its attachment fields through the
//! `Attachable` trait. `AnyRecord` is the closed union the record store
//! hands to the upgrade runner.

use chrono::{DateTime, Utc};
use stowage_common::{Attachable, Attachment, RecordId, RecordKind};

/// Build an empty attachment for `name` on a record.
///
/// Panics only if `name` is not declared on `kind`, which is a programming
/// error in this module.
fn blank(kind: RecordKind, id: RecordId, remote: bool, name: &str) -> Attachment {
    let definition = kind
        .attachment(name)
        .unwrap_or_else(|| panic!("{kind} has no attachment named {name}"));
    Attachment::new(kind, id, remote, definition, None, None)
}

/// A local (no domain) or remote account.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: RecordId,
    pub username: String,
    pub domain: Option<String>,
    pub avatar: Attachment,
    pub header: Attachment,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: RecordId, username: impl Into<String>, domain: Option<String>) -> Self {
        let remote = domain.is_some();
        let now = Utc::now();
        Self {
            id,
            username: username.into(),
            domain,
            avatar: blank(RecordKind::Account, id, remote, "avatar"),
            header: blank(RecordKind::Account, id, remote, "header"),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A custom emoji, local or copied from another server.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEmoji {
    pub id: RecordId,
    pub shortcode: String,
    pub domain: Option<String>,
    pub image: Attachment,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CustomEmoji {
    pub fn new(id: RecordId, shortcode: impl Into<String>, domain: Option<String>) -> Self {
        let remote = domain.is_some();
        let now = Utc::now();
        Self {
            id,
            shortcode: shortcode.into(),
            domain,
            image: blank(RecordKind::CustomEmoji, id, remote, "image"),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Media attached to a status. Remote media carries the URL it was fetched from.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaAttachment {
    pub id: RecordId,
    pub account_id: Option<RecordId>,
    pub remote_url: String,
    pub file: Attachment,
    pub thumbnail: Attachment,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MediaAttachment {
    pub fn new(id: RecordId, account_id: Option<RecordId>, remote_url: impl Into<String>) -> Self {
        let remote_url = remote_url.into();
        let remote = !remote_url.is_empty();
        let now = Utc::now();
        Self {
            id,
            account_id,
            remote_url,
            file: blank(RecordKind::MediaAttachment, id, remote, "file"),
            thumbnail: blank(RecordKind::MediaAttachment, id, remote, "thumbnail"),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A link preview card.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewCard {
    pub id: RecordId,
    pub url: String,
    pub image: Attachment,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PreviewCard {
    pub fn new(id: RecordId, url: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            url: url.into(),
            image: blank(RecordKind::PreviewCard, id, false, "image"),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Attachable for Account {
    fn kind(&self) -> RecordKind {
        RecordKind::Account
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn attachment(&self, name: &str) -> Option<&Attachment> {
        match name {
            "avatar" => Some(&self.avatar),
            "header" => Some(&self.header),
            _ => None,
        }
    }

    fn attachment_mut(&mut self, name: &str) -> Option<&mut Attachment> {
        match name {
            "avatar" => Some(&mut self.avatar),
            "header" => Some(&mut self.header),
            _ => None,
        }
    }
}

impl Attachable for CustomEmoji {
    fn kind(&self) -> RecordKind {
        RecordKind::CustomEmoji
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn attachment(&self, name: &str) -> Option<&Attachment> {
        (name == "image").then_some(&self.image)
    }

    fn attachment_mut(&mut self, name: &str) -> Option<&mut Attachment> {
        (name == "image").then_some(&mut self.image)
    }
}

impl Attachable for MediaAttachment {
    fn kind(&self) -> RecordKind {
        RecordKind::MediaAttachment
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn attachment(&self, name: &str) -> Option<&Attachment> {
        match name {
            "file" => Some(&self.file),
            "thumbnail" => Some(&self.thumbnail),
            _ => None,
        }
    }

    fn attachment_mut(&mut self, name: &str) -> Option<&mut Attachment> {
        match name {
            "file" => Some(&mut self.file),
            "thumbnail" => Some(&mut self.thumbnail),
            _ => None,
        }
    }
}

impl Attachable for PreviewCard {
    fn kind(&self) -> RecordKind {
        RecordKind::PreviewCard
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn attachment(&self, name: &str) -> Option<&Attachment> {
        (name == "image").then_some(&self.image)
    }

    fn attachment_mut(&mut self, name: &str) -> Option<&mut Attachment> {
        (name == "image").then_some(&mut self.image)
    }
}

/// Any attachable record.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyRecord {
    Account(Account),
    CustomEmoji(CustomEmoji),
    MediaAttachment(MediaAttachment),
    PreviewCard(PreviewCard),
}

impl AnyRecord {
    fn as_attachable(&self) -> &dyn Attachable {
        match self {
            Self::Account(r) => r,
            Self::CustomEmoji(r) => r,
            Self::MediaAttachment(r) => r,
            Self::PreviewCard(r) => r,
        }
    }

    fn as_attachable_mut(&mut self) -> &mut dyn Attachable {
        match self {
            Self::Account(r) => r,
            Self::CustomEmoji(r) => r,
            Self::MediaAttachment(r) => r,
            Self::PreviewCard(r) => r,
        }
    }
}

impl Attachable for AnyRecord {
    fn kind(&self) -> RecordKind {
        self.as_attachable().kind()
    }

    fn id(&self) -> RecordId {
        self.as_attachable().id()
    }

    fn attachment(&self, name: &str) -> Option<&Attachment> {
        self.as_attachable().attachment(name)
    }

    fn attachment_mut(&mut self, name: &str) -> Option<&mut Attachment> {
        self.as_attachable_mut().attachment_mut(name)
    }
}

impl From<Account> for AnyRecord {
    fn from(record: Account) -> Self {
        Self::Account(record)
    }
}

impl From<CustomEmoji> for AnyRecord {
    fn from(record: CustomEmoji) -> Self {
        Self::CustomEmoji(record)
    }
}

impl From<MediaAttachment> for AnyRecord {
    fn from(record: MediaAttachment) -> Self {
        Self::MediaAttachment(record)
    }
}

impl From<PreviewCard> for AnyRecord {
    fn from(record: PreviewCard) -> Self {
        Self::PreviewCard(record)
    }
}
