//! Record kinds and their attachment definitions.
//!
//! The set of attachable record types is closed: accounts, custom emoji,
//! media attachments, and preview cards. Each kind declares its attachment
//! fields and the styles (renditions) stored for each field.

use std::fmt;

/// Declaration of one attachment field on a record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentDefinition {
    /// Field name, e.g. `avatar`.
    pub name: &'static str,
    /// Directory segment used in storage paths, e.g. `avatars`.
    pub path_segment: &'static str,
    /// Renditions stored for this field.
    pub styles: &'static [&'static str],
}

const ACCOUNT_ATTACHMENTS: &[AttachmentDefinition] = &[
    AttachmentDefinition {
        name: "avatar",
        path_segment: "avatars",
        styles: &["original", "static"],
    },
    AttachmentDefinition {
        name: "header",
        path_segment: "headers",
        styles: &["original", "static"],
    },
];

const CUSTOM_EMOJI_ATTACHMENTS: &[AttachmentDefinition] = &[AttachmentDefinition {
    name: "image",
    path_segment: "images",
    styles: &["original", "static"],
}];

const MEDIA_ATTACHMENT_ATTACHMENTS: &[AttachmentDefinition] = &[
    AttachmentDefinition {
        name: "file",
        path_segment: "files",
        styles: &["original", "small"],
    },
    AttachmentDefinition {
        name: "thumbnail",
        path_segment: "thumbnails",
        styles: &["original"],
    },
];

const PREVIEW_CARD_ATTACHMENTS: &[AttachmentDefinition] = &[AttachmentDefinition {
    name: "image",
    path_segment: "images",
    styles: &["original"],
}];

/// Kind of attachable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// A local or remote account (avatar, header).
    Account,
    /// A custom emoji (image).
    CustomEmoji,
    /// Media attached to a status (file, thumbnail).
    MediaAttachment,
    /// A link preview card (image).
    PreviewCard,
}

impl RecordKind {
    /// All kinds, in the order they are migrated.
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Account,
        RecordKind::CustomEmoji,
        RecordKind::MediaAttachment,
        RecordKind::PreviewCard,
    ];

    /// Database table name, also the leading segment of storage paths.
    pub fn table_name(&self) -> &'static str {
        match self {
            Self::Account => "accounts",
            Self::CustomEmoji => "custom_emojis",
            Self::MediaAttachment => "media_attachments",
            Self::PreviewCard => "preview_cards",
        }
    }

    /// Attachment fields declared on this kind.
    pub fn attachments(&self) -> &'static [AttachmentDefinition] {
        match self {
            Self::Account => ACCOUNT_ATTACHMENTS,
            Self::CustomEmoji => CUSTOM_EMOJI_ATTACHMENTS,
            Self::MediaAttachment => MEDIA_ATTACHMENT_ATTACHMENTS,
            Self::PreviewCard => PREVIEW_CARD_ATTACHMENTS,
        }
    }

    /// Look up an attachment definition by field name.
    pub fn attachment(&self, name: &str) -> Option<&'static AttachmentDefinition> {
        self.attachments().iter().find(|def| def.name == name)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account => write!(f, "account"),
            Self::CustomEmoji => write!(f, "custom_emoji"),
            Self::MediaAttachment => write!(f, "media_attachment"),
            Self::PreviewCard => write!(f, "preview_card"),
        }
    }
}
