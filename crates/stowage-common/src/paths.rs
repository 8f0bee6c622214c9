//! Storage path layout for attachment styles.
//!
//! A style's relative path (also its object key on remote stores) is a pure
//! function of the record it belongs to, the attachment and style names, the
//! stored file name, and the attachment's storage schema version:
//!
//! - version 0: `{table}/{attachment}/{partition9}/{style}/{file_name}`
//! - version 1: `{cache/}{table}/{attachment}/{partition18}/{style}/{file_name}`
//!
//! The version 0 partition pads the id to nine digits and keeps only complete
//! three-digit groups, so ids longer than nine digits lose their trailing
//! digits. Version 1 pads to eighteen digits, which covers every positive id.

/// Inputs to the path function, minus the schema version.
#[derive(Debug, Clone, Copy)]
pub struct PathParts<'a> {
    pub kind: crate::RecordKind,
    pub id: crate::RecordId,
    /// Whether the record was fetched from another server.
    pub remote: bool,
    /// Attachment path segment, e.g. `avatars`.
    pub attachment: &'a str,
    pub style: &'a str,
    pub file_name: &'a str,
}

/// Prefix applied to remote records from schema version 1 onwards.
const REMOTE_CACHE_PREFIX: &str = "cache/";

/// Compute the relative path of a style under the given schema version.
///
/// # Examples
///
/// ```
/// use stowage_common::{RecordId, RecordKind};
/// use stowage_common::paths::{attachment_path, PathParts};
///
/// let parts = PathParts {
///     kind: RecordKind::MediaAttachment,
///     id: RecordId::from(1234),
///     remote: true,
///     attachment: "files",
///     style: "small",
///     file_name: "cat.jpg",
/// };
///
/// assert_eq!(
///     attachment_path(&parts, 1),
///     "cache/media_attachments/files/000/000/000/000/001/234/small/cat.jpg"
/// );
/// ```
pub fn attachment_path(parts: &PathParts<'_>, version: i32) -> String {
    let (prefix, partition) = if version >= 1 {
        let prefix = if parts.remote && parts.kind != crate::RecordKind::PreviewCard {
            REMOTE_CACHE_PREFIX
        } else {
            ""
        };
        (prefix, id_partition(parts.id, 18))
    } else {
        ("", id_partition(parts.id, 9))
    };

    format!(
        "{}{}/{}/{}/{}/{}",
        prefix,
        parts.kind.table_name(),
        parts.attachment,
        partition,
        parts.style,
        parts.file_name
    )
}

/// Split a zero-padded id into `/`-separated groups of three digits.
///
/// A trailing group shorter than three digits is dropped.
pub fn id_partition(id: crate::RecordId, width: usize) -> String {
    let digits = format!("{:0width$}", id.get().unsigned_abs(), width = width);
    digits
        .as_bytes()
        .chunks_exact(3)
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RecordId, RecordKind};

    fn parts(kind: RecordKind, id: i64, remote: bool) -> PathParts<'static> {
        PathParts {
            kind,
            id: RecordId::from(id),
            remote,
            attachment: "images",
            style: "original",
            file_name: "blob.png",
        }
    }

    #[test]
    fn test_legacy_partition_pads_to_nine_digits() {
        assert_eq!(id_partition(RecordId::from(1), 9), "000/000/001");
        assert_eq!(id_partition(RecordId::from(123_456_789), 9), "123/456/789");
    }

    #[test]
    fn test_legacy_partition_drops_incomplete_trailing_group() {
        assert_eq!(
            id_partition(RecordId::from(1_234_567_890_123), 9),
            "123/456/789/012"
        );
    }

    #[test]
    fn test_current_partition_pads_to_eighteen_digits() {
        assert_eq!(
            id_partition(RecordId::from(1), 18),
            "000/000/000/000/000/001"
        );
        assert_eq!(
            id_partition(RecordId::from(103_000_000_000_000_042), 18),
            "103/000/000/000/000/042"
        );
    }

    #[test]
    fn test_legacy_path_has_no_cache_prefix() {
        let p = parts(RecordKind::CustomEmoji, 5, true);
        assert_eq!(
            attachment_path(&p, 0),
            "custom_emojis/images/000/000/005/original/blob.png"
        );
    }

    #[test]
    fn test_current_path_prefixes_remote_records() {
        let p = parts(RecordKind::CustomEmoji, 5, true);
        assert_eq!(
            attachment_path(&p, 1),
            "cache/custom_emojis/images/000/000/000/000/000/005/original/blob.png"
        );

        let local = parts(RecordKind::CustomEmoji, 5, false);
        assert_eq!(
            attachment_path(&local, 1),
            "custom_emojis/images/000/000/000/000/000/005/original/blob.png"
        );
    }

    #[test]
    fn test_preview_cards_are_never_prefixed() {
        let p = parts(RecordKind::PreviewCard, 9, true);
        assert!(attachment_path(&p, 1).starts_with("preview_cards/"));
    }

    #[test]
    fn test_path_is_stable_for_a_version() {
        let p = parts(RecordKind::Account, 77, false);
        assert_eq!(attachment_path(&p, 1), attachment_path(&p, 1));
        assert_ne!(attachment_path(&p, 0), attachment_path(&p, 1));
    }
}
