//! Media attachment queries.

use chrono::Utc;
use rusqlite::Connection;
use stowage_common::{Error, RecordId, Result};

use super::{after_bound, limit_param, parse_timestamp};
use crate::models::MediaAttachment;

const COLUMNS: &str = "id, account_id, remote_url,
     file_file_name, file_storage_schema_version,
     thumbnail_file_name, thumbnail_storage_schema_version,
     created_at, updated_at";

fn parse_media_attachment_row(row: &rusqlite::Row) -> rusqlite::Result<MediaAttachment> {
    let id = RecordId::from(row.get::<_, i64>(0)?);
    let account_id = row.get::<_, Option<i64>>(1)?.map(RecordId::from);
    let mut media = MediaAttachment::new(id, account_id, row.get::<_, String>(2)?);
    media.file = media.file.with_file(row.get(3)?, row.get(4)?);
    media.thumbnail = media.thumbnail.with_file(row.get(5)?, row.get(6)?);
    media.created_at = parse_timestamp(row, 7)?;
    media.updated_at = parse_timestamp(row, 8)?;
    Ok(media)
}

/// Insert a new media attachment.
pub fn insert_media_attachment(conn: &Connection, media: &MediaAttachment) -> Result<RecordId> {
    conn.execute(
        "INSERT INTO media_attachments (id, account_id, remote_url,
             file_file_name, file_storage_schema_version,
             thumbnail_file_name, thumbnail_storage_schema_version,
             created_at, updated_at)
         VALUES (:id, :account_id, :remote_url,
             :file_file_name, :file_version,
             :thumbnail_file_name, :thumbnail_version,
             :created_at, :updated_at)",
        rusqlite::named_params! {
            ":id": media.id.get(),
            ":account_id": media.account_id.map(RecordId::get),
            ":remote_url": &media.remote_url,
            ":file_file_name": media.file.file_name(),
            ":file_version": media.file.storage_schema_version(),
            ":thumbnail_file_name": media.thumbnail.file_name(),
            ":thumbnail_version": media.thumbnail.storage_schema_version(),
            ":created_at": media.created_at.to_rfc3339(),
            ":updated_at": media.updated_at.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(media.id)
}

/// Get a media attachment by ID.
pub fn get_media_attachment(conn: &Connection, id: RecordId) -> Result<Option<MediaAttachment>> {
    let result = conn.query_row(
        &format!("SELECT {COLUMNS} FROM media_attachments WHERE id = :id"),
        rusqlite::named_params! { ":id": id.get() },
        parse_media_attachment_row,
    );

    match result {
        Ok(media) => Ok(Some(media)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List up to `limit` media attachments with an id greater than `after`, ordered by id.
pub fn list_media_attachments_after(
    conn: &Connection,
    after: Option<RecordId>,
    limit: usize,
) -> Result<Vec<MediaAttachment>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM media_attachments WHERE id > :after ORDER BY id LIMIT :limit"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let media = stmt
        .query_map(
            rusqlite::named_params! {
                ":after": after_bound(after),
                ":limit": limit_param(limit),
            },
            parse_media_attachment_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(media)
}

/// Persist the file and thumbnail versions of a media attachment.
pub fn update_media_attachment_attachments(
    conn: &Connection,
    media: &mut MediaAttachment,
) -> Result<()> {
    let now = Utc::now();
    let rows = conn
        .execute(
            "UPDATE media_attachments
             SET file_storage_schema_version = :file_version,
                 thumbnail_storage_schema_version = :thumbnail_version,
                 updated_at = :updated_at
             WHERE id = :id",
            rusqlite::named_params! {
                ":file_version": media.file.storage_schema_version(),
                ":thumbnail_version": media.thumbnail.storage_schema_version(),
                ":updated_at": now.to_rfc3339(),
                ":id": media.id.get(),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if rows == 0 {
        return Err(Error::not_found(format!("media attachment {}", media.id)));
    }

    media.updated_at = now;
    Ok(())
}
