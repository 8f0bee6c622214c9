//! Custom emoji queries.

use chrono::Utc;
use rusqlite::Connection;
use stowage_common::{Error, RecordId, Result};

use super::{after_bound, limit_param, parse_timestamp};
use crate::models::CustomEmoji;

const COLUMNS: &str = "id, shortcode, domain,
     image_file_name, image_storage_schema_version,
     created_at, updated_at";

fn parse_custom_emoji_row(row: &rusqlite::Row) -> rusqlite::Result<CustomEmoji> {
    let id = RecordId::from(row.get::<_, i64>(0)?);
    let mut emoji = CustomEmoji::new(id, row.get::<_, String>(1)?, row.get(2)?);
    emoji.image = emoji.image.with_file(row.get(3)?, row.get(4)?);
    emoji.created_at = parse_timestamp(row, 5)?;
    emoji.updated_at = parse_timestamp(row, 6)?;
    Ok(emoji)
}

/// Insert a new custom emoji.
pub fn insert_custom_emoji(conn: &Connection, emoji: &CustomEmoji) -> Result<RecordId> {
    conn.execute(
        "INSERT INTO custom_emojis (id, shortcode, domain,
             image_file_name, image_storage_schema_version, created_at, updated_at)
         VALUES (:id, :shortcode, :domain, :image_file_name, :image_version,
             :created_at, :updated_at)",
        rusqlite::named_params! {
            ":id": emoji.id.get(),
            ":shortcode": &emoji.shortcode,
            ":domain": &emoji.domain,
            ":image_file_name": emoji.image.file_name(),
            ":image_version": emoji.image.storage_schema_version(),
            ":created_at": emoji.created_at.to_rfc3339(),
            ":updated_at": emoji.updated_at.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(emoji.id)
}

/// Get a custom emoji by ID.
pub fn get_custom_emoji(conn: &Connection, id: RecordId) -> Result<Option<CustomEmoji>> {
    let result = conn.query_row(
        &format!("SELECT {COLUMNS} FROM custom_emojis WHERE id = :id"),
        rusqlite::named_params! { ":id": id.get() },
        parse_custom_emoji_row,
    );

    match result {
        Ok(emoji) => Ok(Some(emoji)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List up to `limit` custom emoji with an id greater than `after`, ordered by id.
pub fn list_custom_emojis_after(
    conn: &Connection,
    after: Option<RecordId>,
    limit: usize,
) -> Result<Vec<CustomEmoji>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM custom_emojis WHERE id > :after ORDER BY id LIMIT :limit"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let emojis = stmt
        .query_map(
            rusqlite::named_params! {
                ":after": after_bound(after),
                ":limit": limit_param(limit),
            },
            parse_custom_emoji_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(emojis)
}

/// Persist the image version of a custom emoji and touch `updated_at`.
pub fn update_custom_emoji_attachments(conn: &Connection, emoji: &mut CustomEmoji) -> Result<()> {
    let now = Utc::now();
    let rows = conn
        .execute(
            "UPDATE custom_emojis
             SET image_storage_schema_version = :image_version, updated_at = :updated_at
             WHERE id = :id",
            rusqlite::named_params! {
                ":image_version": emoji.image.storage_schema_version(),
                ":updated_at": now.to_rfc3339(),
                ":id": emoji.id.get(),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if rows == 0 {
        return Err(Error::not_found(format!("custom emoji {}", emoji.id)));
    }

    emoji.updated_at = now;
    Ok(())
}
