//! Preview card queries.

use chrono::Utc;
use rusqlite::Connection;
use stowage_common::{Error, RecordId, Result};

use super::{after_bound, limit_param, parse_timestamp};
use crate::models::PreviewCard;

const COLUMNS: &str = "id, url, image_file_name, image_storage_schema_version,
     created_at, updated_at";

fn parse_preview_card_row(row: &rusqlite::Row) -> rusqlite::Result<PreviewCard> {
    let id = RecordId::from(row.get::<_, i64>(0)?);
    let mut card = PreviewCard::new(id, row.get::<_, String>(1)?);
    card.image = card.image.with_file(row.get(2)?, row.get(3)?);
    card.created_at = parse_timestamp(row, 4)?;
    card.updated_at = parse_timestamp(row, 5)?;
    Ok(card)
}

/// Insert a new preview card.
pub fn insert_preview_card(conn: &Connection, card: &PreviewCard) -> Result<RecordId> {
    conn.execute(
        "INSERT INTO preview_cards (id, url, image_file_name, image_storage_schema_version,
             created_at, updated_at)
         VALUES (:id, :url, :image_file_name, :image_version, :created_at, :updated_at)",
        rusqlite::named_params! {
            ":id": card.id.get(),
            ":url": &card.url,
            ":image_file_name": card.image.file_name(),
            ":image_version": card.image.storage_schema_version(),
            ":created_at": card.created_at.to_rfc3339(),
            ":updated_at": card.updated_at.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(card.id)
}

/// Get a preview card by ID.
pub fn get_preview_card(conn: &Connection, id: RecordId) -> Result<Option<PreviewCard>> {
    let result = conn.query_row(
        &format!("SELECT {COLUMNS} FROM preview_cards WHERE id = :id"),
        rusqlite::named_params! { ":id": id.get() },
        parse_preview_card_row,
    );

    match result {
        Ok(card) => Ok(Some(card)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List up to `limit` preview cards with an id greater than `after`, ordered by id.
pub fn list_preview_cards_after(
    conn: &Connection,
    after: Option<RecordId>,
    limit: usize,
) -> Result<Vec<PreviewCard>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM preview_cards WHERE id > :after ORDER BY id LIMIT :limit"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let cards = stmt
        .query_map(
            rusqlite::named_params! {
                ":after": after_bound(after),
                ":limit": limit_param(limit),
            },
            parse_preview_card_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(cards)
}

/// Persist the image version of a preview card.
pub fn update_preview_card_attachments(conn: &Connection, card: &mut PreviewCard) -> Result<()> {
    let now = Utc::now();
    let rows = conn
        .execute(
            "UPDATE preview_cards
             SET image_storage_schema_version = :image_version, updated_at = :updated_at
             WHERE id = :id",
            rusqlite::named_params! {
                ":image_version": card.image.storage_schema_version(),
                ":updated_at": now.to_rfc3339(),
                ":id": card.id.get(),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if rows == 0 {
        return Err(Error::not_found(format!("preview card {}", card.id)));
    }

    card.updated_at = now;
    Ok(())
}
