//! Database query modules.
//!
//! One module per attachable table, each with the same shape:
//! - `insert_*`: create a record (used when seeding and in tests)
//! - `get_*`: load one record by id
//! - `list_*_after`: keyset-paginated scan ordered by id
//! - `update_*_attachments`: persist attachment versions and `updated_at`

pub mod accounts;
pub mod custom_emojis;
pub mod media_attachments;
pub mod preview_cards;

use chrono::{DateTime, NaiveDateTime, Utc};
use stowage_common::RecordId;

/// Format written by SQLite's `datetime()`, always UTC.
const SQLITE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a timestamp column.
///
/// Accepts RFC 3339 as written by this crate and the offset-less
/// `YYYY-MM-DD HH:MM:SS` form produced by SQLite's `datetime('now')`.
pub(crate) fn parse_timestamp(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    parse_timestamp_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_timestamp_str(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(rfc_err) => NaiveDateTime::parse_from_str(raw, SQLITE_DATETIME_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|_| rfc_err),
    }
}

/// Lower bound for keyset pagination; `None` starts from the first row.
pub(crate) fn after_bound(after: Option<RecordId>) -> i64 {
    after.map_or(i64::MIN, i64::from)
}

/// Page size as an SQL parameter.
pub(crate) fn limit_param(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
