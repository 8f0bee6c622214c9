//! Account queries.

use chrono::Utc;
use rusqlite::Connection;
use stowage_common::{Error, RecordId, Result};

use super::{after_bound, limit_param, parse_timestamp};
use crate::models::Account;

const COLUMNS: &str = "id, username, domain,
     avatar_file_name, avatar_storage_schema_version,
     header_file_name, header_storage_schema_version,
     created_at, updated_at";

/// Parse an account from a database row.
///
/// Expects columns in the order of `COLUMNS`.
fn parse_account_row(row: &rusqlite::Row) -> rusqlite::Result<Account> {
    let id = RecordId::from(row.get::<_, i64>(0)?);
    let mut account = Account::new(id, row.get::<_, String>(1)?, row.get(2)?);
    account.avatar = account.avatar.with_file(row.get(3)?, row.get(4)?);
    account.header = account.header.with_file(row.get(5)?, row.get(6)?);
    account.created_at = parse_timestamp(row, 7)?;
    account.updated_at = parse_timestamp(row, 8)?;
    Ok(account)
}

/// Insert a new account, attachments included.
pub fn insert_account(conn: &Connection, account: &Account) -> Result<RecordId> {
    conn.execute(
        "INSERT INTO accounts (id, username, domain,
             avatar_file_name, avatar_storage_schema_version,
             header_file_name, header_storage_schema_version,
             created_at, updated_at)
         VALUES (:id, :username, :domain,
             :avatar_file_name, :avatar_version,
             :header_file_name, :header_version,
             :created_at, :updated_at)",
        rusqlite::named_params! {
            ":id": account.id.get(),
            ":username": &account.username,
            ":domain": &account.domain,
            ":avatar_file_name": account.avatar.file_name(),
            ":avatar_version": account.avatar.storage_schema_version(),
            ":header_file_name": account.header.file_name(),
            ":header_version": account.header.storage_schema_version(),
            ":created_at": account.created_at.to_rfc3339(),
            ":updated_at": account.updated_at.to_rfc3339(),
        },
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(account.id)
}

/// Get an account by ID.
///
/// # Returns
///
/// * `Ok(Some(Account))` - The account if found
/// * `Ok(None)` - If the account does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_account(conn: &Connection, id: RecordId) -> Result<Option<Account>> {
    let result = conn.query_row(
        &format!("SELECT {COLUMNS} FROM accounts WHERE id = :id"),
        rusqlite::named_params! { ":id": id.get() },
        parse_account_row,
    );

    match result {
        Ok(account) => Ok(Some(account)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::database(e.to_string())),
    }
}

/// List up to `limit` accounts with an id greater than `after`, ordered by id.
pub fn list_accounts_after(
    conn: &Connection,
    after: Option<RecordId>,
    limit: usize,
) -> Result<Vec<Account>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM accounts WHERE id > :after ORDER BY id LIMIT :limit"
        ))
        .map_err(|e| Error::database(e.to_string()))?;

    let accounts = stmt
        .query_map(
            rusqlite::named_params! {
                ":after": after_bound(after),
                ":limit": limit_param(limit),
            },
            parse_account_row,
        )
        .map_err(|e| Error::database(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(accounts)
}

/// Persist the attachment versions of an account and touch `updated_at`.
///
/// # Returns
///
/// * `Err(Error::NotFound)` - If the account no longer exists
pub fn update_account_attachments(conn: &Connection, account: &mut Account) -> Result<()> {
    let now = Utc::now();
    let rows = conn
        .execute(
            "UPDATE accounts
             SET avatar_storage_schema_version = :avatar_version,
                 header_storage_schema_version = :header_version,
                 updated_at = :updated_at
             WHERE id = :id",
            rusqlite::named_params! {
                ":avatar_version": account.avatar.storage_schema_version(),
                ":header_version": account.header.storage_schema_version(),
                ":updated_at": now.to_rfc3339(),
                ":id": account.id.get(),
            },
        )
        .map_err(|e| Error::database(e.to_string()))?;

    if rows == 0 {
        return Err(Error::not_found(format!("account {}", account.id)));
    }

    account.updated_at = now;
    Ok(())
}
