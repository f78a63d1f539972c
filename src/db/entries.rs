//! Queries over the `entries` table.

use crate::errors::{AppResult, StoreError};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

/// Inserts the entry for `created`, or replaces its content and modified
/// timestamp if one already exists. `modified` is an RFC3339 timestamp.
pub fn upsert_entry(
    conn: &Connection,
    created: NaiveDate,
    modified: &str,
    content: &str,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO entries (created, modified, content) VALUES (?1, ?2, ?3)
         ON CONFLICT(created) DO UPDATE
         SET modified = excluded.modified,
             content = excluded.content",
        (created.to_string(), modified, content),
    )
    .map_err(StoreError::Sqlite)?;
    debug!("Upserted entry for {}", created);
    Ok(())
}

/// Fetches the content of the entry for `created`, or `None` when no entry
/// exists on that date.
///
/// # Errors
///
/// Returns [`StoreError::DuplicateDate`] if more than one row carries the
/// date, which the unique constraint should make impossible.
pub fn entry_content(conn: &Connection, created: NaiveDate) -> AppResult<Option<String>> {
    let date = created.to_string();
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM entries WHERE created = ?1",
        [&date],
        |row| row.get(0),
    )?;
    if count > 1 {
        return Err(StoreError::DuplicateDate(created).into());
    }

    let content = conn
        .query_row(
            "SELECT content FROM entries WHERE created = ?1",
            [&date],
            |row| row.get(0),
        )
        .optional()
        .map_err(StoreError::Sqlite)?;
    Ok(content)
}

/// The most recent entry date, or [`StoreError::NoEntries`] when the journal
/// holds nothing yet.
pub fn latest_entry_date(conn: &Connection) -> AppResult<NaiveDate> {
    let latest: Option<NaiveDate> = conn
        .query_row("SELECT MAX(created) FROM entries", [], |row| row.get(0))
        .optional()
        .map_err(StoreError::Sqlite)?
        .flatten();

    Ok(latest.ok_or(StoreError::NoEntries)?)
}
