//! Relational store for journal entries.
//!
//! The store is a single `entries` table inside the plaintext working copy
//! of the journal. Connections are handed out by the session layer; this
//! module owns the schema and the queries against it.

pub mod entries;

use crate::errors::AppResult;
use rusqlite::Connection;

/// Creates the entries table if it is not already present. Idempotent, so
/// every writable session can run it unconditionally.
pub fn create_schema(conn: &Connection) -> AppResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS entries (
            created TEXT UNIQUE,
            modified TEXT,
            content TEXT
        )",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        create_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'entries'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_created_column_rejects_duplicates() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();

        conn.execute("INSERT INTO entries VALUES ('2024-01-01', 'm', 'a')", [])
            .unwrap();
        let err = conn
            .execute("INSERT INTO entries VALUES ('2024-01-01', 'm', 'b')", [])
            .unwrap_err();
        assert!(err.to_string().contains("UNIQUE"));
    }
}
