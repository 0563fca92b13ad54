use rusqlite::Connection;

use crate::error::Result;

/// Initialise the queue schema in `conn`.
///
/// Safe to run on every process start: the table and the index are only
/// created when absent. The index covers the poll query
/// (`WHERE sent = 0 AND scheduled_at <= ? ORDER BY scheduled_at`).
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS scheduled_messages (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            destination   TEXT    NOT NULL,
            body          TEXT    NOT NULL,
            scheduled_at  TEXT    NOT NULL,   -- RFC 3339 UTC, fixed width
            sent          INTEGER NOT NULL DEFAULT 0,
            created_at    TEXT    NOT NULL
        ) STRICT;

        CREATE INDEX IF NOT EXISTS idx_scheduled_messages_due
            ON scheduled_messages (sent, scheduled_at);
        ",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        init_db(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'table' AND name = 'scheduled_messages'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }
}
