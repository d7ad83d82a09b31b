//! The append-only activity log that records ledger mutations.
//!
//! The ledger only ever writes to this log. A failed write is logged to the
//! error channel and swallowed: the financial mutation it describes has
//! already committed, so the caller must not see the failure.

use rusqlite::Connection;
use time::OffsetDateTime;

pub fn create_activity_log_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS activity_log (
            id INTEGER PRIMARY KEY,
            activity_type TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            related_id TEXT,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Append an entry to the activity log, best effort.
pub fn log_activity(
    connection: &Connection,
    activity_type: &str,
    title: &str,
    description: &str,
    related_id: Option<&str>,
) {
    let result = connection.execute(
        "INSERT INTO activity_log (activity_type, title, description, related_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            activity_type,
            title,
            description,
            related_id,
            OffsetDateTime::now_utc(),
        ),
    );

    if let Err(error) = result {
        tracing::error!("Failed to log activity \"{title}\": {error}");
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{create_activity_log_table, log_activity};

    #[test]
    fn writes_entry() {
        let connection = Connection::open_in_memory().unwrap();
        create_activity_log_table(&connection).unwrap();

        log_activity(
            &connection,
            "other",
            "Withdrawal Processed",
            "Withdrew ₵50 from offering for Generator fuel",
            Some("WD-1-1"),
        );

        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM activity_log", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn write_failure_is_swallowed() {
        let connection = Connection::open_in_memory().unwrap();

        // No activity_log table exists, the insert fails internally.
        log_activity(&connection, "other", "Withdrawal Processed", "?", None);
    }
}
