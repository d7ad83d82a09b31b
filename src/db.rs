/*! Database initialization for the ledger's SQLite schema. */

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, activity::create_activity_log_table, records::create_record_tables,
    withdrawal::create_withdrawal_table,
};

/// Create all tables used by the ledger.
///
/// # Errors
/// Returns an error if any table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_record_tables(&transaction)?;
    create_withdrawal_table(&transaction)?;
    create_activity_log_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                ('offering', 'project_offering', 'tithe', 'welfare_contribution',
                 'expense', 'withdrawal', 'activity_log')",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(count, 7);
    }

    #[test]
    fn is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();
        initialize(&connection).unwrap();
    }
}
