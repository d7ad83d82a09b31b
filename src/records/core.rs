//! Table definitions for the financial records the ledger reads and deletes.
//!
//! The four income tables differ in metadata but share the ledger-relevant
//! shape: a unique transaction id, a decimal TEXT amount and a date. Income
//! records are created by the collection-entry workflows elsewhere in the
//! application; inside this crate they are only ever aggregated and, through
//! the batch path, deleted. Expenses participate in batch deletion and in
//! the insight queries but never in balance computation.

use rusqlite::Connection;

/// Create the income, expense and withdrawal-adjacent record tables.
pub fn create_record_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS offering (
            id INTEGER PRIMARY KEY,
            transaction_id TEXT NOT NULL UNIQUE,
            amount_collected TEXT NOT NULL,
            date TEXT NOT NULL,
            service_type TEXT,
            notes TEXT
        )",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS project_offering (
            id INTEGER PRIMARY KEY,
            transaction_id TEXT NOT NULL UNIQUE,
            amount_collected TEXT NOT NULL,
            date TEXT NOT NULL,
            project_name TEXT,
            notes TEXT
        )",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS tithe (
            id INTEGER PRIMARY KEY,
            transaction_id TEXT NOT NULL UNIQUE,
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            member_id INTEGER,
            payment_method TEXT,
            status TEXT NOT NULL DEFAULT 'Paid'
        )",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS welfare_contribution (
            id INTEGER PRIMARY KEY,
            transaction_id TEXT NOT NULL UNIQUE,
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            member_id INTEGER,
            status TEXT NOT NULL DEFAULT 'Paid'
        )",
        (),
    )?;

    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            transaction_id TEXT NOT NULL UNIQUE,
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT,
            status TEXT NOT NULL DEFAULT 'Pending'
        )",
        (),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::create_record_tables;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_record_tables(&connection));
    }
}
