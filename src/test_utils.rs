//! Shared helpers for setting up test databases with ledger fixtures.

use rusqlite::{Connection, params};
use time::{Date, OffsetDateTime};

use crate::{category::AccountCategory, db::initialize};

pub fn init_db() -> Connection {
    let connection = Connection::open_in_memory().unwrap();
    initialize(&connection).unwrap();
    connection
}

pub fn insert_income(
    connection: &Connection,
    category: AccountCategory,
    transaction_id: &str,
    amount: &str,
    date: Date,
) {
    connection
        .execute(
            &format!(
                "INSERT INTO {} (transaction_id, {}, date) VALUES (?1, ?2, ?3)",
                category.table(),
                category.amount_column()
            ),
            params![transaction_id, amount, date],
        )
        .unwrap();
}

pub fn insert_tithe(
    connection: &Connection,
    transaction_id: &str,
    amount: &str,
    date: Date,
    member_id: Option<i64>,
    status: &str,
) {
    connection
        .execute(
            "INSERT INTO tithe (transaction_id, amount, date, member_id, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![transaction_id, amount, date, member_id, status],
        )
        .unwrap();
}

pub fn insert_expense(
    connection: &Connection,
    transaction_id: &str,
    amount: &str,
    date: Date,
    category: &str,
    status: &str,
) {
    connection
        .execute(
            "INSERT INTO expense (transaction_id, amount, date, category, status)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![transaction_id, amount, date, category, status],
        )
        .unwrap();
}

pub fn insert_withdrawal(
    connection: &Connection,
    transaction_id: &str,
    account_type: AccountCategory,
    amount: &str,
    date: Date,
    purpose: &str,
) {
    connection
        .execute(
            "INSERT INTO withdrawal
                (transaction_id, account_type, amount, recipient, purpose, authorized_by, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                transaction_id,
                account_type.as_str(),
                amount,
                "Test Recipient",
                purpose,
                "Treasurer",
                date,
                OffsetDateTime::now_utc(),
            ],
        )
        .unwrap();
}
