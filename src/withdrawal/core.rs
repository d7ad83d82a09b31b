//! Defines the withdrawal record model, request validation and the
//! balance-checked authorization path.

use rand::Rng;
use rusqlite::{
    Connection, Row, Transaction as SqlTransaction, TransactionBehavior, params,
    types::Value,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{
    Error,
    activity::log_activity,
    balance::{total_income, total_withdrawals},
    category::AccountCategory,
    database_id::DatabaseId,
    money,
};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// An authorized outflow of money from one account category.
///
/// Created only by [authorize_withdrawal]; never updated, only deleted
/// through the batch-deletion path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Withdrawal {
    /// The database row ID.
    pub id: DatabaseId,
    /// The externally visible transaction identifier, e.g. `WD-1754556000000-421`.
    pub transaction_id: String,
    /// The account category the money was taken from.
    pub account_type: AccountCategory,
    /// The amount withdrawn. Always positive.
    pub amount: Decimal,
    /// Who received the money.
    pub recipient: String,
    /// What the money was for.
    pub purpose: String,
    /// The party that authorized the withdrawal.
    pub authorized_by: String,
    /// The effective date of the withdrawal.
    pub date: Date,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the record was created.
    pub created_at: OffsetDateTime,
}

/// A validated withdrawal request, ready for authorization.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawalRequest {
    /// The account category to withdraw from.
    pub account_type: AccountCategory,
    /// The amount to withdraw. Always positive.
    pub amount: Decimal,
    /// Who receives the money.
    pub recipient: String,
    /// What the money is for.
    pub purpose: String,
    /// The party authorizing the withdrawal.
    pub authorized_by: String,
    /// The effective date of the withdrawal.
    pub date: Date,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// The outcome of a successful authorization.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawalReceipt {
    /// The generated transaction identifier.
    pub transaction_id: String,
    /// The category balance after the withdrawal.
    pub new_balance: Decimal,
    /// The created withdrawal record.
    pub record: Withdrawal,
}

/// The raw request body of the withdrawal route, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct WithdrawForm {
    /// The wire name of the account category.
    pub account_type: Option<String>,
    /// The amount to withdraw, as a decimal string or JSON number.
    pub amount: Option<AmountField>,
    /// Who receives the money.
    pub recipient: Option<String>,
    /// What the money is for.
    pub purpose: Option<String>,
    /// The party authorizing the withdrawal.
    pub authorized_by: Option<String>,
    /// The effective date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// An amount that clients may submit either as a string or a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    /// The amount as a string, e.g. `"250.50"`.
    Text(String),
    /// The amount as a JSON number.
    Number(serde_json::Number),
}

impl AmountField {
    fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
        }
    }
}

impl WithdrawForm {
    /// Validate the form into a [WithdrawalRequest].
    ///
    /// # Errors
    /// Returns [Error::MissingRequiredFields] if any required field is
    /// absent or blank, [Error::InvalidAccountType] for an unknown
    /// category, [Error::InvalidAmount] if the amount is not a positive
    /// decimal, and [Error::InvalidDate] if the date does not parse.
    pub fn validate(self) -> Result<WithdrawalRequest, Error> {
        let (
            Some(account_type),
            Some(amount),
            Some(recipient),
            Some(purpose),
            Some(authorized_by),
            Some(date),
        ) = (
            self.account_type,
            self.amount,
            self.recipient,
            self.purpose,
            self.authorized_by,
            self.date,
        )
        else {
            return Err(Error::MissingRequiredFields);
        };

        if [&account_type, &recipient, &purpose, &authorized_by, &date]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(Error::MissingRequiredFields);
        }

        let account_type = AccountCategory::parse(&account_type)?;

        let amount_text = amount.as_text();
        let amount: Decimal = amount_text
            .trim()
            .parse()
            .map_err(|_| Error::InvalidAmount(amount_text.clone()))?;
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount(amount_text));
        }

        let date = Date::parse(&date, DATE_FORMAT).map_err(|_| Error::InvalidDate(date))?;

        Ok(WithdrawalRequest {
            account_type,
            amount,
            recipient,
            purpose,
            authorized_by,
            date,
            notes: self.notes,
        })
    }
}

pub fn create_withdrawal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS withdrawal (
            id INTEGER PRIMARY KEY,
            transaction_id TEXT NOT NULL UNIQUE,
            account_type TEXT NOT NULL,
            amount TEXT NOT NULL,
            recipient TEXT NOT NULL,
            purpose TEXT NOT NULL,
            authorized_by TEXT NOT NULL,
            date TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_withdrawal_row(row: &Row) -> Result<Withdrawal, rusqlite::Error> {
    let amount_text: String = row.get(3)?;
    let amount = amount_text.parse().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })?;

    let account_text: String = row.get(2)?;
    let account_type = AccountCategory::parse(&account_text).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown account type \"{account_text}\"").into(),
        )
    })?;

    Ok(Withdrawal {
        id: row.get(0)?,
        transaction_id: row.get(1)?,
        account_type,
        amount,
        recipient: row.get(4)?,
        purpose: row.get(5)?,
        authorized_by: row.get(6)?,
        date: row.get(7)?,
        notes: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Authorize and record a withdrawal against one account category.
///
/// The balance read and the insert run inside a single `IMMEDIATE`
/// transaction: the write lock is taken before the balance is computed, so
/// no other writer can interleave between read, decision and insert. Two
/// concurrent authorizations can therefore never both observe the same
/// stale balance.
///
/// On successful commit, an activity-log entry is written best effort; its
/// failure never rolls back the withdrawal or reaches the caller.
///
/// # Errors
/// Returns [Error::InsufficientFunds] (carrying the available amount) if
/// the category cannot cover the request, [Error::Conflict] if the
/// database reports a busy/locked conflict, or [Error::SqlError] for any
/// other database failure. No record is created in any error case.
pub fn authorize_withdrawal(
    request: WithdrawalRequest,
    connection: &Connection,
) -> Result<WithdrawalReceipt, Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let income = total_income(request.account_type, &transaction)?;
    let withdrawals = total_withdrawals(request.account_type, &transaction)?;
    let available = income - withdrawals;

    if available < request.amount {
        return Err(Error::InsufficientFunds { available });
    }

    let transaction_id = generate_transaction_id();
    let created_at = OffsetDateTime::now_utc();

    transaction.execute(
        "INSERT INTO withdrawal
            (transaction_id, account_type, amount, recipient, purpose, authorized_by, date, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            &transaction_id,
            request.account_type.as_str(),
            request.amount.to_string(),
            &request.recipient,
            &request.purpose,
            &request.authorized_by,
            request.date,
            &request.notes,
            created_at,
        ],
    )?;
    let id = transaction.last_insert_rowid();

    transaction.commit()?;

    log_activity(
        connection,
        "other",
        "Withdrawal Processed",
        &format!(
            "Withdrew {} from {} for {}",
            money::currency(request.amount),
            request.account_type,
            request.purpose
        ),
        Some(&transaction_id),
    );

    let record = Withdrawal {
        id,
        transaction_id: transaction_id.clone(),
        account_type: request.account_type,
        amount: request.amount,
        recipient: request.recipient,
        purpose: request.purpose,
        authorized_by: request.authorized_by,
        date: request.date,
        notes: request.notes,
        created_at,
    };

    Ok(WithdrawalReceipt {
        transaction_id,
        new_balance: available - record.amount,
        record,
    })
}

/// Generate a withdrawal transaction identifier: the current time in
/// milliseconds plus a random disambiguator. The `UNIQUE` constraint on
/// the column backstops the astronomically unlikely collision.
fn generate_transaction_id() -> String {
    let timestamp = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    let disambiguator = rand::thread_rng().gen_range(0..1000);

    format!("WD-{timestamp}-{disambiguator}")
}

/// Defines how withdrawals should be fetched by [list_withdrawals].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WithdrawalQuery {
    /// Include only withdrawals from this account category.
    pub account_type: Option<AccountCategory>,
    /// Include only withdrawals dated on or after this date.
    pub since: Option<Date>,
}

const LIST_LIMIT: u32 = 100;

/// Retrieve withdrawal records, newest first.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn list_withdrawals(
    query: WithdrawalQuery,
    connection: &Connection,
) -> Result<Vec<Withdrawal>, Error> {
    let mut sql = "SELECT id, transaction_id, account_type, amount, recipient, purpose, \
                   authorized_by, date, notes, created_at FROM withdrawal"
        .to_string();
    let mut clauses = Vec::new();
    let mut parameters = Vec::new();

    if let Some(account_type) = query.account_type {
        clauses.push(format!("account_type = ?{}", parameters.len() + 1));
        parameters.push(Value::Text(account_type.as_str().to_owned()));
    }

    if let Some(since) = query.since {
        clauses.push(format!("date >= ?{}", parameters.len() + 1));
        parameters.push(Value::Text(
            since.format(DATE_FORMAT).expect("date formats as ISO 8601"),
        ));
    }

    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    sql.push_str(&format!(
        " ORDER BY date DESC, created_at DESC LIMIT {LIST_LIMIT}"
    ));

    connection
        .prepare(&sql)?
        .query_map(rusqlite::params_from_iter(parameters), |row| {
            map_withdrawal_row(row)
        })?
        .map(|maybe_withdrawal| maybe_withdrawal.map_err(Error::from))
        .collect()
}
