//! Balance computation over the income and withdrawal tables.
//!
//! A balance is never stored; it is recomputed from the records on every
//! query so it can never go stale against the no-overdraft invariant.

use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::{Error, category::AccountCategory, money::sum_amount_rows};

/// The derived financial position of one account category.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountBalance {
    /// Sum of every income record in the category.
    pub income: Decimal,
    /// Sum of every withdrawal authorized against the category.
    pub withdrawals: Decimal,
    /// `income - withdrawals`. Non-negative in every committed state.
    pub balance: Decimal,
}

/// Sum every income record in `category`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or [Error::CorruptAmount]
/// if a stored amount cannot be read back as a decimal.
pub fn total_income(
    category: AccountCategory,
    connection: &Connection,
) -> Result<Decimal, Error> {
    sum_amount_rows(
        connection,
        &format!(
            "SELECT {} FROM {}",
            category.amount_column(),
            category.table()
        ),
        [],
    )
}

/// Sum every withdrawal authorized against `category`.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails or [Error::CorruptAmount]
/// if a stored amount cannot be read back as a decimal.
pub fn total_withdrawals(
    category: AccountCategory,
    connection: &Connection,
) -> Result<Decimal, Error> {
    sum_amount_rows(
        connection,
        "SELECT amount FROM withdrawal WHERE account_type = :account_type",
        &[(":account_type", category.as_str())],
    )
}

/// Compute the current balance of `category`.
pub fn account_balance(
    category: AccountCategory,
    connection: &Connection,
) -> Result<AccountBalance, Error> {
    let income = total_income(category, connection)?;
    let withdrawals = total_withdrawals(category, connection)?;

    Ok(AccountBalance {
        income,
        withdrawals,
        balance: income - withdrawals,
    })
}
