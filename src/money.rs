//! Fixed-point money handling: decimal TEXT storage and display formatting.
//!
//! Monetary amounts are stored as canonical decimal strings and summed as
//! [Decimal]s in Rust. Running them through SQL `SUM` would coerce the TEXT
//! column to floating point and accumulate rounding drift.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};
use rusqlite::{Connection, Params};
use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::Error;

/// Parse an amount read back from a TEXT column.
///
/// # Errors
/// Returns [Error::CorruptAmount] if the stored text is not a decimal. The
/// ledger only ever writes canonical decimal strings, so this indicates a
/// damaged row rather than caller input.
pub(crate) fn parse_stored_amount(text: &str) -> Result<Decimal, Error> {
    text.parse()
        .map_err(|_| Error::CorruptAmount(text.to_owned()))
}

/// Sum the single TEXT amount column selected by `sql`.
///
/// An empty result set sums to zero.
pub(crate) fn sum_amount_rows<P: Params>(
    connection: &Connection,
    sql: &str,
    params: P,
) -> Result<Decimal, Error> {
    let mut statement = connection.prepare(sql)?;
    let rows = statement.query_map(params, |row| row.get::<_, String>(0))?;

    let mut total = Decimal::ZERO;
    for amount in rows {
        total += parse_stored_amount(&amount?)?;
    }

    Ok(total)
}

/// Format an amount for human-readable text, e.g. `₵1,234.50`.
pub(crate) fn currency(amount: Decimal) -> String {
    static FMT: OnceLock<Formatter> = OnceLock::new();

    let fmt = FMT.get_or_init(|| {
        Formatter::currency("₵")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    if amount.is_zero() {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        return "₵0.00".to_owned();
    }

    let mut formatted_string = fmt.fmt_string(amount.to_f64().unwrap_or(0.0));

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}


#[cfg(test)]
mod sum_amount_rows_tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;

    use super::sum_amount_rows;

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute("CREATE TABLE entry (amount TEXT NOT NULL)", ())
            .unwrap();
        connection
    }

    #[test]
    fn sums_exactly_without_float_drift() {
        let connection = get_test_connection();
        for amount in ["0.10", "0.20", "0.30"] {
            connection
                .execute("INSERT INTO entry (amount) VALUES (?1)", [amount])
                .unwrap();
        }

        let total = sum_amount_rows(&connection, "SELECT amount FROM entry", []).unwrap();

        assert_eq!(total, "0.60".parse().unwrap());
    }

    #[test]
    fn empty_result_sums_to_zero() {
        let connection = get_test_connection();

        let total = sum_amount_rows(&connection, "SELECT amount FROM entry", []).unwrap();

        assert_eq!(total, Decimal::ZERO);
    }
}
