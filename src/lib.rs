//! Offertory is a web service for managing a congregation's financial
//! ledger: per-category income totals, balance-checked withdrawal
//! authorization, all-or-nothing batch deletion of financial records, and
//! dashboard insights derived from the ledger history.
//!
//! This library provides a JSON REST API over a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::signal;

mod activity;
mod app_state;
mod balance;
mod category;
mod database_id;
mod dates;
mod db;
mod endpoints;
mod insights;
mod money;
mod records;
mod routing;
#[cfg(test)]
mod test_utils;
mod withdrawal;

pub use app_state::AppState;
pub use category::{AccountCategory, RecordType};
pub use db::initialize as initialize_db;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the ledger service.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A balance query was made without naming an account category.
    #[error("Account type required")]
    MissingAccountType,

    /// The named account category is not one of the four valid categories.
    #[error("Invalid account type: {0}")]
    InvalidAccountType(String),

    /// A withdrawal request left out one or more required fields, or sent
    /// them blank.
    #[error("Missing required fields")]
    MissingRequiredFields,

    /// The submitted amount is not a positive decimal number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The submitted date could not be parsed.
    #[error("Invalid date \"{0}\", expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A batch deletion was requested with an empty or missing record list.
    #[error("No records provided")]
    EmptyBatch,

    /// The account category cannot cover the requested withdrawal.
    ///
    /// Carries the available balance for user display. No record was
    /// created and no audit entry was written.
    #[error("Insufficient funds. Available: ₵{available:.2}")]
    InsufficientFunds {
        /// The balance available at decision time.
        available: Decimal,
    },

    /// A batch deletion referenced records that no longer exist.
    ///
    /// The whole batch was rolled back; the caller should refresh their
    /// view of the records and retry.
    #[error("One or more records could not be found: {}", .0.join(", "))]
    RecordsNotFound(Vec<String>),

    /// The database reported a conflicting concurrent transaction.
    ///
    /// The caller should retry the whole operation.
    #[error("The database is busy, try again")]
    Conflict,

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A stored amount could not be read back as a decimal.
    #[error("could not parse stored amount \"{0}\" as a decimal")]
    CorruptAmount(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, _)
                if sql_error.code == rusqlite::ErrorCode::DatabaseBusy
                    || sql_error.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                Error::Conflict
            }
            error => Error::SqlError(error),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, message) = match &self {
            Error::MissingAccountType
            | Error::InvalidAccountType(_)
            | Error::MissingRequiredFields
            | Error::InvalidAmount(_)
            | Error::InvalidDate(_)
            | Error::EmptyBatch
            | Error::InsufficientFunds { .. } => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::RecordsNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Error::Conflict => (StatusCode::CONFLICT, self.to_string()),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_owned(),
                )
            }
        };

        (
            status_code,
            Json(json!({ "success": false, "message": message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use rust_decimal::Decimal;

    use super::Error;

    #[test]
    fn insufficient_funds_message_shows_two_decimals() {
        let error = Error::InsufficientFunds {
            available: Decimal::from(40),
        };

        assert_eq!(error.to_string(), "Insufficient funds. Available: ₵40.00");
    }

    #[test]
    fn records_not_found_names_the_missing_ids() {
        let error = Error::RecordsNotFound(vec!["TTH-1".to_owned(), "OFF-2".to_owned()]);

        assert_eq!(
            error.to_string(),
            "One or more records could not be found: TTH-1, OFF-2"
        );
    }

    #[test]
    fn busy_database_maps_to_conflict() {
        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );

        assert_eq!(Error::from(busy), Error::Conflict);
    }
}
