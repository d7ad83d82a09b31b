use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime};

use crate::{
    AppState, Error,
    category::AccountCategory,
    dates::month_start,
    withdrawal::{Withdrawal, WithdrawalQuery, list_withdrawals},
};

/// The state needed to list withdrawal records.
#[derive(Debug, Clone)]
pub struct WithdrawalsState {
    /// The database connection for reading withdrawal records.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for WithdrawalsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string for the withdrawals listing route.
#[derive(Debug, Default, Deserialize)]
pub struct WithdrawalsParams {
    /// Restrict the listing to one account category.
    account_type: Option<String>,
    /// A named date range: `today`, `week`, `month` (default) or `year`.
    /// Any other value lists all withdrawals.
    range: Option<String>,
}

#[derive(Debug, Serialize)]
struct WithdrawalsResponse {
    success: bool,
    data: Vec<Withdrawal>,
    count: usize,
}

/// A route handler for listing withdrawal records, newest first.
pub async fn get_withdrawals_endpoint(
    State(state): State<WithdrawalsState>,
    Query(params): Query<WithdrawalsParams>,
) -> Result<Response, Error> {
    let account_type = params
        .account_type
        .as_deref()
        .map(AccountCategory::parse)
        .transpose()?;

    let today = OffsetDateTime::now_utc().date();
    let since = match params.range.as_deref().unwrap_or("month") {
        "today" => Some(today),
        "week" => Some(today - Duration::days(7)),
        "month" => Some(month_start(today)),
        "year" => Some(Date::from_calendar_date(today.year(), Month::January, 1).unwrap()),
        _ => None,
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let withdrawals = list_withdrawals(
        WithdrawalQuery {
            account_type,
            since,
        },
        &connection,
    )?;

    let count = withdrawals.len();

    Ok(Json(WithdrawalsResponse {
        success: true,
        data: withdrawals,
        count,
    })
    .into_response())
}
