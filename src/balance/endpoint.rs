use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, balance::account_balance, category::AccountCategory};

/// The state needed to query an account balance.
#[derive(Debug, Clone)]
pub struct BalanceState {
    /// The database connection for reading ledger records.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for BalanceState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string for the balance route.
#[derive(Debug, Deserialize)]
pub struct BalanceParams {
    /// The wire name of the account category.
    account: Option<String>,
}

#[derive(Debug, Serialize)]
struct BalanceResponse {
    success: bool,
    balance: Decimal,
    income: Decimal,
    withdrawals: Decimal,
}

/// A route handler for querying the balance of one account category.
pub async fn get_balance_endpoint(
    State(state): State<BalanceState>,
    Query(params): Query<BalanceParams>,
) -> Result<Response, Error> {
    let account = params.account.ok_or(Error::MissingAccountType)?;
    let category = AccountCategory::parse(&account)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let balance = account_balance(category, &connection)?;

    Ok(Json(BalanceResponse {
        success: true,
        balance: balance.balance,
        income: balance.income,
        withdrawals: balance.withdrawals,
    })
    .into_response())
}
