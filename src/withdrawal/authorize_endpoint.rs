use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    AppState, Error,
    withdrawal::{WithdrawForm, Withdrawal, authorize_withdrawal},
};

/// The state needed to authorize a withdrawal.
#[derive(Debug, Clone)]
pub struct WithdrawState {
    /// The database connection for reading and mutating the ledger.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for WithdrawState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct WithdrawResponse {
    success: bool,
    message: &'static str,
    transaction_id: String,
    new_balance: Decimal,
    data: Withdrawal,
}

/// A route handler for authorizing a withdrawal against one account category.
pub async fn authorize_withdrawal_endpoint(
    State(state): State<WithdrawState>,
    Json(form): Json<WithdrawForm>,
) -> Result<Response, Error> {
    let request = form.validate()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let receipt = authorize_withdrawal(request, &connection)?;

    Ok(Json(WithdrawResponse {
        success: true,
        message: "Withdrawal processed successfully",
        transaction_id: receipt.transaction_id,
        new_balance: receipt.new_balance,
        data: receipt.record,
    })
    .into_response())
}
