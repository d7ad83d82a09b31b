use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    insights::{Insight, generate_insights},
};

/// The state needed to generate dashboard insights.
#[derive(Debug, Clone)]
pub struct InsightsState {
    /// The database connection for reading ledger records.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for InsightsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct InsightsResponse {
    success: bool,
    data: Vec<Insight>,
    count: usize,
}

/// A route handler for generating the finance dashboard insights.
pub async fn get_insights_endpoint(
    State(state): State<InsightsState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let insights = generate_insights(OffsetDateTime::now_utc().date(), &connection);
    let count = insights.len();

    Ok(Json(InsightsResponse {
        success: true,
        data: insights,
        count,
    })
    .into_response())
}
