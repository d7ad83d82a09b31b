//! All-or-nothing batch deletion of financial records.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, category::RecordType};

/// The state needed to delete financial records.
#[derive(Debug, Clone)]
pub struct DeleteRecordsState {
    /// The database connection for mutating the ledger.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteRecordsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body of the batch-delete route.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteRecordsForm {
    /// The records to delete.
    pub records: Option<Vec<RecordRef>>,
}

/// One record in a batch-delete request.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordRef {
    /// The record's transaction identifier.
    #[serde(default)]
    pub id: String,
    /// The wire name of the record's type.
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Serialize)]
struct DeleteRecordsResponse {
    success: bool,
    message: &'static str,
    deleted_count: usize,
}

/// A route handler for deleting a batch of financial records.
pub async fn delete_records_endpoint(
    State(state): State<DeleteRecordsState>,
    Json(form): Json<DeleteRecordsForm>,
) -> Result<Response, Error> {
    let records = form.records.unwrap_or_default();
    if records.is_empty() {
        return Err(Error::EmptyBatch);
    }

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let deleted_count = delete_records(&records, &connection)?;

    Ok(Json(DeleteRecordsResponse {
        success: true,
        message: "Records deleted successfully",
        deleted_count,
    })
    .into_response())
}

/// Delete a heterogeneous batch of financial records, all or nothing.
///
/// Records whose type is unrecognized, or which carry a blank id or type,
/// are skipped without affecting the rest of the batch. If any remaining
/// record no longer exists, nothing is deleted and the missing transaction
/// ids are reported so the caller can refresh and retry.
///
/// # Errors
/// Returns [Error::RecordsNotFound] if a targeted record does not exist,
/// or [Error::SqlError] if a delete fails at the database level. In both
/// cases the transaction is rolled back and no partial deletion is
/// observable.
pub fn delete_records(records: &[RecordRef], connection: &Connection) -> Result<usize, Error> {
    let transaction = connection.unchecked_transaction()?;

    let mut deleted_count = 0;
    let mut missing = Vec::new();

    for record in records {
        if record.id.is_empty() {
            continue;
        }
        let Some(kind) = RecordType::parse(&record.kind) else {
            continue;
        };

        let rows_affected = transaction.execute(
            &format!("DELETE FROM {} WHERE transaction_id = ?1", kind.table()),
            params![record.id],
        )?;

        if rows_affected == 0 {
            missing.push(record.id.clone());
        } else {
            deleted_count += rows_affected;
        }
    }

    if !missing.is_empty() {
        // Dropping the transaction rolls back the deletes already issued.
        return Err(Error::RecordsNotFound(missing));
    }

    transaction.commit()?;

    Ok(deleted_count)
}
