//! Storage for financial records and the batch-deletion path.

mod core;
mod delete_endpoint;

pub use core::create_record_tables;
pub use delete_endpoint::{DeleteRecordsForm, RecordRef, delete_records, delete_records_endpoint};
