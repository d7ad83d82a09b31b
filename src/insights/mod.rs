//! Read-only analytics over the ledger for the finance dashboard.

mod core;
mod endpoint;

pub use core::{Insight, InsightKind, generate_insights};
pub use endpoint::get_insights_endpoint;
