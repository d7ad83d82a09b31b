//! The API endpoint URIs.

/// The route to query one account category's balance.
pub const BALANCE: &str = "/api/finance/balance";
/// The route to authorize a withdrawal.
pub const WITHDRAW: &str = "/api/finance/withdraw";
/// The route to list withdrawal records.
pub const WITHDRAWALS: &str = "/api/finance/withdrawals";
/// The route to delete a batch of financial records.
pub const DELETE_RECORDS: &str = "/api/finance/records/delete";
/// The route to generate the finance dashboard insights.
pub const INSIGHTS: &str = "/api/finance/insights";
