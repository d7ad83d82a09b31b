//! The withdrawal-authorization path and withdrawal record queries.

mod authorize_endpoint;
mod core;
mod list_endpoint;

pub use authorize_endpoint::authorize_withdrawal_endpoint;
pub use core::{
    WithdrawForm, Withdrawal, WithdrawalQuery, WithdrawalReceipt, WithdrawalRequest,
    authorize_withdrawal, create_withdrawal_table, list_withdrawals,
};
pub use list_endpoint::get_withdrawals_endpoint;
