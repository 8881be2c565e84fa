//! Deposit transactions.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and amount validation
//! - The combined, filterable transaction log across goals

mod core;
mod list;

pub use core::{
    Amount, AmountTotal, DEFAULT_NOTE, MANUAL_ADDITION_NOTE, Transaction, TransactionId,
    format_display_date, parse_amount, validate_amount,
};
pub use list::{GoalFilter, TransactionEntry, list_transactions};
