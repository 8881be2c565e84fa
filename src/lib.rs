//! Savings goals is a personal savings tracker.
//!
//! Users create goals with a target amount and record deposits towards them,
//! either directly or through a simulated mobile money (USSD) payment. The
//! [Ledger] owns the goals, keeps the saved amounts consistent with the
//! deposits and saves everything to a flat key-value store after each change.
//!
//! The `savings` binary is a command line front end for the library.

#![warn(missing_docs)]

mod alert;
pub mod config;
pub mod dashboard;
mod db;
mod error;
pub mod format;
pub mod goal;
mod ledger;
pub mod logging;
pub mod snapshot;
pub mod stores;
pub mod timer;
mod timezone;
pub mod transaction;
pub mod ussd;
pub mod view;
pub mod widget;

pub use alert::Alert;
pub use config::Config;
pub use db::initialize as initialize_db;
pub use error::{Error, ErrorKind};
pub use ledger::Ledger;
pub use timezone::get_local_offset;
