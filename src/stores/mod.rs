//! Contains the flat key-value store trait and its implementations.
//!
//! The ledger keeps all of its state in a single serialized value under one
//! key, so a store only needs to get, set and remove strings.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SQLiteStore;

use crate::Error;

/// The key the ledger is saved under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "savings_goals_data";

/// A string-keyed store of string values.
pub trait KeyValueStore {
    /// Retrieve the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Implementers must either store the whole value or leave the previous
    /// value untouched.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;

    /// Remove the value stored under `key`. Removing a missing key is not an
    /// error.
    fn remove(&mut self, key: &str) -> Result<(), Error>;
}
