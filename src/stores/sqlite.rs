//! Implements a SQLite backed key-value store.

use rusqlite::{Connection, OptionalExtension};

use crate::{Error, db::initialize, stores::KeyValueStore};

/// Stores values in the `kv_store` table of a SQLite database.
#[derive(Debug)]
pub struct SQLiteStore {
    connection: Connection,
}

impl SQLiteStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// This function will create the key-value table if it does not exist.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the table cannot be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self { connection })
    }
}

impl KeyValueStore for SQLiteStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let value = self
            .connection
            .prepare("SELECT value FROM kv_store WHERE key = :key")?
            .query_row(&[(":key", &key)], |row| row.get(0))
            .optional()?;

        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.connection.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, value),
        )?;

        tracing::debug!("Wrote {} bytes to key {key:?}", value.len());

        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.connection
            .execute("DELETE FROM kv_store WHERE key = ?1", (key,))?;

        Ok(())
    }
}
