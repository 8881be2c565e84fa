//! Sets up the tables of the application's SQLite database.

use rusqlite::Connection;

/// Create the tables the application needs if they do not exist yet.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_kv_store_table(connection)
}

/// Create the table that holds the flat key-value store.
fn create_kv_store_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}
