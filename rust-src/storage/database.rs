//! SQLite database handle and schema.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use rusqlite::Connection;


/// Shared handle to the traffic database.
///
/// The connection sits behind a mutex; every public method holds the lock
/// for exactly one statement or one transaction.
pub struct Database {
    conn: Mutex<Connection>,
}


impl Database {
    /// Open (or create) the database at `db_path` and apply the schema.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {}", db_path.display()))?;

        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(super) fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))
    }
}


#[cfg(test)]
impl Database {
    /// Drop the editors table so that every role lookup fails.
    pub(crate) fn break_editors_table(&self) {
        self.conn().unwrap().execute("DROP TABLE editors", []).unwrap();
    }
}


/// Current server timestamp as stored in the database.
pub(super) fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}


fn init_schema(conn: &Connection) -> Result<()> {
    conn.busy_timeout(std::time::Duration::from_secs(5))?;

    // One row per day; the date string is the primary key
    conn.execute(
        "CREATE TABLE IF NOT EXISTS traffic_stats (
            date TEXT PRIMARY KEY,
            visits INTEGER NOT NULL CHECK (visits >= 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS editors (
            email TEXT PRIMARY KEY,
            added_at TEXT NOT NULL,
            source TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}
