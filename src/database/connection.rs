//! SQLite database connection management.
//!
//! [`Database`] wraps a `rusqlite::Connection` behind a mutex so the store can
//! be shared with the reactor task, and runs schema migrations on open.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use super::migrations;

/// Core database wrapper providing SQLite connection management.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given path and runs migrations.
    ///
    /// Parent directories are created when missing.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                // Connection::open reports the real failure if this did not work
                let _ = std::fs::create_dir_all(parent);
            }
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// The database is discarded when the `Database` is dropped.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, rusqlite::Error> {
        migrations::run_all(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Locks and returns the underlying connection.
    ///
    /// A poisoned lock is recovered: every write goes through a transaction, so
    /// a panic mid-write leaves no partial state behind.
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
