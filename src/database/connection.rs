//! SQLite connection management for the client store.

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::migrations;

/// Owns the storage connection.
///
/// The connection sits behind a mutex so the store can be shared with
/// background favorite-sync tasks.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Opens (or creates) the store at `path`, runs migrations and drops any
    /// session-scoped values left over from the previous run.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        Self::init(Connection::open(path)?)
    }

    /// Opens an in-memory store. Discarded when the `Database` is dropped.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, rusqlite::Error> {
        migrations::run_all(&conn)?;
        conn.execute("DELETE FROM session_storage", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Locks and returns the underlying connection.
    ///
    /// A poisoned lock is recovered: every statement is self-contained, so a
    /// panic mid-query cannot leave the connection half-written.
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
