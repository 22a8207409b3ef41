//! Storage Manager for Travelgo.
//!
//! Implements `KeyValueStore`, the string key/value interface the pages use
//! for everything they remember between (or within) visits. Backed by the
//! SQLite tables created in `database::migrations`.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};

use crate::database::connection::Database;
use crate::types::errors::StorageError;

/// Fixed storage keys shared by every page.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER_NAME: &str = "userName";
    pub const USER_EMAIL: &str = "userEmail";
    pub const IS_LOGGED_IN: &str = "isLoggedIn";
    pub const FAVORITES: &str = "favorites";
    pub const TOKEN_SALT: &str = "tokenSalt";

    pub const REDIRECT_AFTER_LOGIN: &str = "redirectAfterLogin";
    pub const SCROLL_POSITION: &str = "scrollPosition";
    pub const BOOKING_PACKAGE: &str = "bookingPackage";
}

/// Which of the two stores a key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArea {
    /// Survives restarts.
    Local,
    /// Cleared every time the store is opened.
    Session,
}

impl StorageArea {
    fn table(&self) -> &'static str {
        match self {
            StorageArea::Local => "local_storage",
            StorageArea::Session => "session_storage",
        }
    }
}

/// Trait defining key/value storage operations.
pub trait KeyValueStore {
    fn get(&self, area: StorageArea, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, area: StorageArea, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, area: StorageArea, key: &str) -> Result<(), StorageError>;
    /// Reads and deletes a value in one step.
    fn take(&self, area: StorageArea, key: &str) -> Result<Option<String>, StorageError>;
    fn clear(&self, area: StorageArea) -> Result<(), StorageError>;
}

/// Key/value store backed by the shared `Database`.
#[derive(Clone)]
pub struct StorageManager {
    db: Arc<Database>,
}

impl StorageManager {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }
}

impl KeyValueStore for StorageManager {
    fn get(&self, area: StorageArea, key: &str) -> Result<Option<String>, StorageError> {
        let sql = format!("SELECT value FROM {} WHERE key = ?1", area.table());
        let value = self
            .db
            .connection()
            .query_row(&sql, params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, area: StorageArea, key: &str, value: &str) -> Result<(), StorageError> {
        let sql = format!(
            "INSERT OR REPLACE INTO {} (key, value, updated_at) VALUES (?1, ?2, ?3)",
            area.table()
        );
        self.db
            .connection()
            .execute(&sql, params![key, value, Self::now()])?;
        Ok(())
    }

    fn remove(&self, area: StorageArea, key: &str) -> Result<(), StorageError> {
        let sql = format!("DELETE FROM {} WHERE key = ?1", area.table());
        self.db.connection().execute(&sql, params![key])?;
        Ok(())
    }

    fn take(&self, area: StorageArea, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.db.connection();
        let select = format!("SELECT value FROM {} WHERE key = ?1", area.table());
        let value: Option<String> = conn
            .query_row(&select, params![key], |row| row.get(0))
            .optional()?;
        if value.is_some() {
            let delete = format!("DELETE FROM {} WHERE key = ?1", area.table());
            conn.execute(&delete, params![key])?;
        }
        Ok(value)
    }

    fn clear(&self, area: StorageArea) -> Result<(), StorageError> {
        let sql = format!("DELETE FROM {}", area.table());
        self.db.connection().execute(&sql, [])?;
        Ok(())
    }
}
