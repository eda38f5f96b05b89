//! SQLite-backed document store.
//!
//! Every document is one row keyed by its path, holding the JSON text and
//! the time of the last write.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection};
use serde_json::Value;

use super::subscription::Subscribers;
use super::{apply_set, apply_update, data_dir, DocumentStore, Subscription};
use crate::error::StoreError;

pub struct SqliteStore {
    conn: Mutex<Connection>,
    subscribers: Subscribers,
}

impl SqliteStore {
    /// Open the store at `<data_dir>/procrastinus.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, crate::error::CoreError> {
        let path = data_dir()?.join("procrastinus.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) a store at `path`.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(conn),
            subscribers: Subscribers::default(),
        };
        store.migrate()?;
        Ok(store)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn().execute_batch(
            "CREATE TABLE IF NOT EXISTS documents (
                path       TEXT PRIMARY KEY,
                data       TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_documents_updated_at ON documents(updated_at);",
        )?;
        Ok(())
    }

    fn write(&self, path: &str, next: Value) -> Result<(), StoreError> {
        let text = serde_json::to_string(&next).map_err(|e| StoreError::Malformed {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        self.conn().execute(
            "INSERT OR REPLACE INTO documents (path, data, updated_at) VALUES (?1, ?2, ?3)",
            params![path, text, Utc::now().to_rfc3339()],
        )?;
        self.subscribers.notify(path, &next);
        Ok(())
    }
}

impl DocumentStore for SqliteStore {
    fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        let text = {
            let conn = self.conn();
            let mut stmt = conn.prepare("SELECT data FROM documents WHERE path = ?1")?;
            match stmt.query_row(params![path], |row| row.get::<_, String>(0)) {
                Ok(v) => v,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| StoreError::Malformed {
                path: path.to_string(),
                message: e.to_string(),
            })
    }

    fn set(&self, path: &str, data: Value, merge: bool) -> Result<(), StoreError> {
        let next = apply_set(self.get(path)?, data, merge);
        self.write(path, next)
    }

    fn update(&self, path: &str, partial: Value) -> Result<(), StoreError> {
        let next = apply_update(path, self.get(path)?, partial)?;
        self.write(path, next)
    }

    fn subscribe(&self, path: &str) -> Subscription {
        let current = self.get(path).ok().flatten();
        self.subscribers.add(path, current)
    }
}
