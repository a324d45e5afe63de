//! SQLite-backed key-value store: a single `kv` table.

use std::{fs, path::PathBuf};

use jiff::Timestamp;
use rusqlite::{Connection, OptionalExtension};

use super::{KeyValueStore, Result, validate_key};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS kv (
        key        TEXT PRIMARY KEY NOT NULL,
        value      TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
";

/// File name of the database inside the data directory.
pub const DB_FILE: &str = "liftlog.sqlite";

/// Stores every key as a row of `<root>/liftlog.sqlite`.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database in the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let conn = Connection::open(root.join(DB_FILE))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![key, value, Timestamp::now().to_string()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn test_store() -> (TempDir, SqliteStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::new(dir.path().join("data")).unwrap();
        (dir, store)
    }

    #[test]
    fn get_missing_key_is_none() {
        let (_dir, store) = test_store();
        assert_eq!(store.get("liftlog.state").unwrap(), None);
    }

    #[test]
    fn invalid_key_is_rejected() {
        let (_dir, mut store) = test_store();
        let err = store.put("", "v").unwrap_err();

        assert!(matches!(err, crate::storage::StorageError::InvalidKey(_)));
    }

    #[test]
    fn put_upserts() {
        let (_dir, mut store) = test_store();

        store.put("k", "first").unwrap();
        store.put("k", "second").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
        let rows: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn values_survive_reopen() {
        let (dir, mut store) = test_store();
        store.put("liftlog.state", "{}").unwrap();
        drop(store);

        let reopened = SqliteStore::new(dir.path().join("data")).unwrap();
        assert_eq!(reopened.get("liftlog.state").unwrap().as_deref(), Some("{}"));
    }
}
