//! Durable key-value persistence.
//!
//! The workout store writes its whole state as one document under one key.
//! Backends only move strings; they know nothing about the document shape.
//!
//! ```text
//! json:   <root>/<key>.json
//! sqlite: <root>/liftlog.sqlite   (table `kv`)
//! ```

mod file;
#[cfg(test)]
mod memory;
mod sqlite;

use std::{io, path::PathBuf};

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// A durable string-to-string map.
pub trait KeyValueStore {
    /// Reads the value under `key`, or `None` if nothing was ever written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }
}

/// Returns the default data directory: `~/.liftlog/data/`.
pub fn default_root() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".liftlog").join("data"))
}

/// Rejects keys that are empty or could escape a directory-backed store.
fn validate_key(key: &str) -> Result<()> {
    let bad = key.is_empty()
        || key.starts_with('.')
        || key.chars().any(|c| matches!(c, '/' | '\\' | '\0'));
    if bad {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
