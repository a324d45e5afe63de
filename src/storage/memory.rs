//! In-memory key-value store for tests.

use std::{collections::HashMap, io};

use super::{KeyValueStore, Result};

/// A `HashMap` behind the [`KeyValueStore`] interface.
///
/// Writes can be switched off to simulate a full or unavailable disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    reject_writes: bool,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }

    /// Makes every subsequent `put` fail with a storage-full I/O error.
    pub fn reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    /// Number of successful `put` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        if self.reject_writes {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "quota exceeded").into());
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::storage::StorageError;

    #[test]
    fn rejected_writes_leave_entries_untouched() {
        let mut store = MemoryStore::with_entry("k", "v");
        store.reject_writes(true);

        let err = store.put("k", "other").unwrap_err();
        assert!(matches!(err, StorageError::Io(ref e) if e.kind() == io::ErrorKind::StorageFull));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.writes(), 0);
    }
}
