//! liftlog configuration.
//!
//! Loaded from `~/.liftlog/config.toml`. Every key is optional; a missing
//! file means defaults.

use std::path::PathBuf;
use std::{fs, io};

use serde::Deserialize;

use crate::storage;
use crate::store::DEFAULT_KEY;

/// Which key-value backend holds the state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// One JSON file per key.
    #[default]
    Json,
    /// A single SQLite database.
    Sqlite,
}

/// liftlog configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    pub backend: Backend,

    /// Where the backend keeps its files. Defaults to `~/.liftlog/data/`.
    pub data_dir: Option<PathBuf>,

    /// The key the state document is stored under.
    pub storage_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            data_dir: None,
            storage_key: DEFAULT_KEY.to_string(),
        }
    }
}

impl Config {
    /// Load config from `~/.liftlog/config.toml`, or defaults if there is none.
    pub fn load() -> Result<Self, String> {
        let Some(path) = Self::path() else {
            return Ok(Self::default());
        };

        let contents = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        Self::parse(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// Parse and validate config file contents.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(contents).map_err(|e| e.to_string())?;

        if config.storage_key.trim().is_empty() {
            return Err("storage-key is empty".to_string());
        }

        Ok(config)
    }

    /// The config file path: `~/.liftlog/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".liftlog").join("config.toml"))
    }

    /// The configured data directory, falling back to the default one.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(storage::default_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn parses_all_keys() {
        let config = Config::parse(
            r#"
            backend = "sqlite"
            data-dir = "/tmp/lifts"
            storage-key = "gym.state"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/lifts")));
        assert_eq!(config.storage_key, "gym.state");
        assert_eq!(config.data_dir(), Some(PathBuf::from("/tmp/lifts")));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(Config::parse(r#"backend = "postgres""#).is_err());
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(Config::parse(r#"colour = "blue""#).is_err());
    }

    #[test]
    fn blank_storage_key_is_rejected() {
        let err = Config::parse(r#"storage-key = "  ""#).unwrap_err();
        assert_eq!(err, "storage-key is empty");
    }
}
