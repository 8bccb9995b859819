//! Typed failures for the store bootstrap and configuration layers. Query
//! helpers keep using `anyhow` with context strings; these enums exist for the
//! spots where callers need to branch on the kind of failure.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database stayed locked after {attempts} attempts")]
    LockContention { attempts: u32 },

    #[error("schema version {found} is newer than the supported version {supported}")]
    SchemaVersion { supported: i32, found: i32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("could not locate home directory")]
    NoHomeDir,
}
