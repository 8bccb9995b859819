use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use rusqlite::{Connection, Error as SqlError, ErrorCode};
use tracing::{debug, error, info, warn};

use super::schema::ensure_schema;
use crate::errors::StoreError;

/// Attempts made by the initializer and the bulk loader before giving up.
pub(crate) const MAX_ATTEMPTS: u32 = 3;
/// Fixed pause between lock-contention retries.
pub(crate) const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// Handle on the SQLite file. It never holds a connection itself: every
/// operation opens its own and drops it before returning, so a long
/// interactive session cannot leak connections or hold locks between
/// keystrokes.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    busy_timeout: Duration,
    ready: bool,
}

impl Store {
    /// Point at `path` and run the schema initializer. A failed initialization
    /// is logged and leaves the store in degraded mode instead of returning an
    /// error; reads then come back empty and writes report `false`.
    pub fn open(path: impl Into<PathBuf>, busy_timeout: Duration) -> Self {
        let mut store = Self {
            path: path.into(),
            busy_timeout,
            ready: false,
        };

        match store.initialize() {
            Ok(()) => {
                store.ready = true;
                info!(path = %store.path.display(), "store ready");
            }
            Err(err) => {
                error!(path = %store.path.display(), error = %err, "database initialization error, store unusable");
            }
        }

        store
    }

    /// Ensure the parent directory and the three tables exist. Safe to call
    /// repeatedly and from several processes at once.
    pub fn initialize(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        self.with_retry("initialize schema", |conn| ensure_schema(conn))
    }

    /// `false` after a failed initialization; the store then only degrades.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a fresh connection configured for concurrent readers and a single
    /// writer.
    pub(crate) fn connect(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        Ok(conn)
    }

    /// Run `op` on a fresh connection, retrying on lock contention with a
    /// fixed backoff. Any other failure is returned straight away.
    pub(crate) fn with_retry<T>(
        &self,
        operation: &str,
        mut op: impl FnMut(&mut Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = self
                .connect()
                .map_err(StoreError::from)
                .and_then(|mut conn| op(&mut conn));

            match result {
                Ok(value) => return Ok(value),
                Err(err) if is_lock_error(&err) => {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(StoreError::LockContention { attempts: attempt });
                    }
                    warn!(operation, attempt, "database locked, retrying");
                    thread::sleep(RETRY_BACKOFF);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Run a single-shot operation without retries. Failures are logged and
    /// collapse to `None` so callers can fall back to an empty result.
    pub(crate) fn run<T>(
        &self,
        operation: &str,
        op: impl FnOnce(&Connection) -> anyhow::Result<T>,
    ) -> Option<T> {
        let result = self
            .connect()
            .context("failed to open database connection")
            .and_then(|conn| op(&conn));

        match result {
            Ok(value) => {
                debug!(operation, "store operation finished");
                Some(value)
            }
            Err(err) => {
                let message = format!("{err:#}");
                warn!(operation, error = %message, "store operation failed");
                None
            }
        }
    }
}

fn is_lock_error(err: &StoreError) -> bool {
    match err {
        StoreError::Sqlite(sql) => matches!(
            sql.sqlite_error_code(),
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked)
        ),
        _ => false,
    }
}

/// Unique-key collisions are an expected outcome for inserts, not a failure.
pub(crate) fn is_constraint_violation(err: &SqlError) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    )
}
