#![allow(dead_code)]
use std::time::Duration;

use feast_ledger::Store;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

/// File-backed store in a fresh temp directory. WAL needs a real file, so
/// in-memory databases are not an option here. Keep the `TempDir` alive for
/// as long as the store is used.
pub fn temp_store() -> (TempDir, Store) {
    init_test_tracing();
    let dir = TempDir::new().expect("create temp dir");
    let store = Store::open(dir.path().join("ledger.sqlite"), Duration::from_secs(5));
    assert!(store.is_ready(), "store should initialize in a temp dir");
    (dir, store)
}
