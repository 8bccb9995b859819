//! Binary entry point: read the configuration, open the store, seed it from
//! the CSV folders and hand control to the TUI.
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use feast_ledger::{load_initial_data, run_app, App, AppConfig, Store};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "feast-ledger.log";

fn main() -> anyhow::Result<()> {
    let source = AppConfig::locate();
    let config = AppConfig::load_source(&source)?;
    let db_path = config.resolve_database_path()?;
    init_tracing(&db_path)?;
    info!(%source, database = %db_path.display(), "configuration resolved");

    let store = Store::open(&db_path, config.busy_timeout());
    if store.is_ready() {
        load_initial_data(&store, &config);
    } else {
        warn!("skipping initial data load, store unavailable");
    }

    let mut app = App::new(store, &config);
    let result = run_app(&mut app);
    info!("session ended");
    result
}

/// Log to a file next to the database; the alternate screen owns stdout.
fn init_tracing(db_path: &Path) -> anyhow::Result<()> {
    let log_dir = db_path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_path = log_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
