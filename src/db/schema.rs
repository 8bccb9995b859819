//! Versioned schema creation and migration.
//!
//! The version lives in `PRAGMA user_version`. A fresh file is created at
//! [`CURRENT_VERSION`] in one step; older files are brought forward by the
//! explicit migrations below. Everything runs inside an immediate transaction
//! so two processes racing on first start serialize instead of interleaving.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::info;

use crate::errors::StoreError;

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 2;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS ingredients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    list_name TEXT NOT NULL,
    item_name TEXT NOT NULL,
    quantity REAL NOT NULL,
    unit TEXT NOT NULL,
    delivered_quantity REAL NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'Not Started',
    original_quantity REAL NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(list_name, item_name)
);

CREATE TABLE IF NOT EXISTS invitees (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    list_name TEXT NOT NULL,
    name TEXT NOT NULL,
    lunch INTEGER NOT NULL,
    to_sakti INTEGER,
    travel_by TEXT,
    bus_sakti INTEGER,
    car_sakti INTEGER,
    original_lunch INTEGER NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(list_name, name)
);

CREATE TABLE IF NOT EXISTS menus (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    meal TEXT NOT NULL,
    headcount INTEGER NOT NULL,
    menu_items TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(date, meal)
);
";

/// Version 1 tracked a single travel mode per guest; version 2 splits the
/// cohort into bus and car counts.
const MIGRATE_V1_TO_V2: &str = "
ALTER TABLE invitees ADD COLUMN bus_sakti INTEGER;
ALTER TABLE invitees ADD COLUMN car_sakti INTEGER;
";

/// Create or migrate the schema so it matches [`CURRENT_VERSION`].
pub fn ensure_schema(conn: &mut Connection) -> Result<(), StoreError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let found = schema_version(&tx)?;

    if found > CURRENT_VERSION {
        return Err(StoreError::SchemaVersion {
            supported: CURRENT_VERSION,
            found,
        });
    }

    if found == 0 && !table_exists(&tx, "invitees")? {
        tx.execute_batch(SCHEMA_SQL)?;
    } else if found < CURRENT_VERSION {
        // Files written before versioning carry the version 1 layout.
        migrate(&tx, found.max(1))?;
    }

    if found != CURRENT_VERSION {
        tx.pragma_update(None, "user_version", CURRENT_VERSION)?;
    }
    tx.commit()?;
    Ok(())
}

/// Raw `user_version`; zero for files that predate versioning.
pub fn schema_version(conn: &Connection) -> Result<i32, StoreError> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool, StoreError> {
    Ok(conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [name],
        |row| row.get(0),
    )?)
}

fn migrate(tx: &Transaction<'_>, from_version: i32) -> Result<(), StoreError> {
    if from_version < 2 {
        info!(from = from_version, to = 2, "migrating schema");
        tx.execute_batch(MIGRATE_V1_TO_V2)?;
    }
    // Tables that older files never had are still created.
    tx.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
