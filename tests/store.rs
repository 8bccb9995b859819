mod common;

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use feast_ledger::db::schema::{schema_version, CURRENT_VERSION};
use feast_ledger::db::{add_ingredient, fetch_ingredients, fetch_invitees, update_cohort_split};
use feast_ledger::Store;
use rusqlite::Connection;
use tempfile::TempDir;

#[test]
fn fresh_store_is_created_at_current_version() {
    let (_dir, store) = common::temp_store();
    let conn = Connection::open(store.path()).expect("open");
    assert_eq!(schema_version(&conn).expect("version"), CURRENT_VERSION);
}

#[test]
fn initialize_is_idempotent() {
    let (_dir, store) = common::temp_store();
    assert!(add_ingredient(&store, "Local-List", "Rice", 50.0, "kg"));

    store.initialize().expect("second initialize");
    let reopened = Store::open(store.path(), Duration::from_secs(5));
    assert!(reopened.is_ready());
    assert_eq!(fetch_ingredients(&reopened, "Local-List").len(), 1);
}

#[test]
fn version_one_file_gains_cohort_split_columns() {
    common::init_test_tracing();
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("old.sqlite");
    {
        let conn = Connection::open(&path).expect("open");
        conn.execute_batch(
            "CREATE TABLE invitees (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                list_name TEXT NOT NULL,
                name TEXT NOT NULL,
                lunch INTEGER NOT NULL,
                to_sakti INTEGER,
                travel_by TEXT,
                original_lunch INTEGER NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(list_name, name)
            );
            INSERT INTO invitees (list_name, name, lunch, to_sakti, travel_by, original_lunch)
            VALUES ('Barati', 'Asha', 6, 4, 'Bus', 6);",
        )
        .expect("seed v1 layout");
    }

    let store = Store::open(&path, Duration::from_secs(5));
    assert!(store.is_ready());

    let guests = fetch_invitees(&store, "Barati");
    assert_eq!(guests.len(), 1);
    assert_eq!(guests[0].to_sakti, Some(4));
    assert_eq!(guests[0].travel_by.as_deref(), Some("Bus"));
    assert_eq!(guests[0].bus_sakti, None);

    assert!(update_cohort_split(&store, "Barati", "Asha", Some(4), Some(3), Some(1)));
    let guests = fetch_invitees(&store, "Barati");
    assert_eq!(guests[0].unsure_sakti(), Some(0));

    let conn = Connection::open(&path).expect("open");
    assert_eq!(schema_version(&conn).expect("version"), CURRENT_VERSION);
}

#[test]
fn newer_schema_leaves_store_degraded() {
    common::init_test_tracing();
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("future.sqlite");
    {
        let conn = Connection::open(&path).expect("open");
        conn.pragma_update(None, "user_version", CURRENT_VERSION + 1)
            .expect("bump version");
    }

    let store = Store::open(&path, Duration::from_secs(5));
    assert!(!store.is_ready());
}

#[test]
fn unusable_path_degrades_without_panicking() {
    common::init_test_tracing();
    let dir = TempDir::new().expect("temp dir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "file").expect("write blocker");

    let store = Store::open(blocker.join("ledger.sqlite"), Duration::from_secs(1));
    assert!(!store.is_ready());
    assert!(fetch_ingredients(&store, "Local-List").is_empty());
    assert!(!add_ingredient(&store, "Local-List", "Rice", 50.0, "kg"));
}

#[test]
fn concurrent_first_open_initializes_once() {
    common::init_test_tracing();
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("shared.sqlite");
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                Store::open(path, Duration::from_secs(5)).is_ready()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().expect("thread panicked"));
    }

    let conn = Connection::open(&path).expect("open");
    assert_eq!(schema_version(&conn).expect("version"), CURRENT_VERSION);
}
