mod common;

use std::fs;
use std::io::Cursor;
use std::time::{Duration, Instant};

use feast_ledger::config::{AppConfig, ListConfig};
use feast_ledger::db::{
    fetch_ingredients, fetch_invitees, fetch_menu_dates, total_headcount, update_invitee,
};
use feast_ledger::loader::{load_ingredient_list, load_initial_data, load_invitee_list, Table};
use rusqlite::Connection;

#[test]
fn row_missing_quantity_is_skipped() {
    let (_dir, store) = common::temp_store();
    let table = Table::from_rows(
        &["Item Name", "Quantity", "Unit"],
        vec![vec!["Rice", "50", "kg"], vec!["Salt", "", "kg"]],
    );

    assert!(load_ingredient_list(&store, "Local-List", &table));
    let items = fetch_ingredients(&store, "Local-List");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item_name, "Rice");
}

#[test]
fn out_of_range_lunch_is_skipped() {
    let (_dir, store) = common::temp_store();
    let table = Table::from_rows(
        &["Name", "Lunch"],
        vec![vec!["Asha", "1e30"], vec!["Binod", "1e30"], vec!["Chitra", "3"]],
    );

    assert!(load_invitee_list(&store, "Guests", &table));
    let guests = fetch_invitees(&store, "Guests");
    let names: Vec<_> = guests.iter().map(|guest| guest.name.as_str()).collect();
    assert_eq!(names, ["Chitra"]);
    assert_eq!(total_headcount(&store, "Guests"), 3);
}

#[test]
fn load_replaces_only_the_target_list() {
    let (_dir, store) = common::temp_store();
    let first = Table::from_rows(
        &["Item Name", "Quantity", "Unit"],
        vec![vec!["Rice", "50", "kg"], vec!["Salt", "5", "kg"]],
    );
    let second = Table::from_rows(&["Item Name", "Quantity", "Unit"], vec![vec!["Sugar", "10", "kg"]]);
    assert!(load_ingredient_list(&store, "Local-List", &first));
    assert!(load_ingredient_list(&store, "Home-Raasan", &first));
    assert!(load_ingredient_list(&store, "Local-List", &second));

    let local: Vec<_> = fetch_ingredients(&store, "Local-List")
        .into_iter()
        .map(|item| item.item_name)
        .collect();
    assert_eq!(local, ["Sugar"]);
    assert_eq!(fetch_ingredients(&store, "Home-Raasan").len(), 2);
}

#[test]
fn reload_resets_baselines_to_loaded_values() {
    let (_dir, store) = common::temp_store();
    let table = Table::from_rows(&["Name", "Lunch"], vec![vec!["Asha", "4"]]);
    assert!(load_invitee_list(&store, "Guests", &table));
    update_invitee(&store, "Guests", "Asha", 9, None, None);

    assert!(load_invitee_list(&store, "Guests", &table));
    let asha = &fetch_invitees(&store, "Guests")[0];
    assert_eq!(asha.lunch, 4);
    assert_eq!(asha.original_lunch, 4);
}

#[test]
fn invitee_csv_skips_index_and_total_rows() {
    let (_dir, store) = common::temp_store();
    let csv = " Name ,Lunch,To SAKTI,Travel By\n\
               Index of guests,,,\n\
               Asha,4,2, Bus \n\
               Binod,3.0,,\n\
               Chitra,two,,\n\
               Grand Total,7,,\n\
               Asha,5,,\n";
    let table = Table::from_reader(Cursor::new(csv)).expect("parse csv");
    assert_eq!(table.headers()[0], "Name");

    assert!(load_invitee_list(&store, "Barati", &table));
    let guests = fetch_invitees(&store, "Barati");
    let names: Vec<_> = guests.iter().map(|guest| guest.name.as_str()).collect();
    assert_eq!(names, ["Asha", "Binod"]);
    // the later duplicate row is skipped, the first one wins
    assert_eq!(guests[0].lunch, 4);
    assert_eq!(guests[0].to_sakti, Some(2));
    assert_eq!(guests[0].travel_by.as_deref(), Some("Bus"));
    assert_eq!(guests[1].lunch, 3);
    assert_eq!(guests[1].to_sakti, None);
}

#[test]
fn seed_reads_configured_files_and_skips_missing_ones() {
    let (dir, store) = common::temp_store();
    let data_dir = dir.path().join("data");
    fs::create_dir_all(data_dir.join("ingredients")).expect("mkdir");
    fs::create_dir_all(data_dir.join("menus")).expect("mkdir");
    fs::write(
        data_dir.join("ingredients").join("Local-List.csv"),
        "Item Name,Quantity,Unit\nRice,50,kg\nSalt,5,kg\n",
    )
    .expect("write ingredients");
    fs::write(
        data_dir.join("menus").join("Menus-List.csv"),
        "Date,Meal,Headcount,Menu Items\n05/12/25,Lunch,120,\"Luchi, Aloo Dum\"\n",
    )
    .expect("write menus");

    let config = AppConfig {
        data_dir,
        ingredient_lists: vec![ListConfig {
            key: "Local-List".to_string(),
            label: "Local List".to_string(),
            cohort: false,
        }],
        invitee_lists: vec![ListConfig {
            key: "Guests".to_string(),
            label: "Guests".to_string(),
            cohort: false,
        }],
        ..AppConfig::default()
    };

    let report = load_initial_data(&store, &config);
    assert_eq!(report.loaded, 2);
    assert_eq!(report.missing, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(fetch_ingredients(&store, "Local-List").len(), 2);
    assert_eq!(fetch_menu_dates(&store), ["05/12/25"]);
    assert!(fetch_invitees(&store, "Guests").is_empty());
}

#[test]
fn load_fails_while_another_writer_holds_the_lock_then_recovers() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    common::init_test_tracing();
    let store = feast_ledger::Store::open(dir.path().join("ledger.sqlite"), Duration::ZERO);
    assert!(store.is_ready());

    let table = Table::from_rows(&["Item Name", "Quantity", "Unit"], vec![vec!["Rice", "50", "kg"]]);
    let blocker = Connection::open(store.path()).expect("open blocker");
    blocker.execute_batch("BEGIN IMMEDIATE").expect("take write lock");

    let started = Instant::now();
    assert!(!load_ingredient_list(&store, "Local-List", &table));
    // two backoffs between three attempts
    assert!(started.elapsed() >= Duration::from_millis(400));
    assert!(fetch_ingredients(&store, "Local-List").is_empty());

    blocker.execute_batch("ROLLBACK").expect("release write lock");
    assert!(load_ingredient_list(&store, "Local-List", &table));
    assert_eq!(fetch_ingredients(&store, "Local-List").len(), 1);
}
