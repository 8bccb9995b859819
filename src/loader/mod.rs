//! Bulk replacement of a list's contents from tabular input.
//!
//! Each load deletes the target scope and re-inserts every row that parses,
//! all inside one immediate transaction. Bad rows are skipped and logged, so a
//! load only reports failure when the database itself stayed unavailable
//! through every retry.

pub mod seed;
mod table;

use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, error, info};

use crate::db::{insert_ingredient, insert_invitee, insert_menu, Store};

pub use seed::{load_initial_data, SeedReport};
pub use table::{IngredientRow, InviteeRow, MenuRow, Record, SkipReason, Table};

/// Replace every ingredient in `list_name` with the rows of `table`.
pub fn load_ingredient_list(store: &Store, list_name: &str, table: &Table) -> bool {
    let rows = parse_rows(list_name, table, IngredientRow::parse);
    replace_scope(
        store,
        list_name,
        rows,
        |conn| conn.execute("DELETE FROM ingredients WHERE list_name = ?1", [list_name]),
        |conn, row| insert_ingredient(conn, list_name, &row.item_name, row.quantity, &row.unit),
    )
}

/// Replace every guest in `list_name` with the rows of `table`.
pub fn load_invitee_list(store: &Store, list_name: &str, table: &Table) -> bool {
    let rows = parse_rows(list_name, table, InviteeRow::parse);
    replace_scope(
        store,
        list_name,
        rows,
        |conn| conn.execute("DELETE FROM invitees WHERE list_name = ?1", [list_name]),
        |conn, row| {
            insert_invitee(
                conn,
                list_name,
                &row.name,
                row.lunch,
                row.to_sakti,
                row.travel_by.as_deref(),
            )
        },
    )
}

/// Replace the whole menu catalog with the rows of `table`.
pub fn load_menus(store: &Store, table: &Table) -> bool {
    const SCOPE: &str = "menus";
    let rows = parse_rows(SCOPE, table, MenuRow::parse);
    replace_scope(
        store,
        SCOPE,
        rows,
        |conn| conn.execute("DELETE FROM menus", []),
        |conn, row| insert_menu(conn, &row.date, &row.meal, row.headcount, &row.menu_items),
    )
}

struct ParsedRows<R> {
    valid: Vec<(usize, R)>,
    skipped: usize,
}

/// Parse once up front so retries do not repeat the skip logging. Row
/// numbers count data rows from 1.
fn parse_rows<R>(
    scope: &str,
    table: &Table,
    parse: impl Fn(&Record<'_>) -> Result<R, SkipReason>,
) -> ParsedRows<R> {
    let mut parsed = ParsedRows {
        valid: Vec::with_capacity(table.len()),
        skipped: 0,
    };

    for (index, record) in table.records().enumerate() {
        let row = index + 1;
        match parse(&record) {
            Ok(value) => parsed.valid.push((row, value)),
            Err(reason) => {
                debug!(scope, row, %reason, "skipping row");
                parsed.skipped += 1;
            }
        }
    }

    parsed
}

fn replace_scope<R>(
    store: &Store,
    scope: &str,
    rows: ParsedRows<R>,
    clear: impl Fn(&Connection) -> rusqlite::Result<usize>,
    insert: impl Fn(&Connection, &R) -> rusqlite::Result<bool>,
) -> bool {
    let outcome = store.with_retry("bulk load", |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let writer: &Connection = &tx;
        let removed = clear(writer)?;

        let mut inserted = 0usize;
        let mut duplicates = 0usize;
        for (row, record) in &rows.valid {
            if insert(writer, record)? {
                inserted += 1;
            } else {
                debug!(scope, row = *row, reason = %SkipReason::Duplicate, "skipping row");
                duplicates += 1;
            }
        }

        tx.commit()?;
        Ok((removed, inserted, duplicates))
    });

    match outcome {
        Ok((removed, inserted, duplicates)) => {
            info!(
                scope,
                removed,
                inserted,
                skipped = rows.skipped + duplicates,
                "bulk load finished"
            );
            true
        }
        Err(err) => {
            error!(scope, error = %err, "bulk load failed");
            false
        }
    }
}
