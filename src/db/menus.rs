use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::connection::{is_constraint_violation, Store};
use crate::models::Menu;

fn menu_from_row(row: &Row<'_>) -> rusqlite::Result<Menu> {
    Ok(Menu {
        id: row.get(0)?,
        date: row.get(1)?,
        meal: row.get(2)?,
        headcount: row.get(3)?,
        menu_items: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Point lookup for one (date, meal).
pub fn fetch_menu(store: &Store, date: &str, meal: &str) -> Option<Menu> {
    store
        .run("fetch menu", |conn| {
            conn.query_row(
                "SELECT id, date, meal, headcount, menu_items, created_at
                 FROM menus WHERE date = ?1 AND meal = ?2",
                params![date, meal],
                menu_from_row,
            )
            .optional()
            .context("failed to load menu")
        })
        .flatten()
}

/// Distinct menu dates. Ordering is lexical on the stored text, so
/// `03/12/25` sorts before `04/11/25`.
pub fn fetch_menu_dates(store: &Store) -> Vec<String> {
    store
        .run("fetch menu dates", |conn| {
            collect_strings(conn, "SELECT DISTINCT date FROM menus ORDER BY date", [])
        })
        .unwrap_or_default()
}

/// Meals planned on `date`, sorted by name.
pub fn fetch_meals_for_date(store: &Store, date: &str) -> Vec<String> {
    store
        .run("fetch meals", |conn| {
            collect_strings(
                conn,
                "SELECT DISTINCT meal FROM menus WHERE date = ?1 ORDER BY meal",
                [date],
            )
        })
        .unwrap_or_default()
}

/// Replace the dish blob for one (date, meal). Used after the UI renames or
/// drops a single dish and rebuilds the list.
pub fn update_menu_items(store: &Store, date: &str, meal: &str, menu_items: &str) -> bool {
    store
        .run("update menu items", |conn| {
            let updated = conn
                .execute(
                    "UPDATE menus SET menu_items = ?1 WHERE date = ?2 AND meal = ?3",
                    params![menu_items, date, meal],
                )
                .context("failed to update menu items")?;
            Ok(updated > 0)
        })
        .unwrap_or(false)
}

/// Insert one menu row, reporting `Ok(false)` on a duplicate (date, meal).
pub(crate) fn insert_menu(
    conn: &Connection,
    date: &str,
    meal: &str,
    headcount: i64,
    menu_items: &str,
) -> rusqlite::Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO menus (date, meal, headcount, menu_items) VALUES (?1, ?2, ?3, ?4)",
        params![date, meal, headcount, menu_items],
    );

    match inserted {
        Ok(_) => Ok(true),
        Err(err) if is_constraint_violation(&err) => Ok(false),
        Err(err) => Err(err),
    }
}

fn collect_strings<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(sql).context("failed to prepare menu query")?;
    let mut rows = stmt.query(params).context("failed to execute menu query")?;

    let mut values = Vec::new();
    while let Some(row) = rows.next().context("failed to fetch menu row")? {
        let value: String = row.get(0).context("failed to read menu value")?;
        values.push(value);
    }

    Ok(values)
}
