use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use super::connection::{is_constraint_violation, Store};
use super::like_pattern;
use crate::models::{DeliveryStatus, Ingredient};

const INGREDIENT_COLUMNS: &str = "id, list_name, item_name, quantity, unit, delivered_quantity, \
     status, original_quantity, created_at";

fn ingredient_from_row(row: &Row<'_>) -> rusqlite::Result<Ingredient> {
    Ok(Ingredient {
        id: row.get(0)?,
        list_name: row.get(1)?,
        item_name: row.get(2)?,
        quantity: row.get(3)?,
        unit: row.get(4)?,
        delivered_quantity: row.get(5)?,
        status: row.get(6)?,
        original_quantity: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Every ingredient in one list, ordered by item name.
pub fn fetch_ingredients(store: &Store, list_name: &str) -> Vec<Ingredient> {
    store
        .run("fetch ingredients", |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {INGREDIENT_COLUMNS} FROM ingredients
                     WHERE list_name = ?1
                     ORDER BY item_name"
                ))
                .context("failed to prepare ingredient query")?;

            let ingredients = stmt
                .query_map([list_name], ingredient_from_row)
                .context("failed to load ingredients")?
                .collect::<Result<Vec<_>, _>>()
                .context("failed to collect ingredients")?;

            Ok(ingredients)
        })
        .unwrap_or_default()
}

/// Insert a new ingredient with its baseline set to `quantity`. Returns
/// `false` when the item already exists in that list.
pub fn add_ingredient(
    store: &Store,
    list_name: &str,
    item_name: &str,
    quantity: f64,
    unit: &str,
) -> bool {
    store
        .run("add ingredient", |conn| {
            insert_ingredient(conn, list_name, item_name, quantity, unit)
                .context("failed to insert ingredient")
        })
        .unwrap_or(false)
}

/// Shared by single adds and the bulk loader. A duplicate identity reports
/// `Ok(false)` rather than an error.
pub(crate) fn insert_ingredient(
    conn: &Connection,
    list_name: &str,
    item_name: &str,
    quantity: f64,
    unit: &str,
) -> rusqlite::Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO ingredients
         (list_name, item_name, quantity, unit, delivered_quantity, status, original_quantity)
         VALUES (?1, ?2, ?3, ?4, 0, ?5, ?3)",
        params![
            list_name,
            item_name,
            quantity,
            unit,
            DeliveryStatus::NotStarted
        ],
    );

    match inserted {
        Ok(_) => Ok(true),
        Err(err) if is_constraint_violation(&err) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Overwrite status and delivered quantity without validating either; the
/// form layer bounds the quantity. Under `Incomplete` the quantity is the
/// undelivered remainder.
pub fn update_ingredient_status(
    store: &Store,
    list_name: &str,
    item_name: &str,
    status: DeliveryStatus,
    delivered_qty: f64,
) -> bool {
    store
        .run("update ingredient status", |conn| {
            let updated = conn
                .execute(
                    "UPDATE ingredients SET status = ?1, delivered_quantity = ?2
                     WHERE list_name = ?3 AND item_name = ?4",
                    params![status, delivered_qty, list_name, item_name],
                )
                .context("failed to update ingredient status")?;
            Ok(updated > 0)
        })
        .unwrap_or(false)
}

/// Change the current quantity and unit. The baseline stays untouched.
pub fn update_ingredient(
    store: &Store,
    list_name: &str,
    item_name: &str,
    quantity: f64,
    unit: &str,
) -> bool {
    store
        .run("update ingredient", |conn| {
            let updated = conn
                .execute(
                    "UPDATE ingredients SET quantity = ?1, unit = ?2
                     WHERE list_name = ?3 AND item_name = ?4",
                    params![quantity, unit, list_name, item_name],
                )
                .context("failed to update ingredient")?;
            Ok(updated > 0)
        })
        .unwrap_or(false)
}

/// Remove one ingredient; `false` when it was not in the list.
pub fn delete_ingredient(store: &Store, list_name: &str, item_name: &str) -> bool {
    store
        .run("delete ingredient", |conn| {
            let deleted = conn
                .execute(
                    "DELETE FROM ingredients WHERE list_name = ?1 AND item_name = ?2",
                    params![list_name, item_name],
                )
                .context("failed to delete ingredient")?;
            Ok(deleted > 0)
        })
        .unwrap_or(false)
}

/// Restore the as-imported state: baseline quantity, nothing delivered, not
/// started.
pub fn reset_ingredient(store: &Store, list_name: &str, item_name: &str) -> bool {
    store
        .run("reset ingredient", |conn| {
            let updated = conn
                .execute(
                    "UPDATE ingredients
                     SET quantity = original_quantity, delivered_quantity = 0, status = ?1
                     WHERE list_name = ?2 AND item_name = ?3",
                    params![DeliveryStatus::NotStarted, list_name, item_name],
                )
                .context("failed to reset ingredient")?;
            Ok(updated > 0)
        })
        .unwrap_or(false)
}

/// Case-insensitive substring search on item names, optionally within one
/// list. An empty list name searches everything.
pub fn search_ingredients(store: &Store, term: &str, list_name: Option<&str>) -> Vec<Ingredient> {
    let list_name = list_name.filter(|name| !name.is_empty());
    store
        .run("search ingredients", |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {INGREDIENT_COLUMNS} FROM ingredients
                     WHERE (?2 IS NULL OR list_name = ?2) AND item_name LIKE ?1 ESCAPE '\\'
                     ORDER BY list_name, item_name"
                ))
                .context("failed to prepare ingredient search")?;

            let ingredients = stmt
                .query_map(params![like_pattern(term), list_name], ingredient_from_row)
                .context("failed to search ingredients")?
                .collect::<Result<Vec<_>, _>>()
                .context("failed to collect ingredient matches")?;

            Ok(ingredients)
        })
        .unwrap_or_default()
}
