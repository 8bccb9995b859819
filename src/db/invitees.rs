use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use super::connection::{is_constraint_violation, Store};
use super::like_pattern;
use crate::models::Invitee;

const INVITEE_COLUMNS: &str = "id, list_name, name, lunch, to_sakti, travel_by, bus_sakti, \
     car_sakti, original_lunch, created_at";

fn invitee_from_row(row: &Row<'_>) -> rusqlite::Result<Invitee> {
    Ok(Invitee {
        id: row.get(0)?,
        list_name: row.get(1)?,
        name: row.get(2)?,
        lunch: row.get(3)?,
        to_sakti: row.get(4)?,
        travel_by: row.get(5)?,
        bus_sakti: row.get(6)?,
        car_sakti: row.get(7)?,
        original_lunch: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Every guest in one list, ordered by name.
pub fn fetch_invitees(store: &Store, list_name: &str) -> Vec<Invitee> {
    store
        .run("fetch invitees", |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {INVITEE_COLUMNS} FROM invitees
                     WHERE list_name = ?1
                     ORDER BY name"
                ))
                .context("failed to prepare invitee query")?;

            let invitees = stmt
                .query_map([list_name], invitee_from_row)
                .context("failed to load invitees")?
                .collect::<Result<Vec<_>, _>>()
                .context("failed to collect invitees")?;

            Ok(invitees)
        })
        .unwrap_or_default()
}

/// Insert a guest with `original_lunch` set to `lunch`. Returns `false` when
/// the name already exists in that list.
pub fn add_invitee(
    store: &Store,
    list_name: &str,
    name: &str,
    lunch: i64,
    to_sakti: Option<i64>,
    travel_by: Option<&str>,
) -> bool {
    store
        .run("add invitee", |conn| {
            insert_invitee(conn, list_name, name, lunch, to_sakti, travel_by)
                .context("failed to insert invitee")
        })
        .unwrap_or(false)
}

pub(crate) fn insert_invitee(
    conn: &Connection,
    list_name: &str,
    name: &str,
    lunch: i64,
    to_sakti: Option<i64>,
    travel_by: Option<&str>,
) -> rusqlite::Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO invitees (list_name, name, lunch, to_sakti, travel_by, original_lunch)
         VALUES (?1, ?2, ?3, ?4, ?5, ?3)",
        params![list_name, name, lunch, to_sakti, travel_by],
    );

    match inserted {
        Ok(_) => Ok(true),
        Err(err) if is_constraint_violation(&err) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Update a guest's headcount. When either cohort field is supplied, lunch,
/// `to_sakti` and `travel_by` are written together; otherwise only lunch
/// changes, so a plain ±1 never clears cohort data.
pub fn update_invitee(
    store: &Store,
    list_name: &str,
    name: &str,
    lunch: i64,
    to_sakti: Option<i64>,
    travel_by: Option<&str>,
) -> bool {
    store
        .run("update invitee", |conn| {
            let updated = if to_sakti.is_some() || travel_by.is_some() {
                conn.execute(
                    "UPDATE invitees SET lunch = ?1, to_sakti = ?2, travel_by = ?3
                     WHERE list_name = ?4 AND name = ?5",
                    params![lunch, to_sakti, travel_by, list_name, name],
                )
            } else {
                conn.execute(
                    "UPDATE invitees SET lunch = ?1 WHERE list_name = ?2 AND name = ?3",
                    params![lunch, list_name, name],
                )
            }
            .context("failed to update invitee")?;
            Ok(updated > 0)
        })
        .unwrap_or(false)
}

/// Write the cohort size and its bus/car split in one statement. The
/// `bus + car <= to_sakti <= lunch` invariant is checked by the caller.
pub fn update_cohort_split(
    store: &Store,
    list_name: &str,
    name: &str,
    to_sakti: Option<i64>,
    bus_sakti: Option<i64>,
    car_sakti: Option<i64>,
) -> bool {
    store
        .run("update cohort split", |conn| {
            let updated = conn
                .execute(
                    "UPDATE invitees SET to_sakti = ?1, bus_sakti = ?2, car_sakti = ?3
                     WHERE list_name = ?4 AND name = ?5",
                    params![to_sakti, bus_sakti, car_sakti, list_name, name],
                )
                .context("failed to update cohort split")?;
            Ok(updated > 0)
        })
        .unwrap_or(false)
}

/// Remove one guest; `false` when the name was not in the list.
pub fn delete_invitee(store: &Store, list_name: &str, name: &str) -> bool {
    store
        .run("delete invitee", |conn| {
            let deleted = conn
                .execute(
                    "DELETE FROM invitees WHERE list_name = ?1 AND name = ?2",
                    params![list_name, name],
                )
                .context("failed to delete invitee")?;
            Ok(deleted > 0)
        })
        .unwrap_or(false)
}

/// Restore lunch to its baseline. Cohort fields have no baseline and stay.
pub fn reset_invitee(store: &Store, list_name: &str, name: &str) -> bool {
    store
        .run("reset invitee", |conn| {
            let updated = conn
                .execute(
                    "UPDATE invitees SET lunch = original_lunch
                     WHERE list_name = ?1 AND name = ?2",
                    params![list_name, name],
                )
                .context("failed to reset invitee")?;
            Ok(updated > 0)
        })
        .unwrap_or(false)
}

/// Sum of lunch across a list; zero for an empty or unknown list.
pub fn total_headcount(store: &Store, list_name: &str) -> i64 {
    store
        .run("total headcount", |conn| {
            conn.query_row(
                "SELECT COALESCE(SUM(lunch), 0) FROM invitees WHERE list_name = ?1",
                [list_name],
                |row| row.get(0),
            )
            .context("failed to sum headcount")
        })
        .unwrap_or(0)
}

/// Case-insensitive substring search on guest names, optionally within one
/// list.
pub fn search_invitees(store: &Store, term: &str, list_name: Option<&str>) -> Vec<Invitee> {
    let list_name = list_name.filter(|name| !name.is_empty());
    store
        .run("search invitees", |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {INVITEE_COLUMNS} FROM invitees
                     WHERE (?2 IS NULL OR list_name = ?2) AND name LIKE ?1 ESCAPE '\\'
                     ORDER BY list_name, name"
                ))
                .context("failed to prepare invitee search")?;

            let invitees = stmt
                .query_map(params![like_pattern(term), list_name], invitee_from_row)
                .context("failed to search invitees")?
                .collect::<Result<Vec<_>, _>>()
                .context("failed to collect invitee matches")?;

            Ok(invitees)
        })
        .unwrap_or_default()
}
