//! Read-only views across lists: grouped search hits and per-list totals.

use anyhow::Context;
use rusqlite::params;

use super::connection::Store;
use super::{search_ingredients, search_invitees};
use crate::models::{DeliveryStatus, Ingredient, Invitee};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchKind {
    #[default]
    Ingredients,
    Invitees,
}

impl SearchKind {
    pub fn label(&self) -> &'static str {
        match self {
            SearchKind::Ingredients => "Ingredients",
            SearchKind::Invitees => "Guests",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SearchKind::Ingredients => SearchKind::Invitees,
            SearchKind::Invitees => SearchKind::Ingredients,
        }
    }
}

/// Matches from a single list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListHits<T> {
    pub list_name: String,
    pub hits: Vec<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults {
    Ingredients(Vec<ListHits<Ingredient>>),
    Invitees(Vec<ListHits<Invitee>>),
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Number of matching records across every list.
    pub fn total(&self) -> usize {
        match self {
            SearchResults::Ingredients(groups) => groups.iter().map(|g| g.hits.len()).sum(),
            SearchResults::Invitees(groups) => groups.iter().map(|g| g.hits.len()).sum(),
        }
    }
}

/// Search every list of one kind and group the hits by list name. A blank
/// term matches nothing rather than everything.
pub fn global_search(store: &Store, term: &str, kind: SearchKind) -> SearchResults {
    let term = term.trim();
    match kind {
        SearchKind::Ingredients => {
            let hits = if term.is_empty() {
                Vec::new()
            } else {
                search_ingredients(store, term, None)
            };
            SearchResults::Ingredients(group_by_list(hits, |i| &i.list_name))
        }
        SearchKind::Invitees => {
            let hits = if term.is_empty() {
                Vec::new()
            } else {
                search_invitees(store, term, None)
            };
            SearchResults::Invitees(group_by_list(hits, |i| &i.list_name))
        }
    }
}

/// Relies on the input already being ordered by list name.
fn group_by_list<T>(records: Vec<T>, list_of: impl Fn(&T) -> &String) -> Vec<ListHits<T>> {
    let mut groups: Vec<ListHits<T>> = Vec::new();
    for record in records {
        let list_name = list_of(&record).clone();
        let same_list = groups
            .last()
            .is_some_and(|group| group.list_name == list_name);
        if same_list {
            if let Some(group) = groups.last_mut() {
                group.hits.push(record);
            }
        } else {
            groups.push(ListHits {
                list_name,
                hits: vec![record],
            });
        }
    }
    groups
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliverySummary {
    pub total: i64,
    pub completed: i64,
    pub incomplete: i64,
    pub not_started: i64,
}

/// Count ingredients in a list by delivery status.
pub fn ingredient_summary(store: &Store, list_name: &str) -> DeliverySummary {
    store
        .run("ingredient summary", |conn| {
            conn.query_row(
                "SELECT COUNT(*),
                        COALESCE(SUM(status = ?2), 0),
                        COALESCE(SUM(status = ?3), 0),
                        COALESCE(SUM(status = ?4), 0)
                 FROM ingredients WHERE list_name = ?1",
                params![
                    list_name,
                    DeliveryStatus::Completed,
                    DeliveryStatus::Incomplete,
                    DeliveryStatus::NotStarted
                ],
                |row| {
                    Ok(DeliverySummary {
                        total: row.get(0)?,
                        completed: row.get(1)?,
                        incomplete: row.get(2)?,
                        not_started: row.get(3)?,
                    })
                },
            )
            .context("failed to summarise deliveries")
        })
        .unwrap_or_default()
}

/// Cohort headcounts summed over a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CohortTotals {
    pub to_sakti: i64,
    pub bus: i64,
    pub car: i64,
    /// Sum of each guest's floored remainder, so one over-assigned party
    /// does not hide another's unassigned members.
    pub unsure: i64,
}

/// Travel cohort totals across a list; guests without a cohort add nothing.
pub fn cohort_totals(store: &Store, list_name: &str) -> CohortTotals {
    store
        .run("cohort totals", |conn| {
            conn.query_row(
                "SELECT COALESCE(SUM(to_sakti), 0),
                        COALESCE(SUM(bus_sakti), 0),
                        COALESCE(SUM(car_sakti), 0),
                        COALESCE(SUM(MAX(0, to_sakti - COALESCE(bus_sakti, 0) - COALESCE(car_sakti, 0))), 0)
                 FROM invitees WHERE list_name = ?1",
                [list_name],
                |row| {
                    Ok(CohortTotals {
                        to_sakti: row.get(0)?,
                        bus: row.get(1)?,
                        car: row.get(2)?,
                        unsure: row.get(3)?,
                    })
                },
            )
            .context("failed to total cohort")
        })
        .unwrap_or_default()
}
