//! Persistence layer split by record kind. Every public function takes a
//! [`Store`] and opens its own short-lived connection.

mod connection;
mod ingredients;
mod invitees;
mod menus;
pub mod schema;
mod search;

pub use connection::Store;
pub(crate) use ingredients::insert_ingredient;
pub use ingredients::{
    add_ingredient, delete_ingredient, fetch_ingredients, reset_ingredient, search_ingredients,
    update_ingredient, update_ingredient_status,
};
pub(crate) use invitees::insert_invitee;
pub use invitees::{
    add_invitee, delete_invitee, fetch_invitees, reset_invitee, search_invitees,
    total_headcount, update_cohort_split, update_invitee,
};
pub(crate) use menus::insert_menu;
pub use menus::{fetch_meals_for_date, fetch_menu, fetch_menu_dates, update_menu_items};
pub use search::{
    cohort_totals, global_search, ingredient_summary, CohortTotals, DeliverySummary, ListHits,
    SearchKind, SearchResults,
};

/// Build a `LIKE` pattern matching `term` anywhere, with the wildcard
/// characters escaped so they match literally. Pair with `ESCAPE '\'`.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
