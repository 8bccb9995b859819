mod common;

use feast_ledger::db::{
    add_ingredient, add_invitee, cohort_totals, global_search, ingredient_summary,
    update_cohort_split, update_ingredient_status, DeliverySummary, SearchKind, SearchResults,
};
use feast_ledger::DeliveryStatus;

#[test]
fn global_search_groups_hits_by_list() {
    let (_dir, store) = common::temp_store();
    add_ingredient(&store, "Local-List", "Rice", 50.0, "kg");
    add_ingredient(&store, "Home-Raasan", "Rice Flour", 2.0, "kg");
    add_ingredient(&store, "Home-Raasan", "Puffed Rice", 3.0, "kg");
    add_ingredient(&store, "Home-Raasan", "Salt", 1.0, "kg");

    let SearchResults::Ingredients(groups) = global_search(&store, "rice", SearchKind::Ingredients)
    else {
        panic!("expected ingredient results");
    };
    let summary: Vec<_> = groups
        .iter()
        .map(|group| (group.list_name.as_str(), group.hits.len()))
        .collect();
    assert_eq!(summary, [("Home-Raasan", 2), ("Local-List", 1)]);
}

#[test]
fn blank_term_finds_nothing() {
    let (_dir, store) = common::temp_store();
    add_invitee(&store, "Guests", "Asha", 4, None, None);

    let results = global_search(&store, "   ", SearchKind::Invitees);
    assert!(results.is_empty());
    assert_eq!(results.total(), 0);

    let results = global_search(&store, "ash", SearchKind::Invitees);
    assert_eq!(results.total(), 1);
}

#[test]
fn summary_counts_each_status() {
    let (_dir, store) = common::temp_store();
    add_ingredient(&store, "Local-List", "Rice", 50.0, "kg");
    add_ingredient(&store, "Local-List", "Salt", 5.0, "kg");
    add_ingredient(&store, "Local-List", "Oil", 15.0, "l");
    update_ingredient_status(&store, "Local-List", "Rice", DeliveryStatus::Completed, 0.0);
    update_ingredient_status(&store, "Local-List", "Oil", DeliveryStatus::Incomplete, 5.0);

    assert_eq!(
        ingredient_summary(&store, "Local-List"),
        DeliverySummary {
            total: 3,
            completed: 1,
            incomplete: 1,
            not_started: 1,
        }
    );
    assert_eq!(ingredient_summary(&store, "Empty"), DeliverySummary::default());
}

#[test]
fn cohort_totals_floor_each_remainder() {
    let (_dir, store) = common::temp_store();
    add_invitee(&store, "Barati", "Asha", 6, Some(5), None);
    add_invitee(&store, "Barati", "Binod", 3, Some(2), None);
    add_invitee(&store, "Barati", "Chitra", 2, None, None);
    update_cohort_split(&store, "Barati", "Asha", Some(5), Some(2), Some(1));
    // stale split larger than the cohort
    update_cohort_split(&store, "Barati", "Binod", Some(2), Some(3), None);

    let totals = cohort_totals(&store, "Barati");
    assert_eq!(totals.to_sakti, 7);
    assert_eq!(totals.bus, 5);
    assert_eq!(totals.car, 1);
    assert_eq!(totals.unsure, 2);
}
