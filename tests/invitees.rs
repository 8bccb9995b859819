mod common;

use feast_ledger::db::{
    add_invitee, delete_invitee, fetch_invitees, reset_invitee, search_invitees, total_headcount,
    update_cohort_split, update_invitee,
};

#[test]
fn guests_asha_walkthrough() {
    let (_dir, store) = common::temp_store();
    assert!(add_invitee(&store, "Guests", "Asha", 4, None, None));
    assert!(update_invitee(&store, "Guests", "Asha", 5, None, None));

    let asha = &fetch_invitees(&store, "Guests")[0];
    assert_eq!(asha.lunch, 5);
    assert_eq!(asha.original_lunch, 4);
    assert_eq!(asha.to_sakti, None);
    assert_eq!(total_headcount(&store, "Guests"), 5);
}

#[test]
fn lunch_only_update_keeps_cohort_fields() {
    let (_dir, store) = common::temp_store();
    add_invitee(&store, "Barati", "Ravi", 6, Some(4), Some("Bus"));
    assert!(update_invitee(&store, "Barati", "Ravi", 7, None, None));

    let ravi = &fetch_invitees(&store, "Barati")[0];
    assert_eq!(ravi.lunch, 7);
    assert_eq!(ravi.to_sakti, Some(4));
    assert_eq!(ravi.travel_by.as_deref(), Some("Bus"));
}

#[test]
fn update_with_one_optional_writes_all_three() {
    let (_dir, store) = common::temp_store();
    add_invitee(&store, "Barati", "Ravi", 6, Some(4), Some("Bus"));
    assert!(update_invitee(&store, "Barati", "Ravi", 6, None, Some("Car")));

    let ravi = &fetch_invitees(&store, "Barati")[0];
    assert_eq!(ravi.to_sakti, None);
    assert_eq!(ravi.travel_by.as_deref(), Some("Car"));
}

#[test]
fn duplicate_guest_is_rejected() {
    let (_dir, store) = common::temp_store();
    assert!(add_invitee(&store, "Guests", "Asha", 4, None, None));
    assert!(!add_invitee(&store, "Guests", "Asha", 9, None, None));
    assert_eq!(fetch_invitees(&store, "Guests")[0].lunch, 4);
}

#[test]
fn reset_restores_lunch_but_not_cohort() {
    let (_dir, store) = common::temp_store();
    add_invitee(&store, "Barati", "Ravi", 6, None, None);
    update_invitee(&store, "Barati", "Ravi", 9, Some(3), Some("Car"));

    assert!(reset_invitee(&store, "Barati", "Ravi"));
    let ravi = &fetch_invitees(&store, "Barati")[0];
    assert_eq!(ravi.lunch, 6);
    assert_eq!(ravi.to_sakti, Some(3));
    assert_eq!(ravi.travel_by.as_deref(), Some("Car"));
}

#[test]
fn cohort_split_is_stored_and_unsure_derived() {
    let (_dir, store) = common::temp_store();
    add_invitee(&store, "Barati", "Ravi", 8, Some(5), None);
    assert!(update_cohort_split(&store, "Barati", "Ravi", Some(5), Some(2), Some(1)));

    let ravi = &fetch_invitees(&store, "Barati")[0];
    assert_eq!(ravi.bus_sakti, Some(2));
    assert_eq!(ravi.car_sakti, Some(1));
    assert_eq!(ravi.unsure_sakti(), Some(2));
    assert!(!update_cohort_split(&store, "Barati", "Nobody", Some(1), None, None));
}

#[test]
fn headcount_of_empty_or_unknown_list_is_zero() {
    let (_dir, store) = common::temp_store();
    assert_eq!(total_headcount(&store, "Guests"), 0);

    add_invitee(&store, "Guests", "Asha", 4, None, None);
    add_invitee(&store, "Guests", "Binod", 3, None, None);
    assert_eq!(total_headcount(&store, "Guests"), 7);

    assert!(delete_invitee(&store, "Guests", "Asha"));
    assert!(!delete_invitee(&store, "Guests", "Asha"));
    assert_eq!(total_headcount(&store, "Guests"), 3);
}

#[test]
fn search_scopes_to_list_when_given() {
    let (_dir, store) = common::temp_store();
    add_invitee(&store, "Poite", "Asha Sen", 2, None, None);
    add_invitee(&store, "Barati", "asha roy", 3, None, None);

    assert_eq!(search_invitees(&store, "ASHA", None).len(), 2);
    let scoped = search_invitees(&store, "asha", Some("Poite"));
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].name, "Asha Sen");
    assert_eq!(search_invitees(&store, "asha", Some("")).len(), 2);
}
