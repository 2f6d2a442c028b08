//! Change-detection behavior across both recompute strategies.

use std::panic::{AssertUnwindSafe, catch_unwind};

use driftwatch::value::{Map, Value};
use driftwatch::{Condition, IgnoreSet, Session, Source, Strategy};

use crate::helpers::{debounced_rig, eager_rig, live_state, officer_form};

#[test]
fn fresh_session_has_no_changes() {
    let rig = eager_rig();
    assert!(!rig.session.has_changes());
    assert!(rig.session.save_blocked());
}

#[test]
fn eager_session_sees_mutation_immediately() {
    let rig = eager_rig();
    rig.edit("name", "Grace Hopper");
    assert!(rig.session.has_changes());
    assert!(!rig.session.save_blocked());
}

#[test]
fn eager_session_sees_revert_immediately() {
    let rig = eager_rig();
    rig.edit("name", "Grace Hopper");
    assert!(rig.session.has_changes());

    rig.edit("name", "Ada Lovelace");
    assert!(!rig.session.has_changes());
}

#[test]
fn debounced_session_waits_for_quiet_window() {
    let rig = debounced_rig();
    rig.edit("name", "Grace Hopper");

    // Within the debounce window the cached verdict still answers
    rig.clock.advance(99);
    assert!(!rig.session.has_changes());

    // Once edits have been quiet for the debounce window, the verdict is
    // recomputed
    rig.clock.advance(1);
    assert!(rig.session.has_changes());
}

#[test]
fn debounced_session_caps_staleness_at_max_wait() {
    let rig = debounced_rig();

    // A burst of edits every 50ms keeps resetting the quiet window
    rig.edit("name", "G");
    for i in 0..9 {
        rig.clock.advance(50);
        assert!(
            !rig.session.has_changes(),
            "verdict refreshed too early at edit {i}"
        );
        rig.edit("name", format!("Grace {i}"));
    }

    // 500ms after the first pending edit the max wait forces the recompute
    rig.clock.advance(50);
    assert!(rig.session.has_changes());
}

#[test]
fn debounced_session_reports_strategy_bounds() {
    let rig = debounced_rig();
    assert_eq!(
        rig.session.strategy(),
        Strategy::Debounced {
            debounce_ms: 100,
            max_wait_ms: 500,
        }
    );
}

#[test]
fn force_recompute_skips_the_window() {
    let rig = debounced_rig();
    rig.edit("name", "Grace Hopper");

    // No time has passed, but the caller wants the verdict now
    assert!(rig.session.force_recompute());
    assert!(rig.session.has_changes());
}

#[test]
fn custom_check_is_ored_into_the_verdict() {
    let baseline = officer_form();
    let (_state, current) = live_state(baseline.clone());

    let session = Session::builder()
        .watch(baseline, current)
        .custom_check(Condition::getter(|| true))
        .build();

    // State is untouched, but the custom check reports changes
    assert!(session.has_changes());
    assert!(!session.save_blocked());
}

#[test]
fn ignored_fields_do_not_count_as_changes() {
    let rig_baseline = officer_form();
    let (state, current) = live_state(rig_baseline.clone());

    let session = Session::builder()
        .watch(rig_baseline, current)
        .ignore(IgnoreSet::from(["modified"]))
        .build();

    state.borrow_mut().set("modified", "2026-08-07T10:00:00Z");
    assert!(!session.has_changes());

    state.borrow_mut().set("name", "Grace Hopper");
    assert!(session.has_changes());
}

#[test]
fn any_diverged_group_flips_the_verdict() {
    let form_a = officer_form();
    let (_state_a, current_a) = live_state(form_a.clone());

    let form_b: Map = [("certify", Value::Bool(false))].into_iter().collect();
    let (state_b, current_b) = live_state(form_b.clone());

    let session = Session::builder()
        .watch(form_a, current_a)
        .watch(form_b, current_b)
        .build();

    assert!(!session.has_changes());

    // Only the second group changes
    state_b.borrow_mut().set("certify", true);
    assert!(session.has_changes());
}

#[test]
fn changed_paths_reports_where_state_drifted() {
    let rig = eager_rig();
    rig.edit("name", "Grace Hopper");
    {
        let mut state = rig.state.borrow_mut();
        let address = state.get_mut("address").and_then(Value::as_map_mut).unwrap();
        address.set("city", "Vancouver");
    }

    let paths: Vec<String> = rig
        .session
        .changed_paths()
        .into_iter()
        .map(|p| p.as_str().to_string())
        .collect();
    assert_eq!(paths, vec!["address.city", "name"]);
}

#[test]
fn fixed_sources_never_drift() {
    let session = Session::new(officer_form(), officer_form());
    assert!(!session.has_changes());
    assert!(session.save_blocked());
}

#[test]
fn panicking_accessor_propagates() {
    use std::cell::Cell;
    use std::rc::Rc;

    // An accessor that works once (for the build-time verdict), then loses
    // its backing state
    let calls = Rc::new(Cell::new(0u32));
    let baseline = officer_form();
    let current = {
        let calls = calls.clone();
        let snapshot = baseline.clone();
        Source::getter(move || {
            calls.set(calls.get() + 1);
            if calls.get() > 1 {
                panic!("backing store gone");
            }
            Value::Map(snapshot.clone())
        })
    };

    let session = Session::builder().watch(baseline, current).build();

    let result = catch_unwind(AssertUnwindSafe(|| session.has_changes()));
    assert!(result.is_err());
}
