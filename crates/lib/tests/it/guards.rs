//! Guard operations: save, submit, and cancel.

use driftwatch::{Condition, Session};

use crate::helpers::{eager_rig, live_state, officer_form};

#[test]
fn save_is_blocked_until_something_changed() {
    let rig = eager_rig();
    assert!(rig.session.save_blocked());

    rig.edit("role", "secretary");
    assert!(!rig.session.save_blocked());
}

#[test]
fn new_filing_needs_a_change_to_submit() {
    let rig = eager_rig();
    assert!(rig.session.submit_blocked(None));

    rig.edit("role", "secretary");
    assert!(!rig.session.submit_blocked(None));
}

#[test]
fn existing_draft_submits_without_new_changes() {
    let rig = eager_rig();
    assert!(!rig.session.has_changes());
    // The draft baseline was already saved upstream
    assert!(!rig.session.submit_blocked(Some("draft-1138")));
}

#[test]
fn submit_condition_overrides_everything() {
    let baseline = officer_form();
    let (state, current) = live_state(baseline.clone());

    let session = Session::builder()
        .watch(baseline, current)
        .submit_condition(Condition::fixed(false))
        .build();

    // Changes and a draft id on hand, but the condition says no
    state.borrow_mut().set("role", "secretary");
    assert!(session.submit_blocked(None));
    assert!(session.submit_blocked(Some("draft-1138")));

    let baseline = officer_form();
    let (_state, current) = live_state(baseline.clone());
    let session = Session::builder()
        .watch(baseline, current)
        .submit_condition(Condition::fixed(true))
        .build();

    // No changes at all, but the condition allows submission
    assert!(!session.submit_blocked(None));
}

#[test]
fn cancel_passes_through_when_clean() {
    let rig = eager_rig();
    assert!(!rig.session.cancel_blocked());
    assert_eq!(rig.prompt.opens(), 0);
}

#[test]
fn cancel_with_changes_opens_the_prompt_once() {
    let rig = eager_rig();
    rig.edit("name", "Grace Hopper");

    assert!(rig.session.cancel_blocked());
    assert_eq!(rig.prompt.opens(), 1);
    assert!(rig.prompt.has_pending());
}

#[test]
fn confirming_the_prompt_releases_the_interceptor() {
    let rig = eager_rig();
    rig.session.init();
    rig.edit("name", "Grace Hopper");

    assert!(rig.session.cancel_blocked());
    assert!(rig.session.is_registered());

    // User confirms they want to leave
    assert!(rig.prompt.confirm());
    assert!(!rig.session.is_registered());
    assert!(!rig.host.has_active());
}

#[test]
fn dismissing_the_prompt_keeps_the_interceptor() {
    let rig = eager_rig();
    rig.session.init();
    rig.edit("name", "Grace Hopper");

    assert!(rig.session.cancel_blocked());

    // User keeps editing
    assert!(rig.prompt.dismiss());
    assert!(rig.session.is_registered());
    assert!(rig.host.has_active());

    // A later cancel asks again
    assert!(rig.session.cancel_blocked());
    assert_eq!(rig.prompt.opens(), 2);
}
