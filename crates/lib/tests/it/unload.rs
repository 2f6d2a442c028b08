//! Unload-interceptor lifecycle: acquire, release, and decisions.

use driftwatch::session::unload::UnloadDecision;

use crate::helpers::eager_rig;

#[test]
fn init_acquires_a_registration() {
    let rig = eager_rig();
    assert_eq!(rig.host.acquires(), 0);

    rig.session.init();
    assert_eq!(rig.host.acquires(), 1);
    assert!(rig.host.has_active());
    assert!(rig.session.is_registered());
}

#[test]
fn init_is_idempotent() {
    let rig = eager_rig();

    // Double init revokes the first registration before acquiring again
    rig.session.init();
    rig.session.init();
    assert_eq!(rig.host.acquires(), 2);
    assert_eq!(rig.host.releases(), 1);
    assert!(rig.host.has_active());

    // After the final revoke nothing stays registered
    rig.session.revoke();
    assert_eq!(rig.host.releases(), 2);
    assert!(rig.host.releases() >= rig.host.acquires());
    assert!(!rig.host.has_active());
    assert!(!rig.session.is_registered());
}

#[test]
fn revoke_without_registration_is_a_no_op() {
    let rig = eager_rig();
    rig.session.revoke();
    rig.session.revoke();
    assert_eq!(rig.host.releases(), 0);

    rig.session.init();
    rig.session.revoke();
    rig.session.revoke();
    assert_eq!(rig.host.releases(), 1);
}

#[test]
fn interceptor_confirms_only_while_changed() {
    let rig = eager_rig();
    rig.session.init();

    assert_eq!(rig.host.fire(), Some(UnloadDecision::Proceed));

    rig.edit("name", "Grace Hopper");
    assert_eq!(rig.host.fire(), Some(UnloadDecision::Confirm));

    rig.edit("name", "Ada Lovelace");
    assert_eq!(rig.host.fire(), Some(UnloadDecision::Proceed));
}

#[test]
fn nothing_fires_after_revoke() {
    let rig = eager_rig();
    rig.session.init();
    rig.session.revoke();
    assert_eq!(rig.host.fire(), None);
}

#[test]
fn dropping_the_session_releases_the_registration() {
    let rig = eager_rig();
    rig.session.init();
    assert!(rig.host.has_active());

    let host = rig.host.clone();
    drop(rig);
    assert_eq!(host.releases(), 1);
    assert!(!host.has_active());
}

#[test]
fn clones_share_one_registration() {
    let rig = eager_rig();
    let other = rig.session.clone();

    rig.session.init();
    assert!(other.is_registered());

    other.revoke();
    assert!(!rig.session.is_registered());
    assert_eq!(rig.host.acquires(), 1);
    assert_eq!(rig.host.releases(), 1);
}
