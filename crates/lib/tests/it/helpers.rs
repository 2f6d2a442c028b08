use std::cell::RefCell;
use std::rc::Rc;

use driftwatch::session::prompt::RecordingPrompt;
use driftwatch::session::unload::RecordingHost;
use driftwatch::value::{Map, Value};
use driftwatch::{ManualClock, Session, Source, Strategy};

// ==========================
// CORE TEST FACTORIES
// ==========================
// Shared setup for session tests: a representative form snapshot, a live
// mutable state cell, and a fully instrumented session rig.

/// A representative officer-change form snapshot.
pub fn officer_form() -> Map {
    let mut address = Map::new();
    address.set("street", "1207 Douglas St");
    address.set("city", "Victoria");
    address.set("region", "BC");

    let mut form = Map::new();
    form.set("name", "Ada Lovelace");
    form.set("role", "director");
    form.set("email", "ada@example.com");
    form.set("address", address);
    form
}

/// Wraps a snapshot in a shared mutable cell and returns a live source
/// reading it, the way a view's reactive form state feeds a session.
pub fn live_state(initial: Map) -> (Rc<RefCell<Map>>, Source) {
    let state = Rc::new(RefCell::new(initial));
    let source = {
        let state = state.clone();
        Source::getter(move || Value::Map(state.borrow().clone()))
    };
    (state, source)
}

/// A session plus every collaborator a test might want to inspect or drive.
pub struct SessionRig {
    pub session: Session,
    pub clock: ManualClock,
    pub host: RecordingHost,
    pub prompt: RecordingPrompt,
    pub state: Rc<RefCell<Map>>,
}

impl SessionRig {
    /// Mutates the live state and notes the edit with the session.
    pub fn edit(&self, key: &str, value: impl Into<Value>) {
        self.state.borrow_mut().set(key, value);
        self.session.touch();
    }
}

fn rig_with_strategy(strategy: Strategy) -> SessionRig {
    let baseline = officer_form();
    let (state, current) = live_state(baseline.clone());
    let clock = ManualClock::new(1_000_000);
    let host = RecordingHost::new();
    let prompt = RecordingPrompt::new();

    let session = Session::builder()
        .watch(baseline, current)
        .strategy(strategy)
        .clock(clock.clone())
        .unload_host(host.clone())
        .prompt(prompt.clone())
        .build();

    SessionRig {
        session,
        clock,
        host,
        prompt,
        state,
    }
}

/// Rig with the eager strategy: verdicts are fresh on every read.
pub fn eager_rig() -> SessionRig {
    rig_with_strategy(Strategy::Eager)
}

/// Rig with the default debounced strategy (100 ms / 500 ms).
pub fn debounced_rig() -> SessionRig {
    rig_with_strategy(Strategy::debounced())
}
