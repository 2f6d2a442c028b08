//! Unload interception as an explicit acquire/release resource.
//!
//! A browser registers `beforeunload` listeners on a global window object;
//! the equivalent here is an [`UnloadHost`] the session acquires a
//! registration from. Registration is pull-based: when the host is about to
//! navigate away it asks the interceptor for a decision, and the interceptor
//! answers [`Confirm`](UnloadDecision::Confirm) while unsaved changes exist.
//!
//! Registrations release on drop, so a session that is torn down without an
//! explicit revoke still leaves no stale interceptor behind.

use std::fmt;
use std::rc::Rc;

#[cfg(any(test, feature = "testing"))]
use std::cell::RefCell;

/// What the host should do with an imminent navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadDecision {
    /// Nothing unsaved: let the navigation through.
    Proceed,
    /// Unsaved changes exist: ask the user before leaving.
    Confirm,
}

/// A registered navigation-away callback.
///
/// Wraps the session's decision function. Hosts call
/// [`intercept`](UnloadInterceptor::intercept) when navigation is imminent.
#[derive(Clone)]
pub struct UnloadInterceptor {
    decide: Rc<dyn Fn() -> UnloadDecision>,
}

impl UnloadInterceptor {
    /// Wraps a decision function.
    pub fn new(decide: impl Fn() -> UnloadDecision + 'static) -> Self {
        Self {
            decide: Rc::new(decide),
        }
    }

    /// Asks the interceptor what to do with an imminent navigation.
    pub fn intercept(&self) -> UnloadDecision {
        (self.decide)()
    }
}

impl fmt::Debug for UnloadInterceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnloadInterceptor").finish_non_exhaustive()
    }
}

/// A host environment that can interpose on navigation away from the
/// current view.
///
/// Implementations wire [`acquire`](UnloadHost::acquire) to whatever their
/// environment offers: a browser bridge maps it onto `beforeunload`, a
/// desktop shell onto its window-close hook. The returned registration must
/// release the underlying listener when dropped.
pub trait UnloadHost {
    /// Registers an interceptor with the host's navigation lifecycle.
    fn acquire(&self, interceptor: UnloadInterceptor) -> UnloadRegistration;
}

/// RAII handle for an acquired interceptor registration.
///
/// Dropping the registration releases it. Hosts construct one with the
/// release action for their environment; hosts with nothing to release use
/// [`inert`](UnloadRegistration::inert).
pub struct UnloadRegistration {
    release: Option<Box<dyn FnOnce()>>,
}

impl UnloadRegistration {
    /// Creates a registration that runs `release` exactly once, on drop.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Creates a registration with no release action.
    pub fn inert() -> Self {
        Self { release: None }
    }
}

impl Drop for UnloadRegistration {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for UnloadRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnloadRegistration")
            .field("released", &self.release.is_none())
            .finish()
    }
}

/// Host whose registrations are inert.
///
/// The default for sessions built without an explicit host: guard logic
/// still runs, there is just no navigation lifecycle to interpose on.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl UnloadHost for NullHost {
    fn acquire(&self, _interceptor: UnloadInterceptor) -> UnloadRegistration {
        UnloadRegistration::inert()
    }
}

/// Test host that records acquire/release traffic and can fire the
/// navigation event on demand.
///
/// Clones share the same recorded state.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    state: Rc<RefCell<RecordingHostState>>,
}

#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default)]
struct RecordingHostState {
    acquires: usize,
    releases: usize,
    next_id: u64,
    active: Option<(u64, UnloadInterceptor)>,
}

#[cfg(any(test, feature = "testing"))]
impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of acquire calls seen so far.
    pub fn acquires(&self) -> usize {
        self.state.borrow().acquires
    }

    /// Number of releases seen so far.
    pub fn releases(&self) -> usize {
        self.state.borrow().releases
    }

    /// True while an interceptor is registered.
    pub fn has_active(&self) -> bool {
        self.state.borrow().active.is_some()
    }

    /// Simulates the host's navigation-away event.
    ///
    /// Returns the active interceptor's decision, or `None` when no
    /// interceptor is registered.
    pub fn fire(&self) -> Option<UnloadDecision> {
        let interceptor = self
            .state
            .borrow()
            .active
            .as_ref()
            .map(|(_, interceptor)| interceptor.clone());
        // The decision function reads session state; keep the host borrow
        // released while it runs.
        interceptor.map(|i| i.intercept())
    }
}

#[cfg(any(test, feature = "testing"))]
impl UnloadHost for RecordingHost {
    fn acquire(&self, interceptor: UnloadInterceptor) -> UnloadRegistration {
        let id = {
            let mut state = self.state.borrow_mut();
            state.acquires += 1;
            let id = state.next_id;
            state.next_id += 1;
            state.active = Some((id, interceptor));
            id
        };

        let state = Rc::downgrade(&self.state);
        UnloadRegistration::new(move || {
            if let Some(state) = state.upgrade() {
                let mut state = state.borrow_mut();
                state.releases += 1;
                // Only clear the slot if a newer registration has not
                // replaced this one.
                if state.active.as_ref().is_some_and(|(active_id, _)| *active_id == id) {
                    state.active = None;
                }
            }
        })
    }
}
