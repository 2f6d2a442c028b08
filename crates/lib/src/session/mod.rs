//! Change-detection sessions and task guards.
//!
//! A [`Session`] owns one or more watcher groups, each pairing a baseline
//! snapshot with the state currently being edited, and derives a single
//! `has_changes` verdict from them. The verdict gates three things the
//! hosting view cares about:
//!
//! - whether navigation away should be intercepted ([`Session::init`] /
//!   [`Session::revoke`] and the [`unload`] module),
//! - whether save/submit actions are allowed ([`Session::save_blocked`],
//!   [`Session::submit_blocked`]),
//! - whether cancelling needs an unsaved-changes confirmation
//!   ([`Session::cancel_blocked`] and the [`prompt`] module).
//!
//! # Sources
//!
//! Baseline and current state enter as [`Source`]s: either a fixed
//! [`Value`] captured up front, or a zero-argument accessor resolved before
//! every comparison, for state that lives elsewhere and keeps changing.
//!
//! # Example
//!
//! ```
//! use driftwatch::session::Session;
//! use driftwatch::value::Map;
//!
//! let baseline: Map = [("name", "Ada")].into_iter().collect();
//! let edited = baseline.clone();
//!
//! let session = Session::builder()
//!     .watch(baseline, edited)
//!     .build();
//!
//! assert!(!session.has_changes());
//! assert!(session.save_blocked());
//! ```
//!
//! # Threading
//!
//! Sessions model view-local UI state and are single-threaded by design:
//! handles are cheap `Rc` clones and the types are not `Send` or `Sync`.
//! Accessors run while the session's internal state is borrowed, so they
//! must not call back into their own session.

pub mod prompt;
pub mod strategy;
pub mod unload;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

pub use prompt::{ConfirmPrompt, NullPrompt};
pub use strategy::Strategy;
pub use unload::{NullHost, UnloadDecision, UnloadHost, UnloadInterceptor, UnloadRegistration};

use crate::clock::{Clock, SystemClock};
use crate::compare::{IgnoreSet, diff, equals};
use crate::session::strategy::DebounceWindow;
use crate::value::{Map, PathBuf, Value};

/// A snapshot input: a fixed value, or an accessor resolved on demand.
///
/// Fixed sources suit baselines captured once at view mount. Accessor
/// sources suit live state owned elsewhere; the accessor runs before every
/// comparison, so the session always sees the state as it is now.
#[derive(Clone)]
pub struct Source(SourceKind);

#[derive(Clone)]
enum SourceKind {
    Fixed(Value),
    Getter(Rc<dyn Fn() -> Value>),
}

impl Source {
    /// A source with a fixed value.
    pub fn fixed(value: impl Into<Value>) -> Self {
        Self(SourceKind::Fixed(value.into()))
    }

    /// A source resolved through an accessor before every comparison.
    pub fn getter(accessor: impl Fn() -> Value + 'static) -> Self {
        Self(SourceKind::Getter(Rc::new(accessor)))
    }

    /// Resolves the source and lends the value to `f`.
    fn with_resolved<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        match &self.0 {
            SourceKind::Fixed(value) => f(value),
            SourceKind::Getter(accessor) => f(&accessor()),
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            SourceKind::Fixed(value) => f.debug_tuple("Source::Fixed").field(value).finish(),
            SourceKind::Getter(_) => f.write_str("Source::Getter"),
        }
    }
}

impl From<Value> for Source {
    fn from(value: Value) -> Self {
        Self::fixed(value)
    }
}

impl From<Map> for Source {
    fn from(map: Map) -> Self {
        Self::fixed(map)
    }
}

/// A boolean input: fixed, or an accessor resolved on demand.
///
/// Used for the custom change check and the submit condition.
#[derive(Clone)]
pub struct Condition(ConditionKind);

#[derive(Clone)]
enum ConditionKind {
    Fixed(bool),
    Getter(Rc<dyn Fn() -> bool>),
}

impl Condition {
    /// A condition with a fixed answer.
    pub fn fixed(value: bool) -> Self {
        Self(ConditionKind::Fixed(value))
    }

    /// A condition resolved through an accessor on every evaluation.
    pub fn getter(accessor: impl Fn() -> bool + 'static) -> Self {
        Self(ConditionKind::Getter(Rc::new(accessor)))
    }

    fn resolve(&self) -> bool {
        match &self.0 {
            ConditionKind::Fixed(value) => *value,
            ConditionKind::Getter(accessor) => accessor(),
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            ConditionKind::Fixed(value) => f.debug_tuple("Condition::Fixed").field(value).finish(),
            ConditionKind::Getter(_) => f.write_str("Condition::Getter"),
        }
    }
}

impl From<bool> for Condition {
    fn from(value: bool) -> Self {
        Self::fixed(value)
    }
}

/// One baseline/current pair under watch.
#[derive(Debug, Clone)]
struct WatchGroup {
    initial: Source,
    current: Source,
}

/// Builder for [`Session`].
///
/// Collects watcher groups, the ignore set, optional conditions, the
/// recompute strategy, and collaborator implementations, then builds the
/// session with its verdict already computed.
pub struct SessionBuilder {
    groups: Vec<WatchGroup>,
    ignore: IgnoreSet,
    custom_check: Option<Condition>,
    submit_condition: Option<Condition>,
    strategy: Strategy,
    clock: Rc<dyn Clock>,
    host: Rc<dyn UnloadHost>,
    prompt: Rc<dyn ConfirmPrompt>,
}

impl SessionBuilder {
    /// Creates a builder with no watcher groups, the eager strategy, the
    /// system clock, and inert host/prompt collaborators.
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            ignore: IgnoreSet::new(),
            custom_check: None,
            submit_condition: None,
            strategy: Strategy::default(),
            clock: Rc::new(SystemClock),
            host: Rc::new(NullHost),
            prompt: Rc::new(NullPrompt),
        }
    }

    /// Adds a watcher group. The verdict is true when ANY group's current
    /// state diverges from its baseline.
    pub fn watch(mut self, initial: impl Into<Source>, current: impl Into<Source>) -> Self {
        self.groups.push(WatchGroup {
            initial: initial.into(),
            current: current.into(),
        });
        self
    }

    /// Field names skipped during every group's comparison.
    pub fn ignore(mut self, ignore: impl Into<IgnoreSet>) -> Self {
        self.ignore = ignore.into();
        self
    }

    /// An extra condition ORed into the verdict: the session also counts as
    /// changed while this resolves true.
    pub fn custom_check(mut self, check: impl Into<Condition>) -> Self {
        self.custom_check = Some(check.into());
        self
    }

    /// Overrides `submit_blocked` entirely: submission is allowed exactly
    /// while this resolves true.
    pub fn submit_condition(mut self, condition: impl Into<Condition>) -> Self {
        self.submit_condition = Some(condition.into());
        self
    }

    /// Sets the recompute strategy. Defaults to [`Strategy::Eager`].
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replaces the time source. Debounce windows and log timestamps read
    /// this clock.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Rc::new(clock);
        self
    }

    /// Replaces the unload host that [`Session::init`] acquires its
    /// registration from.
    pub fn unload_host(mut self, host: impl UnloadHost + 'static) -> Self {
        self.host = Rc::new(host);
        self
    }

    /// Replaces the confirmation prompt used by [`Session::cancel_blocked`].
    pub fn prompt(mut self, prompt: impl ConfirmPrompt + 'static) -> Self {
        self.prompt = Rc::new(prompt);
        self
    }

    /// Builds the session.
    ///
    /// The verdict is computed once here, so a session whose current state
    /// still equals its baseline starts with `has_changes()` false.
    pub fn build(self) -> Session {
        let window = match self.strategy {
            Strategy::Eager => None,
            Strategy::Debounced {
                debounce_ms,
                max_wait_ms,
            } => Some(DebounceWindow::new(debounce_ms, max_wait_ms)),
        };

        let mut inner = SessionInner {
            groups: self.groups,
            ignore: self.ignore,
            custom_check: self.custom_check,
            submit_condition: self.submit_condition,
            strategy: self.strategy,
            window,
            verdict: false,
            clock: self.clock,
            host: self.host,
            prompt: self.prompt,
            registration: None,
        };
        inner.verdict = inner.compute();

        debug!(
            has_changes = inner.verdict,
            strategy = ?inner.strategy,
            groups = inner.groups.len(),
            created_at = %inner.clock.now_rfc3339(),
            "change session created"
        );

        Session {
            inner: Rc::new(RefCell::new(inner)),
        }
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct SessionInner {
    groups: Vec<WatchGroup>,
    ignore: IgnoreSet,
    custom_check: Option<Condition>,
    submit_condition: Option<Condition>,
    strategy: Strategy,
    /// Pending-edit tracking; present exactly for the debounced strategy.
    window: Option<DebounceWindow>,
    /// Latest computed verdict. Authoritative for the debounced strategy
    /// between recomputes.
    verdict: bool,
    clock: Rc<dyn Clock>,
    host: Rc<dyn UnloadHost>,
    prompt: Rc<dyn ConfirmPrompt>,
    registration: Option<UnloadRegistration>,
}

impl SessionInner {
    /// One full verdict computation: any group diverged, or the custom
    /// check says changed.
    fn compute(&self) -> bool {
        let state_changes = self.groups.iter().any(|group| {
            group.initial.with_resolved(|initial| {
                group
                    .current
                    .with_resolved(|current| !equals(initial, current, &self.ignore))
            })
        });
        let custom_changes = self
            .custom_check
            .as_ref()
            .map(Condition::resolve)
            .unwrap_or(false);
        state_changes || custom_changes
    }

    fn update_verdict(&mut self, verdict: bool) {
        if verdict != self.verdict {
            self.verdict = verdict;
            debug!(has_changes = verdict, "change verdict updated");
        }
    }
}

/// A change-detection session.
///
/// Handles are cheap clones sharing one underlying session; the last handle
/// to drop releases any live unload registration. See the [module
/// docs](self) for the full contract.
#[derive(Clone)]
pub struct Session {
    inner: Rc<RefCell<SessionInner>>,
}

impl Session {
    /// Starts building a session.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Builds a session watching a single baseline/current pair with all
    /// defaults.
    pub fn new(initial: impl Into<Source>, current: impl Into<Source>) -> Self {
        Self::builder().watch(initial, current).build()
    }

    /// The change verdict.
    ///
    /// Eager sessions recompute here. Debounced sessions first let a due
    /// recompute fire (see [`poll`](Session::poll)), then answer from the
    /// cached verdict, which may lag the very latest edit by up to the
    /// session's max wait.
    pub fn has_changes(&self) -> bool {
        self.poll()
    }

    /// Drives the recompute strategy and returns the current verdict.
    ///
    /// Debounced session owners call this from their event loop; for eager
    /// sessions it is identical to [`has_changes`](Session::has_changes).
    pub fn poll(&self) -> bool {
        Self::current_verdict(&self.inner)
    }

    /// Notes that current state was edited just now.
    ///
    /// Feeds the debounce window of a debounced session. No-op for eager
    /// sessions, so callers can report edits unconditionally.
    pub fn touch(&self) {
        let mut inner = self.inner.borrow_mut();
        let now = inner.clock.now_millis();
        if let Some(window) = inner.window.as_mut() {
            window.note_edit(now);
            trace!(at = now, "edit noted");
        }
    }

    /// Recomputes the verdict immediately, flushing any pending debounce
    /// window, and returns it.
    pub fn force_recompute(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        let verdict = inner.compute();
        inner.update_verdict(verdict);
        if let Some(window) = inner.window.as_mut() {
            window.flush();
        }
        inner.verdict
    }

    /// Registers the unload interceptor with the session's host.
    ///
    /// Idempotent: an existing registration is revoked first, so calling
    /// `init` twice leaves exactly one live registration.
    pub fn init(&self) {
        self.revoke();

        let weak = Rc::downgrade(&self.inner);
        let interceptor = UnloadInterceptor::new(move || match weak.upgrade() {
            Some(inner) => {
                if Session::current_verdict(&inner) {
                    UnloadDecision::Confirm
                } else {
                    UnloadDecision::Proceed
                }
            }
            // Session torn down; nothing left to protect.
            None => UnloadDecision::Proceed,
        });

        let host = self.inner.borrow().host.clone();
        let registration = host.acquire(interceptor);
        self.inner.borrow_mut().registration = Some(registration);
        debug!("unload interceptor acquired");
    }

    /// Releases the unload interceptor.
    ///
    /// Safe to call when nothing is registered, and again after a previous
    /// revoke: both are no-ops.
    pub fn revoke(&self) {
        let registration = self.inner.borrow_mut().registration.take();
        if registration.is_some() {
            debug!("unload interceptor released");
        }
        // Dropping runs the host's release action outside the session
        // borrow.
        drop(registration);
    }

    /// True while an unload registration is live.
    pub fn is_registered(&self) -> bool {
        self.inner.borrow().registration.is_some()
    }

    /// True when saving is disallowed: there is nothing to save.
    pub fn save_blocked(&self) -> bool {
        !self.has_changes()
    }

    /// True when submission is disallowed.
    ///
    /// A configured submit condition decides alone. Otherwise a known
    /// `draft_id` means the baseline was already saved, and drafts submit
    /// without new local changes; a brand-new filing needs at least one
    /// change.
    pub fn submit_blocked(&self, draft_id: Option<&str>) -> bool {
        let submit_condition = self.inner.borrow().submit_condition.clone();
        if let Some(condition) = submit_condition {
            return !condition.resolve();
        }
        if draft_id.is_some() {
            return false;
        }
        !self.has_changes()
    }

    /// True when cancelling must wait for the user's answer.
    ///
    /// With unsaved changes, opens the confirmation prompt and returns
    /// true. The on-confirm action handed to the prompt releases the unload
    /// interceptor so the navigation goes through unprompted. With no
    /// changes, returns false without opening anything.
    pub fn cancel_blocked(&self) -> bool {
        if !Self::current_verdict(&self.inner) {
            return false;
        }

        let prompt = self.inner.borrow().prompt.clone();
        let weak = Rc::downgrade(&self.inner);
        prompt.open(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                let registration = inner.borrow_mut().registration.take();
                drop(registration);
            }
        }));
        debug!("unsaved changes confirmation opened");
        true
    }

    /// The dot paths at which watched state currently diverges from its
    /// baselines, across all groups, sorted and deduplicated.
    ///
    /// Always compares fresh, regardless of strategy: this feeds
    /// change-badge rendering, not the hot verdict path.
    pub fn changed_paths(&self) -> Vec<PathBuf> {
        let inner = self.inner.borrow();
        let mut paths = Vec::new();
        for group in &inner.groups {
            group.initial.with_resolved(|initial| {
                group.current.with_resolved(|current| {
                    paths.extend(diff(initial, current, &inner.ignore));
                })
            });
        }
        paths.sort();
        paths.dedup();
        paths
    }

    /// The session's recompute strategy.
    pub fn strategy(&self) -> Strategy {
        self.inner.borrow().strategy
    }

    fn current_verdict(inner_rc: &Rc<RefCell<SessionInner>>) -> bool {
        let mut inner = inner_rc.borrow_mut();
        match inner.strategy {
            Strategy::Eager => {
                let verdict = inner.compute();
                inner.update_verdict(verdict);
            }
            Strategy::Debounced { .. } => {
                let now = inner.clock.now_millis();
                let due = inner.window.as_ref().is_some_and(|w| w.due(now));
                if due {
                    trace!(at = now, "debounce window elapsed, recomputing");
                    let verdict = inner.compute();
                    inner.update_verdict(verdict);
                    if let Some(window) = inner.window.as_mut() {
                        window.flush();
                    }
                }
            }
        }
        inner.verdict
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Session")
            .field("groups", &inner.groups.len())
            .field("strategy", &inner.strategy)
            .field("verdict", &inner.verdict)
            .field("registered", &inner.registration.is_some())
            .finish()
    }
}
