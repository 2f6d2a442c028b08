//! Recompute strategies for the change verdict.
//!
//! Deep comparison is O(state size), so a session declares up front how
//! often it pays that cost. The eager strategy recomputes on every read and
//! is always fresh. The debounced strategy caches the verdict and recomputes
//! once edits go quiet, trading a bounded staleness window for not running
//! a full deep comparison on every keystroke.

use crate::constants::{DEBOUNCE_MS, MAX_WAIT_MS};

/// How a session keeps its change verdict up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Recompute on every read. Always fresh; pays a deep comparison per
    /// read.
    Eager,
    /// Cache the verdict and recompute when edits have been quiet for
    /// `debounce_ms`, or `max_wait_ms` after the first un-flushed edit,
    /// whichever comes first. Reads between recomputes may be stale by up
    /// to `max_wait_ms`.
    Debounced { debounce_ms: u64, max_wait_ms: u64 },
}

impl Strategy {
    /// The debounced strategy with the default 100 ms / 500 ms bounds.
    pub fn debounced() -> Self {
        Strategy::Debounced {
            debounce_ms: DEBOUNCE_MS,
            max_wait_ms: MAX_WAIT_MS,
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Eager
    }
}

/// Tracks the pending-edit window for a debounced session.
///
/// `note_edit` records edit times; `due` answers whether a recompute should
/// fire now; `flush` clears the window after one does.
#[derive(Debug)]
pub(crate) struct DebounceWindow {
    debounce_ms: u64,
    max_wait_ms: u64,
    first_edit: Option<u64>,
    last_edit: Option<u64>,
}

impl DebounceWindow {
    pub(crate) fn new(debounce_ms: u64, max_wait_ms: u64) -> Self {
        Self {
            debounce_ms,
            max_wait_ms,
            first_edit: None,
            last_edit: None,
        }
    }

    /// Records an edit at `now`.
    pub(crate) fn note_edit(&mut self, now: u64) {
        self.first_edit.get_or_insert(now);
        self.last_edit = Some(now);
    }

    /// True while edits are waiting to be flushed into a recompute.
    pub(crate) fn is_pending(&self) -> bool {
        self.first_edit.is_some()
    }

    /// True when a recompute is due at `now`.
    pub(crate) fn due(&self, now: u64) -> bool {
        let (Some(first), Some(last)) = (self.first_edit, self.last_edit) else {
            return false;
        };
        now.saturating_sub(last) >= self.debounce_ms
            || now.saturating_sub(first) >= self.max_wait_ms
    }

    /// Clears the window after a recompute.
    pub(crate) fn flush(&mut self) {
        self.first_edit = None;
        self.last_edit = None;
    }
}
