//! The unsaved-changes confirmation contract.
//!
//! When a user cancels out of an editing view that has unsaved changes, the
//! session does not render anything itself; it hands the hosting UI a
//! callback through [`ConfirmPrompt::open`]. The UI shows its dialog and, if
//! the user confirms leaving, runs the callback, which releases the
//! session's unload interceptor so the navigation can proceed unprompted.

#[cfg(any(test, feature = "testing"))]
use std::{cell::RefCell, fmt, rc::Rc};

/// A UI surface that can ask the user to confirm discarding unsaved changes.
pub trait ConfirmPrompt {
    /// Opens the confirmation, with the action to run if the user confirms
    /// leaving.
    ///
    /// Implementations that never confirm may simply drop the callback.
    fn open(&self, on_confirm: Box<dyn FnOnce()>);
}

/// Prompt that drops every request.
///
/// The default for sessions built without a prompt: `cancel_blocked` still
/// reports the block, the user just never gets asked.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPrompt;

impl ConfirmPrompt for NullPrompt {
    fn open(&self, _on_confirm: Box<dyn FnOnce()>) {}
}

/// Test prompt that records open calls and replays the user's answer on
/// demand.
///
/// Clones share the same recorded state.
#[cfg(any(test, feature = "testing"))]
#[derive(Clone, Default)]
pub struct RecordingPrompt {
    state: Rc<RefCell<RecordingPromptState>>,
}

#[cfg(any(test, feature = "testing"))]
#[derive(Default)]
struct RecordingPromptState {
    opens: usize,
    pending: Option<Box<dyn FnOnce()>>,
}

#[cfg(any(test, feature = "testing"))]
impl RecordingPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the prompt has been opened.
    pub fn opens(&self) -> usize {
        self.state.borrow().opens
    }

    /// True while a confirmation is awaiting the user's answer.
    pub fn has_pending(&self) -> bool {
        self.state.borrow().pending.is_some()
    }

    /// Simulates the user confirming they want to leave.
    ///
    /// Runs the pending on-confirm action. Returns false when no
    /// confirmation was pending.
    pub fn confirm(&self) -> bool {
        let pending = self.state.borrow_mut().pending.take();
        match pending {
            Some(on_confirm) => {
                // The action touches session state; run it with the prompt
                // borrow released.
                on_confirm();
                true
            }
            None => false,
        }
    }

    /// Simulates the user choosing to keep editing.
    ///
    /// Drops the pending action. Returns false when none was pending.
    pub fn dismiss(&self) -> bool {
        self.state.borrow_mut().pending.take().is_some()
    }
}

#[cfg(any(test, feature = "testing"))]
impl fmt::Debug for RecordingPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("RecordingPrompt")
            .field("opens", &state.opens)
            .field("pending", &state.pending.is_some())
            .finish()
    }
}

#[cfg(any(test, feature = "testing"))]
impl ConfirmPrompt for RecordingPrompt {
    fn open(&self, on_confirm: Box<dyn FnOnce()>) {
        let mut state = self.state.borrow_mut();
        state.opens += 1;
        state.pending = Some(on_confirm);
    }
}
