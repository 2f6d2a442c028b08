//!
//! Driftwatch: snapshot-based change detection for form-like state.
//! This library decides when in-progress edits have diverged from a saved
//! baseline, and turns that verdict into the guards an editing view needs.
//!
//! ## Core Concepts
//!
//! Driftwatch is built around a few key concepts:
//!
//! * **Values (`value::Value`, `value::Map`)**: JSON-like snapshot trees of
//!   primitives, keyed mappings, and lists, captured from application state
//!   directly or through serde.
//! * **Comparison (`compare::equals`, `compare::diff`)**: deep structural
//!   equality with an [`IgnoreSet`] of field names skipped at any depth, and
//!   divergence reporting as dot paths.
//! * **Sessions (`session::Session`)**: a baseline/current pair (or several)
//!   watched for drift, with an eager or debounced recompute strategy.
//! * **Guards**: `save_blocked`, `submit_blocked`, and `cancel_blocked`
//!   derive allow/deny answers for the hosting view's actions from the
//!   change verdict.
//! * **Unload interception (`session::unload`)**: an acquire/release
//!   contract for asking the user before navigating away while changes are
//!   unsaved.
//!
//! ## Example
//!
//! ```
//! use driftwatch::{IgnoreSet, Session};
//! use driftwatch::value::Map;
//!
//! let baseline: Map = [("name", "Ada"), ("city", "Victoria")].into_iter().collect();
//! let mut edited = baseline.clone();
//! edited.set("city", "Vancouver");
//!
//! let session = Session::builder()
//!     .watch(baseline, edited)
//!     .ignore(IgnoreSet::from(["modified"]))
//!     .build();
//!
//! assert!(session.has_changes());
//! assert!(!session.save_blocked());
//! ```

pub mod clock;
pub mod compare;
pub mod constants;
pub mod session;
pub mod value;

/// Re-export the core types for easier access.
pub use clock::{Clock, SystemClock};
pub use compare::{IgnoreSet, diff, equals};
pub use session::{Condition, Session, SessionBuilder, Source, Strategy};
pub use value::{List, Map, Value};

#[cfg(any(test, feature = "testing"))]
pub use clock::ManualClock;

/// Result type used throughout the driftwatch library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the driftwatch library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured value errors from the value module
    #[error(transparent)]
    Value(value::ValueError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Serialize(_) => "serialize",
            Error::Value(_) => "value",
        }
    }

    /// Check if this error is a serialization failure.
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, Error::Serialize(_))
    }

    /// Check if this error is a type mismatch.
    pub fn is_type_error(&self) -> bool {
        match self {
            Error::Value(value_err) => value_err.is_type_error(),
            _ => false,
        }
    }

    /// Check if this error came from snapshot capture.
    pub fn is_capture_error(&self) -> bool {
        match self {
            Error::Value(value_err) => value_err.is_capture_error(),
            _ => false,
        }
    }
}
