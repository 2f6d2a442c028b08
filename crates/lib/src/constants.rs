//! Constants used throughout the driftwatch library.
//!
//! This module provides central definitions for the default timing bounds of
//! the debounced recompute strategy.

/// Default debounce window in milliseconds: a recompute fires once edits
/// have been quiet for this long.
pub const DEBOUNCE_MS: u64 = 100;

/// Default maximum wait in milliseconds: a burst of continuous edits still
/// forces a recompute this long after the first pending edit.
pub const MAX_WAIT_MS: u64 = 500;
