//! Time provider abstraction
//!
//! This module provides a [`Clock`] trait that abstracts over time sources,
//! allowing production code to use real system time while tests drive the
//! debounce window with controllable mock time.
//!
//! # Example
//!
//! ```
//! use driftwatch::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let millis = clock.now_millis();
//! let rfc3339 = clock.now_rfc3339();
//! ```

use std::fmt::Debug;
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(any(test, feature = "testing"))]
use std::{cell::Cell, rc::Rc};

/// A time provider for getting current timestamps.
///
/// Sessions read the clock to decide when a debounced recomputation is due,
/// and to stamp log lines. Session state is single-threaded, so the trait
/// carries no `Send`/`Sync` bound.
pub trait Clock: Debug {
    /// Returns the current time as milliseconds since Unix epoch.
    fn now_millis(&self) -> u64;

    /// Returns the current time as an RFC3339-formatted string.
    fn now_rfc3339(&self) -> String;
}

/// Production clock using real system time.
///
/// This is the default clock implementation used in production code.
/// It calls through to [`std::time::SystemTime`] and [`chrono::Utc`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn now_rfc3339(&self) -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

/// Test clock under manual control.
///
/// `ManualClock` never advances on its own: debounce tests assert on exact
/// window boundaries, so time only moves through [`advance`](ManualClock::advance)
/// and [`set`](ManualClock::set). Clones share the same underlying instant,
/// so a test can hand one clone to a session and keep another to drive time.
///
/// # Example
///
/// ```
/// use driftwatch::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1000);
/// let handle = clock.clone();
/// assert_eq!(clock.now_millis(), 1000);
/// handle.advance(99);
/// assert_eq!(clock.now_millis(), 1099);
/// ```
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: Rc<Cell<u64>>,
}

#[cfg(any(test, feature = "testing"))]
impl ManualClock {
    /// Create a new manual clock at the given time in milliseconds.
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Rc::new(Cell::new(millis)),
        }
    }

    /// Advance the clock by the given number of milliseconds.
    pub fn advance(&self, ms: u64) {
        self.millis.set(self.millis.get() + ms);
    }

    /// Set the clock to a specific time in milliseconds.
    pub fn set(&self, ms: u64) {
        self.millis.set(ms);
    }
}

#[cfg(any(test, feature = "testing"))]
impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.millis.get()
    }

    fn now_rfc3339(&self) -> String {
        use chrono::{TimeZone, Utc};
        let millis = self.millis.get();
        let secs = (millis / 1000) as i64;
        let nanos = ((millis % 1000) * 1_000_000) as u32;
        Utc.timestamp_opt(secs, nanos)
            .single()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_else(|| "1970-01-01T00:00:00+00:00".to_string())
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for ManualClock {
    fn default() -> Self {
        // 2024-01-01 00:00:00 UTC
        Self::new(1704067200000)
    }
}
