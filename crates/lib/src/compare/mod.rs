//! Structural equality and divergence reporting for snapshots.
//!
//! This module answers the one question the rest of the crate is built
//! around: has a piece of form state drifted from its baseline? It provides:
//!
//! - [`IgnoreSet`] - field names excluded from comparison at any depth
//! - [`equals`] - deep structural equality between two [`Value`]s
//! - [`diff`] - the dot paths at which two [`Value`]s diverge
//!
//! # Comparison semantics
//!
//! Comparison is a depth-first walk. Leaves compare by payload, with `Int`
//! and `Float` cross-comparing by numeric value (form state originates from
//! a single JSON number type). A leaf never equals a branch, and a map never
//! equals a list. `Float` NaN is unequal to itself.
//!
//! Maps compare by key set and then per key; a key whose name is in the
//! ignore set is invisible to both the key-count check and the per-key walk,
//! on both sides. Lists are walked as keyed mappings with numeric-string
//! keys, so an ignore entry `"0"` skips element 0 of every list.
//!
//! ```
//! use driftwatch::compare::{equals, IgnoreSet};
//! use driftwatch::value::Map;
//!
//! let a: Map = [("name", "Ada"), ("modified", "2026-01-01")].into_iter().collect();
//! let b: Map = [("name", "Ada"), ("modified", "2026-02-01")].into_iter().collect();
//!
//! let ignore = IgnoreSet::from(["modified"]);
//! assert!(equals(&a.clone().into(), &b.clone().into(), &ignore));
//! assert!(!equals(&a.into(), &b.into(), &IgnoreSet::new()));
//! ```

use std::collections::{BTreeSet, HashSet};

use crate::value::{List, Map, PathBuf, Value};


/// Field names excluded from structural comparison at any nesting depth.
///
/// A key whose name appears here is treated as nonexistent on both sides of
/// a comparison: it does not count toward key-set sizes and its value is
/// never descended into. Typical entries are bookkeeping fields the user
/// does not edit (`"modified"`, `"actions"`, row-version counters).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    names: HashSet<String>,
}

impl IgnoreSet {
    /// Creates an empty ignore set (every field participates).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field name. Returns false if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Returns true if the given field name is ignored.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns the number of ignored field names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no field names are ignored.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// List indices are keys too: `"0"` in the set skips element 0.
    fn contains_index(&self, index: usize) -> bool {
        !self.names.is_empty() && self.names.contains(&index.to_string())
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<const N: usize> From<[&str; N]> for IgnoreSet {
    fn from(names: [&str; N]) -> Self {
        names.into_iter().collect()
    }
}

impl From<&[&str]> for IgnoreSet {
    fn from(names: &[&str]) -> Self {
        names.iter().copied().collect()
    }
}

/// Deeply compares two snapshot values, skipping ignored field names.
///
/// Returns true when `a` and `b` are structurally equivalent outside the
/// ignore set. See the [module docs](self) for the full semantics.
pub fn equals(a: &Value, b: &Value, ignore: &IgnoreSet) -> bool {
    match (a, b) {
        // Leaf identity
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Text(x), Value::Text(y)) => x == y,
        // One numeric type upstream, two here: compare by value. NaN stays
        // unequal to itself.
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => *x as f64 == *y,

        // Branch walks
        (Value::Map(x), Value::Map(y)) => maps_equal(x, y, ignore),
        (Value::List(x), Value::List(y)) => lists_equal(x, y, ignore),

        // Leaf vs branch, or branches of different kind
        _ => false,
    }
}

impl Value {
    /// Deeply compares this value against another, skipping ignored fields.
    ///
    /// Convenience wrapper around [`equals`].
    pub fn structurally_equals(&self, other: &Value, ignore: &IgnoreSet) -> bool {
        equals(self, other, ignore)
    }
}

fn maps_equal(a: &Map, b: &Map, ignore: &IgnoreSet) -> bool {
    // Key-set sizes are compared after filtering the ignore set from BOTH
    // sides, so an ignored key present on only one side cannot flip the
    // verdict.
    let live_keys = |map: &Map| map.keys().filter(|k| !ignore.contains(k)).count();
    if live_keys(a) != live_keys(b) {
        return false;
    }

    for (key, value_a) in a.iter() {
        if ignore.contains(key) {
            continue;
        }
        match b.get(key) {
            Some(value_b) => {
                if !equals(value_a, value_b, ignore) {
                    return false;
                }
            }
            None => return false,
        }
    }

    true
}

fn lists_equal(a: &List, b: &List, ignore: &IgnoreSet) -> bool {
    if ignore.is_empty() {
        // Index walk with no holes; length mismatch is the key-count check.
        return a.len() == b.len()
            && a.iter().zip(b.iter()).all(|(x, y)| equals(x, y, ignore));
    }

    let live_indices = |len: usize| (0..len).filter(|i| !ignore.contains_index(*i)).count();
    if live_indices(a.len()) != live_indices(b.len()) {
        return false;
    }

    for (index, value_a) in a.iter().enumerate() {
        if ignore.contains_index(index) {
            continue;
        }
        match b.get(index) {
            Some(value_b) => {
                if !equals(value_a, value_b, ignore) {
                    return false;
                }
            }
            None => return false,
        }
    }

    true
}

/// Reports the dot paths at which two snapshot values diverge.
///
/// Paths are produced in deterministic walk order (sorted keys for maps,
/// ascending indices for lists). A key present on only one side reports that
/// key's path; values of different kinds report their own path rather than
/// descending. An empty result means `equals(a, b, ignore)` is true.
///
/// ```
/// # use driftwatch::compare::{diff, IgnoreSet};
/// # use driftwatch::value::Map;
/// let a: Map = [("name", "Ada"), ("city", "Victoria")].into_iter().collect();
/// let b: Map = [("name", "Eda"), ("city", "Victoria")].into_iter().collect();
///
/// let paths = diff(&a.into(), &b.into(), &IgnoreSet::new());
/// assert_eq!(paths.len(), 1);
/// assert_eq!(paths[0].as_str(), "name");
/// ```
pub fn diff(a: &Value, b: &Value, ignore: &IgnoreSet) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    diff_at(a, b, ignore, PathBuf::new(), &mut paths);
    paths
}

fn diff_at(a: &Value, b: &Value, ignore: &IgnoreSet, at: PathBuf, out: &mut Vec<PathBuf>) {
    match (a, b) {
        (Value::Map(x), Value::Map(y)) => {
            let keys: BTreeSet<&str> = x.keys().chain(y.keys()).collect();
            for key in keys {
                if ignore.contains(key) {
                    continue;
                }
                let path = at.clone().push(key);
                match (x.get(key), y.get(key)) {
                    (Some(va), Some(vb)) => diff_at(va, vb, ignore, path, out),
                    // Present on one side only
                    _ => out.push(path),
                }
            }
        }
        (Value::List(x), Value::List(y)) => {
            for index in 0..x.len().max(y.len()) {
                if ignore.contains_index(index) {
                    continue;
                }
                let path = at.clone().push(index.to_string());
                match (x.get(index), y.get(index)) {
                    (Some(va), Some(vb)) => diff_at(va, vb, ignore, path, out),
                    _ => out.push(path),
                }
            }
        }
        _ => {
            if !equals(a, b, ignore) {
                out.push(at);
            }
        }
    }
}
