//! Comparable snapshot values.
//!
//! This module provides the data model that change detection operates on:
//! JSON-like trees of primitives, keyed mappings, and ordered lists. A
//! snapshot of form state is a [`Map`] at the root with [`Value`]s below it.
//!
//! # Core Types
//!
//! - [`Value`] - any snapshot value, leaf or branch
//! - [`Map`] - a keyed mapping with deterministic iteration order
//! - [`List`] - an ordered collection
//! - [`Path`]/[`PathBuf`] - dot-notation addresses into nested snapshots
//!
//! # Capturing snapshots
//!
//! Snapshots are usually captured from application structs via serde:
//!
//! ```
//! use driftwatch::value::{Map, Value};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Officer {
//!     name: String,
//!     active: bool,
//! }
//!
//! let officer = Officer { name: "Ada".into(), active: true };
//! let snapshot = Map::from_serialize(&officer).unwrap();
//! assert_eq!(snapshot.get("name"), Some(&Value::Text("Ada".into())));
//! ```

use std::{collections::BTreeMap, fmt};

// Submodules
pub mod errors;
pub mod list;
pub mod path;
#[allow(clippy::module_inception)]
pub mod value;

// Convenience re-exports for core value types
pub use errors::ValueError;
pub use list::List;
pub use path::{Path, PathBuf};
pub use value::Value;

/// A keyed mapping of snapshot values.
///
/// `Map` is the root shape of every snapshot and the branch shape for nested
/// objects. Keys iterate in sorted order, which keeps serialization, display,
/// and [`diff`](crate::compare::diff) output deterministic.
///
/// # Examples
///
/// ```
/// # use driftwatch::value::Map;
/// let mut map = Map::new();
/// map.set("name", "Ada");
/// map.set("age", 36);
///
/// assert_eq!(map.get_as::<&str>("name"), Some("Ada"));
/// assert_eq!(map.get_as::<i64>("age"), Some(36));
/// assert_eq!(map.len(), 2);
/// ```
///
/// Nested values are addressed with dot paths:
///
/// ```
/// # use driftwatch::value::{Map, Value};
/// let mut address = Map::new();
/// address.set("city", "Victoria");
///
/// let mut map = Map::new();
/// map.set("address", address);
///
/// assert_eq!(map.get_at("address.city"), Some(&Value::Text("Victoria".into())));
/// ```
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Map {
    entries: BTreeMap<String, Value>,
}

impl Map {
    /// Creates a new empty map
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Returns true if the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of direct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map contains the given direct key
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Gets a value by direct key (immutable reference)
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Gets a mutable reference to a value by direct key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Gets a value by dot path, traversing nested maps and lists.
    ///
    /// List elements are addressed by numeric-string components, so
    /// `"officers.0.name"` reaches into the first element of an
    /// `officers` list.
    pub fn get_at(&self, path: impl AsRef<Path>) -> Option<&Value> {
        let path = path.as_ref();
        let mut components = path.components();

        let first = components.next()?;
        let mut current = self.entries.get(first)?;

        for component in components {
            match current {
                Value::Map(map) => {
                    current = map.entries.get(component)?;
                }
                Value::List(list) => {
                    let index: usize = component.parse().ok()?;
                    current = list.get(index)?;
                }
                _ => return None,
            }
        }

        Some(current)
    }

    /// Gets a value by direct key with automatic type conversion.
    ///
    /// Returns `Some(T)` if the value exists and converts to type `T`,
    /// `None` if the key is absent or the type does not match.
    ///
    /// ```
    /// # use driftwatch::value::Map;
    /// let mut map = Map::new();
    /// map.set("name", "Ada");
    ///
    /// assert_eq!(map.get_as::<&str>("name"), Some("Ada"));
    /// assert_eq!(map.get_as::<i64>("name"), None);
    /// assert_eq!(map.get_as::<&str>("missing"), None);
    /// ```
    pub fn get_as<'a, T>(&'a self, key: &str) -> Option<T>
    where
        T: TryFrom<&'a Value, Error = ValueError>,
    {
        let value = self.get(key)?;
        T::try_from(value).ok()
    }

    /// Sets a value at the given direct key, returning the old value if present
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Removes a key, returning the old value if present
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Returns an iterator over the keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns an iterator over key-value pairs in sorted key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Captures a snapshot from any serializable state.
    ///
    /// The state must serialize to a JSON object at the root; anything else
    /// (a bare number, a sequence) is rejected with
    /// [`ValueError::NonMapRoot`], since change detection compares keyed
    /// form state.
    pub fn from_serialize<T: serde::Serialize>(state: &T) -> crate::Result<Self> {
        match Value::from_serialize(state)? {
            Value::Map(map) => Ok(map),
            other => Err(ValueError::NonMapRoot {
                actual: other.type_name().to_string(),
            }
            .into()),
        }
    }

    /// Converts to a JSON string representation for human-readable output.
    pub fn to_json_string(&self) -> String {
        let mut result = String::with_capacity(self.entries.len() * 16);
        result.push('{');
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                result.push(',');
            }
            result.push('"');
            result.push_str(&key.replace('\\', "\\\\").replace('\"', "\\\""));
            result.push_str("\":");
            result.push_str(&value.to_json_string());
        }
        result.push('}');
        result
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Value {
    /// Captures a snapshot value from any serializable state.
    pub fn from_serialize<T: serde::Serialize>(state: &T) -> crate::Result<Self> {
        Ok(serde_json::to_value(state)?.into())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // Large u64s and all fractional numbers land here
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(Map {
                entries: entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            }),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::Number((*n).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Map(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                    .collect(),
            ),
            Value::List(list) => {
                serde_json::Value::Array(list.iter().map(serde_json::Value::from).collect())
            }
        }
    }
}
