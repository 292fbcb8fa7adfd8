//! The property bag threaded through an assembly.
//!
//! [`Props`] maps string keys to JSON values. An assembly starts from an
//! initial bag and shallow-merges every step contribution onto it, so keys
//! are only ever added or overwritten.
//!
//! # Examples
//!
//! ```
//! use assembly::props;
//! use assembly::props::Props;
//!
//! let mut bag = props! { "name" => "World" };
//! bag.merge(props! { "message" => "Hello World", "name" => "Rust" });
//!
//! assert_eq!(bag.len(), 2);
//! assert_eq!(bag.get("name"), Some(&serde_json::json!("Rust")));
//! ```
//!
//! # Merge Laws
//!
//! - **Right precedence**: `a.merged(b)[k] == b[k]` for every key `k` of `b`
//! - **Key preservation**: every key of `a` is a key of `a.merged(b)`
//! - **Left identity**: `Props::new().merged(b) == b`
//! - **Right identity**: `a.merged(Props::new()) == a`

mod props_macro;
mod typed;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PropsError, kind_of};

/// A mapping from string keys to JSON values.
///
/// Merging is shallow: a nested object is replaced wholesale by a
/// contribution carrying the same key, never merged recursively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Props {
    entries: Map<String, Value>,
}

impl Props {
    /// Creates an empty property bag.
    #[inline]
    pub fn new() -> Self {
        Self { entries: Map::new() }
    }

    /// Creates an empty property bag with room for `capacity` entries.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Map::with_capacity(capacity),
        }
    }

    /// Inserts a property, returning the value it replaced.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns the value stored at `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns `true` if a property is stored at `key`.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of properties.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bag has no properties.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the property keys.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over the properties.
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.entries.iter()
    }

    /// Shallow-merges `other` onto this bag.
    ///
    /// Every top-level key of `other` overwrites the key of the same name.
    ///
    /// # Examples
    ///
    /// ```
    /// use assembly::props;
    ///
    /// let mut bag = props! { "x" => 1, "nested" => serde_json::json!({ "a": 1, "b": 2 }) };
    /// bag.merge(props! { "x" => 2, "nested" => serde_json::json!({ "a": 3 }) });
    ///
    /// assert_eq!(bag.get("x"), Some(&serde_json::json!(2)));
    /// assert_eq!(bag.get("nested"), Some(&serde_json::json!({ "a": 3 })));
    /// ```
    pub fn merge(&mut self, other: Self) {
        for (key, value) in other.entries {
            self.entries.insert(key, value);
        }
    }

    /// Returns this bag with `other` shallow-merged onto it.
    #[must_use]
    pub fn merged(mut self, other: Self) -> Self {
        self.merge(other);
        self
    }

    /// Returns the underlying JSON map.
    #[inline]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Consumes the bag, returning the underlying JSON map.
    #[inline]
    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }
}

impl From<Map<String, Value>> for Props {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl From<Props> for Value {
    fn from(props: Props) -> Self {
        Self::Object(props.entries)
    }
}

impl TryFrom<Value> for Props {
    type Error = PropsError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(PropsError::NotAnObject {
                found: kind_of(&other),
            }),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Props
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        props.extend(iter);
        props
    }
}

impl<K, V> Extend<(K, V)> for Props
where
    K: Into<String>,
    V: Into<Value>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Props {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Props {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Props {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(&self.entries).map_err(|_| fmt::Error)?;
        formatter.write_str(&rendered)
    }
}
