//! Ordered table type for TOML documents.
//!
//! This module provides [`Table`], a wrapper around [`IndexMap`] that keeps
//! keys in insertion order so that a document written back out lists its keys
//! the way they were read or built.
//!
//! A table also carries an *inline* marker. Decoders that mark inline tables
//! set it for `{ ... }` literals, and encoders that preserve inline tables
//! render marked tables on a single line. The marker is presentation only and
//! does not take part in equality.
//!
//! ## Examples
//!
//! ```rust
//! use typed_toml::{Table, Value};
//!
//! let mut table = Table::new();
//! table.insert("name", Value::from("spam"));
//! table.insert("version", Value::from("2020.0.0"));
//!
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.get("name").and_then(|v| v.as_str()), Some("spam"));
//! ```

use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::ops::Index;

/// An ordered map of string keys to TOML values.
///
/// # Examples
///
/// ```rust
/// use typed_toml::{Table, Value};
///
/// let mut table = Table::new();
/// table.insert("first", Value::from(1));
/// table.insert("second", Value::from(2));
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = table.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Table {
    entries: IndexMap<String, crate::Value>,
    inline: bool,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Table {
            entries: IndexMap::new(),
            inline: false,
        }
    }

    /// Creates an empty table marked for inline rendering.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_toml::Table;
    ///
    /// assert!(Table::new_inline().is_inline());
    /// assert!(!Table::new().is_inline());
    /// ```
    #[must_use]
    pub fn new_inline() -> Self {
        Table {
            entries: IndexMap::new(),
            inline: true,
        }
    }

    /// Creates an empty table with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Table {
            entries: IndexMap::with_capacity(capacity),
            inline: false,
        }
    }

    /// Returns `true` if the table is marked for inline rendering.
    #[inline]
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        self.inline
    }

    /// Sets or clears the inline marker.
    pub fn set_inline(&mut self, inline: bool) {
        self.inline = inline;
    }

    /// Builder form of [`Table::set_inline`].
    #[must_use]
    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    /// Inserts a key-value pair into the table.
    ///
    /// If the table already contained this key, the old value is returned and
    /// the key keeps its original position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use typed_toml::{Table, Value};
    ///
    /// let mut table = Table::new();
    /// assert!(table.insert("key", Value::from(42)).is_none());
    /// assert!(table.insert("key", Value::from(43)).is_some());
    /// ```
    pub fn insert<K: Into<String>>(&mut self, key: K, value: crate::Value) -> Option<crate::Value> {
        self.entries.insert(key.into(), value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.entries.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut crate::Value> {
        self.entries.get_mut(key)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<crate::Value> {
        self.entries.shift_remove(key)
    }

    /// Returns `true` if the table contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over the keys of the table, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::Value> {
        self.entries.keys()
    }

    /// Returns an iterator over the values of the table, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::Value> {
        self.entries.values()
    }

    /// Returns an iterator over the key-value pairs of the table, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.entries.iter()
    }

    /// Returns a mutable iterator over the key-value pairs, in insertion order.
    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, crate::Value> {
        self.entries.iter_mut()
    }
}

// Inline-ness is a rendering hint; two tables with the same entries are equal.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

/// # Panics
///
/// Panics if the key is not present.
impl Index<&str> for Table {
    type Output = crate::Value;

    fn index(&self, key: &str) -> &crate::Value {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key {:?} not found in table", key),
        }
    }
}

impl From<HashMap<String, crate::Value>> for Table {
    fn from(map: HashMap<String, crate::Value>) -> Self {
        map.into_iter().collect()
    }
}

impl From<BTreeMap<String, crate::Value>> for Table {
    fn from(map: BTreeMap<String, crate::Value>) -> Self {
        map.into_iter().collect()
    }
}

impl From<IndexMap<String, crate::Value>> for Table {
    fn from(entries: IndexMap<String, crate::Value>) -> Self {
        Table {
            entries,
            inline: false,
        }
    }
}

impl From<Table> for IndexMap<String, crate::Value> {
    fn from(table: Table) -> Self {
        table.entries
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = (&'a String, &'a crate::Value);
    type IntoIter = indexmap::map::Iter<'a, String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Table {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, crate::Value)> for Table {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        Table {
            entries: IndexMap::from_iter(iter),
            inline: false,
        }
    }
}

impl Extend<(String, crate::Value)> for Table {
    fn extend<T: IntoIterator<Item = (String, crate::Value)>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_equality_ignores_inline_marker() {
        let mut plain = Table::new();
        plain.insert("file", Value::from("LICENSE"));

        let mut inline = Table::new_inline();
        inline.insert("file", Value::from("LICENSE"));

        assert_eq!(plain, inline);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut table = Table::new();
        table.insert("a", Value::from(1));
        table.insert("b", Value::from(2));
        table.insert("c", Value::from(3));

        table.remove("b");
        let keys: Vec<_> = table.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }
}
