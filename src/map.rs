//! Ordered map and set types for Transit values.
//!
//! [`TransitMap`] wraps an [`IndexMap`] so entries are written in insertion
//! order. Keys are full [`TransitValue`]s: integers, booleans, keywords and
//! even composite values are allowed, and the writer decides how each key is
//! spelled on the wire.
//!
//! ## Examples
//!
//! ```rust
//! use serde_transit::{TransitMap, TransitValue};
//!
//! let mut map = TransitMap::new();
//! map.insert("name", "Alice");
//! map.insert(1, true);
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get(&TransitValue::from("name")).and_then(|v| v.as_str()), Some("Alice"));
//! ```

use crate::TransitValue;
use indexmap::{IndexMap, IndexSet};
use std::hash::{Hash, Hasher};

/// An insertion-ordered set of Transit values, written under the `set` tag.
pub type TransitSet = IndexSet<TransitValue>;

/// An ordered, key-unique map of Transit values.
///
/// # Examples
///
/// ```rust
/// use serde_transit::{TransitMap, TransitValue};
///
/// let mut map = TransitMap::new();
/// map.insert("first", 1);
/// map.insert("second", 2);
///
/// // Iteration maintains insertion order
/// let keys: Vec<_> = map.keys().filter_map(|k| k.as_str()).collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitMap(IndexMap<TransitValue, TransitValue>);

impl TransitMap {
    /// Creates an empty `TransitMap`.
    #[must_use]
    pub fn new() -> Self {
        TransitMap(IndexMap::new())
    }

    /// Creates an empty `TransitMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        TransitMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the value is replaced in place
    /// (keeping the key's original position) and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_transit::TransitMap;
    ///
    /// let mut map = TransitMap::new();
    /// assert!(map.insert("key", 42).is_none());
    /// assert!(map.insert("key", 43).is_some());
    /// ```
    pub fn insert(
        &mut self,
        key: impl Into<TransitValue>,
        value: impl Into<TransitValue>,
    ) -> Option<TransitValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &TransitValue) -> Option<&TransitValue> {
        self.0.get(key)
    }

    /// Returns `true` if the map contains the key.
    #[must_use]
    pub fn contains_key(&self, key: &TransitValue) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, TransitValue, TransitValue> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, TransitValue, TransitValue> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, TransitValue, TransitValue> {
        self.0.iter()
    }
}

impl Hash for TransitMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
    }
}

impl<'a> IntoIterator for &'a TransitMap {
    type Item = (&'a TransitValue, &'a TransitValue);
    type IntoIter = indexmap::map::Iter<'a, TransitValue, TransitValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for TransitMap {
    type Item = (TransitValue, TransitValue);
    type IntoIter = indexmap::map::IntoIter<TransitValue, TransitValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for TransitMap
where
    K: Into<TransitValue>,
    V: Into<TransitValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        TransitMap(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
