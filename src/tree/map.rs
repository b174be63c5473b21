//! Ordered map keyed by `i32`, `i64` or [`StrBuf`](crate::StrBuf)

use super::arena::{NodeIdx, NIL};
use super::iter::Iter;
use super::key::{KeyKind, TreeKey};
use super::rb::RbTree;
use crate::error::Result;
use std::borrow::Borrow;
use std::fmt;
use std::ops::AddAssign;

/// Ordered map backed by a red-black tree in a node arena
///
/// # Examples
///
/// ```rust
/// use srtlib::IntMap32;
///
/// let mut map = IntMap32::new();
/// assert!(map.insert(5, 50).unwrap());
/// assert!(!map.insert(5, 55).unwrap());
/// assert_eq!(map.lookup(&5), Some(&55));
/// assert!(map.delete(&5));
/// assert_eq!(map.count(), 0);
/// ```
#[derive(Clone)]
pub struct OrderedMap<K: TreeKey, V> {
    tree: RbTree<K, V>,
}

impl<K: TreeKey, V> OrderedMap<K, V> {
    /// Create an empty map
    pub fn new() -> Self {
        Self { tree: RbTree::new() }
    }

    /// Create a map with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            tree: RbTree::with_capacity(capacity)?,
        })
    }

    /// Key kind of this map
    #[inline]
    pub fn key_kind(&self) -> KeyKind {
        K::KIND
    }

    /// Number of entries
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.len()
    }

    /// Number of entries
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Check if the map is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    /// Insert `key` with `value`
    ///
    /// Returns `true` when a new entry was created. An existing key keeps its
    /// node and gets the new value.
    pub fn insert(&mut self, key: K, value: V) -> Result<bool> {
        Ok(self.tree.insert(key, value)?.is_none())
    }

    /// Insert or replace, returning the previous value
    pub fn replace(&mut self, key: K, value: V) -> Result<Option<V>> {
        self.tree.insert(key, value)
    }

    /// Value stored for `key`
    #[inline]
    pub fn lookup<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get(key).map(|node| &node.value)
    }

    /// Mutable value stored for `key`
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get_mut(key).map(|node| &mut node.value)
    }

    /// Check whether `key` is present
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find_index(key) != NIL
    }

    /// Delete `key`; `false` when it was absent
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove_entry(key).is_some()
    }

    /// Delete `key`, returning its value
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove_entry(key).map(|(_, v)| v)
    }

    /// Arena slot index of the node holding `key`
    ///
    /// The index stays valid until that key is deleted.
    pub fn node_index<Q>(&self, key: &Q) -> Option<NodeIdx>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Some(self.tree.find_index(key)).filter(|&idx| idx != NIL)
    }

    /// Entry with the smallest key
    pub fn first(&self) -> Option<(&K, &V)> {
        self.tree.first().map(|node| (&node.key, &node.value))
    }

    /// Entry with the largest key
    pub fn last(&self) -> Option<(&K, &V)> {
        self.tree.last().map(|node| (&node.key, &node.value))
    }

    /// Entries in ascending key order
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    /// Keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.tree.iter().map(|(k, _)| k)
    }

    /// Values in ascending key order
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.tree.iter().map(|(_, v)| v)
    }

    /// Make room for `additional` more entries
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.tree.reserve(additional)
    }

    /// Remove every entry, keeping the arena allocation
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Remove every entry and release the arena
    pub fn free(&mut self) {
        self.tree.free();
    }

    /// Verify the red-black properties; returns the black height
    pub fn check_invariants(&self) -> Result<usize> {
        self.tree.check_invariants()
    }
}

impl<K: TreeKey, V: AddAssign + Copy> OrderedMap<K, V> {
    /// Add `delta` to the value for `key`, inserting `delta` when absent
    ///
    /// Returns `true` when a new entry was created.
    pub fn add_to(&mut self, key: K, delta: V) -> Result<bool> {
        if let Some(value) = self.get_mut(&key) {
            *value += delta;
            return Ok(false);
        }
        self.insert(key, delta)
    }
}

impl<K: TreeKey, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TreeKey + fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K: TreeKey, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
