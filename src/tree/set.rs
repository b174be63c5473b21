//! Ordered set: a map with unit values

use super::arena::{NodeIdx, NIL};
use super::key::{KeyKind, TreeKey};
use super::rb::RbTree;
use crate::error::Result;
use std::borrow::Borrow;
use std::fmt;

/// Ordered set backed by a red-black tree in a node arena
///
/// ```rust
/// use srtlib::IntSet32;
///
/// let mut set = IntSet32::new();
/// assert!(set.insert(3).unwrap());
/// assert!(!set.insert(3).unwrap());
/// assert!(set.contains(&3));
/// assert_eq!(set.count(), 1);
/// ```
#[derive(Clone)]
pub struct OrderedSet<K: TreeKey> {
    tree: RbTree<K, ()>,
}

impl<K: TreeKey> OrderedSet<K> {
    /// Create an empty set
    pub fn new() -> Self {
        Self { tree: RbTree::new() }
    }

    /// Create a set with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            tree: RbTree::with_capacity(capacity)?,
        })
    }

    /// Key kind of this set
    #[inline]
    pub fn key_kind(&self) -> KeyKind {
        K::KIND
    }

    /// Number of keys
    #[inline]
    pub fn count(&self) -> usize {
        self.tree.len()
    }

    /// Number of keys
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Check if the set is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    /// Add `key`; `true` when it was not present. A present key is left as is.
    pub fn insert(&mut self, key: K) -> Result<bool> {
        if self.contains(&key) {
            return Ok(false);
        }
        Ok(self.tree.insert(key, ())?.is_none())
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

    /// Delete `key`, returning the stored key
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove_entry(key).map(|(k, _)| k)
    }

    /// Arena slot index of the node holding `key`
    pub fn node_index<Q>(&self, key: &Q) -> Option<NodeIdx>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Some(self.tree.find_index(key)).filter(|&idx| idx != NIL)
    }

    /// Smallest key
    pub fn first(&self) -> Option<&K> {
        self.tree.first().map(|node| &node.key)
    }

    /// Largest key
    pub fn last(&self) -> Option<&K> {
        self.tree.last().map(|node| &node.key)
    }

    /// Keys in ascending order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &K> + '_ {
        self.tree.iter().map(|(k, _)| k)
    }

    /// Make room for `additional` more keys
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.tree.reserve(additional)
    }

    /// Remove every key, keeping the arena allocation
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Remove every key and release the arena
    pub fn free(&mut self) {
        self.tree.free();
    }

    /// Verify the red-black properties; returns the black height
    pub fn check_invariants(&self) -> Result<usize> {
        self.tree.check_invariants()
    }
}

impl<K: TreeKey> Default for OrderedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TreeKey + fmt::Debug> fmt::Debug for OrderedSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::string::StrBuf;
    use crate::tree::{IntSet64, StrSet};

    #[test]
    fn test_set_basics() {
        let mut set = IntSet64::new();
        for k in (0..100i64).rev() {
            assert!(set.insert(k).unwrap());
        }
        assert!(!set.insert(42).unwrap());
        assert_eq!(set.count(), 100);
        assert_eq!(set.first(), Some(&0));
        assert_eq!(set.last(), Some(&99));
        assert!(set.delete(&42));
        assert!(!set.contains(&42));
        assert_eq!(set.iter().len(), 99);
        set.check_invariants().unwrap();
    }

    #[test]
    fn test_existing_key_keeps_node() {
        let mut set = StrSet::new();
        set.insert(StrBuf::from_text("k").unwrap()).unwrap();
        let idx = set.node_index(b"k".as_slice());
        assert!(!set.insert(StrBuf::from_text("k").unwrap()).unwrap());
        assert_eq!(set.node_index(b"k".as_slice()), idx);
        assert_eq!(set.take(b"k".as_slice()).map(|k| k.len()), Some(1));
        assert!(set.is_empty());
        assert_eq!(set.key_kind(), KeyKind::Str);
    }

    #[test]
    fn test_debug_format() {
        let mut set = IntSet64::new();
        set.insert(2).unwrap();
        set.insert(1).unwrap();
        assert_eq!(format!("{:?}", set), "{1, 2}");
    }
}
