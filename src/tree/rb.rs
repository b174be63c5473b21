//! Left-leaning red-black tree over a node arena
//!
//! All restructuring is index reassignment inside the arena: rotations swap
//! child links and colors, and deleting an inner node relinks its in-order
//! successor into the vacated position instead of copying keys between slots.
//! A live node therefore keeps its index until that node itself is deleted.

use super::arena::{Color, Node, NodeArena, NodeIdx, NIL};
use super::iter::Iter;
use crate::error::{Result, SrtError};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::mem;

#[derive(Debug, Clone)]
pub(crate) struct RbTree<K, V> {
    arena: NodeArena<K, V>,
    root: NodeIdx,
}

impl<K, V> RbTree<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            root: NIL,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self {
            arena: NodeArena::with_capacity(capacity)?,
            root: NIL,
        })
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.arena.live()
    }

    #[cfg(test)]
    pub(crate) fn arena(&self) -> &NodeArena<K, V> {
        &self.arena
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> NodeIdx {
        self.root
    }

    pub(crate) fn reserve(&mut self, additional: usize) -> Result<()> {
        self.arena.reserve(additional)
    }

    pub(crate) fn clear(&mut self) {
        self.arena.clear();
        self.root = NIL;
    }

    pub(crate) fn free(&mut self) {
        self.arena.free();
        self.root = NIL;
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.root, self.len())
    }

    pub(crate) fn first(&self) -> Option<&Node<K, V>> {
        let mut h = self.root;
        while self.left(h) != NIL {
            h = self.left(h);
        }
        self.arena.get(h)
    }

    pub(crate) fn last(&self) -> Option<&Node<K, V>> {
        let mut h = self.root;
        while self.right(h) != NIL {
            h = self.right(h);
        }
        self.arena.get(h)
    }

    #[inline]
    fn is_red(&self, h: NodeIdx) -> bool {
        h != NIL && self.arena.node(h).color == Color::Red
    }

    #[inline]
    fn left(&self, h: NodeIdx) -> NodeIdx {
        if h == NIL {
            NIL
        } else {
            self.arena.node(h).left
        }
    }

    #[inline]
    fn right(&self, h: NodeIdx) -> NodeIdx {
        if h == NIL {
            NIL
        } else {
            self.arena.node(h).right
        }
    }

    fn rotate_left(&mut self, h: NodeIdx) -> NodeIdx {
        let x = self.arena.node(h).right;
        let x_left = self.arena.node(x).left;
        let h_color = self.arena.node(h).color;

        let hn = self.arena.node_mut(h);
        hn.right = x_left;
        hn.color = Color::Red;

        let xn = self.arena.node_mut(x);
        xn.left = h;
        xn.color = h_color;
        x
    }

    fn rotate_right(&mut self, h: NodeIdx) -> NodeIdx {
        let x = self.arena.node(h).left;
        let x_right = self.arena.node(x).right;
        let h_color = self.arena.node(h).color;

        let hn = self.arena.node_mut(h);
        hn.left = x_right;
        hn.color = Color::Red;

        let xn = self.arena.node_mut(x);
        xn.right = h;
        xn.color = h_color;
        x
    }

    fn flip_colors(&mut self, h: NodeIdx) {
        let (l, r) = {
            let hn = self.arena.node_mut(h);
            hn.color = hn.color.flip();
            (hn.left, hn.right)
        };
        for child in [l, r] {
            if child != NIL {
                let cn = self.arena.node_mut(child);
                cn.color = cn.color.flip();
            }
        }
    }

    /// Restore the left-leaning shape on the way up
    fn balance(&mut self, mut h: NodeIdx) -> NodeIdx {
        if self.is_red(self.right(h)) && !self.is_red(self.left(h)) {
            h = self.rotate_left(h);
        }
        if self.is_red(self.left(h)) && self.is_red(self.left(self.left(h))) {
            h = self.rotate_right(h);
        }
        if self.is_red(self.left(h)) && self.is_red(self.right(h)) {
            self.flip_colors(h);
        }
        h
    }

    fn move_red_left(&mut self, mut h: NodeIdx) -> NodeIdx {
        self.flip_colors(h);
        if self.is_red(self.left(self.right(h))) {
            let r = self.rotate_right(self.right(h));
            self.arena.node_mut(h).right = r;
            h = self.rotate_left(h);
            self.flip_colors(h);
        }
        h
    }

    fn move_red_right(&mut self, mut h: NodeIdx) -> NodeIdx {
        self.flip_colors(h);
        if self.is_red(self.left(self.left(h))) {
            h = self.rotate_right(h);
            self.flip_colors(h);
        }
        h
    }

    /// Unlink the minimum of the subtree at `h`; returns the new subtree root
    /// and the unlinked node, which stays live in the arena
    fn detach_min(&mut self, mut h: NodeIdx) -> (NodeIdx, NodeIdx) {
        if self.left(h) == NIL {
            return (self.right(h), h);
        }
        if !self.is_red(self.left(h)) && !self.is_red(self.left(self.left(h))) {
            h = self.move_red_left(h);
        }
        let (new_left, min) = self.detach_min(self.left(h));
        self.arena.node_mut(h).left = new_left;
        (self.balance(h), min)
    }
}

impl<K: Ord, V> RbTree<K, V> {
    /// Index of the node holding `key`, or [`NIL`]
    pub(crate) fn find_index<Q>(&self, key: &Q) -> NodeIdx
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut h = self.root;
        while h != NIL {
            let node = self.arena.node(h);
            h = match key.cmp(node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return h,
            };
        }
        NIL
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.arena.get(self.find_index(key))
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let idx = self.find_index(key);
        self.arena.get_mut(idx)
    }

    /// Insert or replace; returns the previous value when the key existed
    pub(crate) fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        let mut previous = None;
        let root = self.insert_at(self.root, key, value, &mut previous)?;
        self.root = root;
        self.arena.node_mut(root).color = Color::Black;
        Ok(previous)
    }

    fn insert_at(&mut self, h: NodeIdx, key: K, value: V, previous: &mut Option<V>) -> Result<NodeIdx> {
        if h == NIL {
            return self.arena.alloc(key, value);
        }
        match key.cmp(&self.arena.node(h).key) {
            Ordering::Less => {
                let l = self.insert_at(self.arena.node(h).left, key, value, previous)?;
                self.arena.node_mut(h).left = l;
            }
            Ordering::Greater => {
                let r = self.insert_at(self.arena.node(h).right, key, value, previous)?;
                self.arena.node_mut(h).right = r;
            }
            Ordering::Equal => {
                *previous = Some(mem::replace(&mut self.arena.node_mut(h).value, value));
            }
        }
        Ok(self.balance(h))
    }

    /// Delete `key`, returning the stored key and value
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.find_index(key) == NIL {
            return None;
        }
        let root = self.root;
        if !self.is_red(self.left(root)) && !self.is_red(self.right(root)) {
            self.arena.node_mut(root).color = Color::Red;
        }
        let mut removed = None;
        self.root = self.delete_at(root, key, &mut removed);
        if self.root != NIL {
            self.arena.node_mut(self.root).color = Color::Black;
        }
        removed
    }

    fn delete_at<Q>(&mut self, mut h: NodeIdx, key: &Q, removed: &mut Option<(K, V)>) -> NodeIdx
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if key.cmp(self.arena.node(h).key.borrow()) == Ordering::Less {
            if !self.is_red(self.left(h)) && !self.is_red(self.left(self.left(h))) {
                h = self.move_red_left(h);
            }
            let l = self.delete_at(self.left(h), key, removed);
            self.arena.node_mut(h).left = l;
        } else {
            if self.is_red(self.left(h)) {
                h = self.rotate_right(h);
            }
            if key.cmp(self.arena.node(h).key.borrow()) == Ordering::Equal && self.right(h) == NIL {
                let l = self.left(h);
                *removed = self.arena.release(h);
                return l;
            }
            if !self.is_red(self.right(h)) && !self.is_red(self.left(self.right(h))) {
                h = self.move_red_right(h);
            }
            if key.cmp(self.arena.node(h).key.borrow()) == Ordering::Equal {
                // relink the successor node in place of h
                let (new_right, min) = self.detach_min(self.right(h));
                let (h_left, h_color) = {
                    let hn = self.arena.node(h);
                    (hn.left, hn.color)
                };
                let mn = self.arena.node_mut(min);
                mn.left = h_left;
                mn.right = new_right;
                mn.color = h_color;
                *removed = self.arena.release(h);
                h = min;
            } else {
                let r = self.delete_at(self.right(h), key, removed);
                self.arena.node_mut(h).right = r;
            }
        }
        self.balance(h)
    }

    /// Verify ordering and balance; returns the black height
    ///
    /// Absent leaves count as one black link, so an empty tree has height 1.
    pub(crate) fn check_invariants(&self) -> Result<usize> {
        if self.is_red(self.root) {
            return Err(SrtError::invalid_data("root link is red"));
        }
        let (count, height) = self.check_node(self.root, None, None)?;
        if count != self.len() {
            return Err(SrtError::invalid_data(format!(
                "{} nodes reachable, {} live",
                count,
                self.len()
            )));
        }
        Ok(height)
    }

    fn check_node(&self, h: NodeIdx, lo: Option<&K>, hi: Option<&K>) -> Result<(usize, usize)> {
        if h == NIL {
            return Ok((0, 1));
        }
        let node = self
            .arena
            .get(h)
            .ok_or_else(|| SrtError::invalid_data(format!("link to vacant slot {}", h)))?;

        if lo.map_or(false, |lo| node.key <= *lo) || hi.map_or(false, |hi| node.key >= *hi) {
            return Err(SrtError::invalid_data(format!("node {} is out of key order", h)));
        }
        if self.is_red(node.right) {
            return Err(SrtError::invalid_data(format!("node {} has a red right link", h)));
        }
        if node.color == Color::Red && self.is_red(node.left) {
            return Err(SrtError::invalid_data(format!("node {} and its left child are both red", h)));
        }

        let (lc, lh) = self.check_node(node.left, lo, Some(&node.key))?;
        let (rc, rh) = self.check_node(node.right, Some(&node.key), hi)?;
        if lh != rh {
            return Err(SrtError::invalid_data(format!(
                "unequal black height below node {}: {} vs {}",
                h, lh, rh
            )));
        }
        let own = usize::from(node.color == Color::Black);
        Ok((lc + rc + 1, lh + own))
    }
}
