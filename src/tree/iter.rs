//! In-order iteration without allocation

use super::arena::{NodeArena, NodeIdx, NIL};
use std::iter::FusedIterator;

/// Red-black height never exceeds 2·log2(n + 1), so 64 covers every tree
/// addressable with `u32` indices
const MAX_DEPTH: usize = 64;

/// In-order iterator over `(key, value)` pairs
pub struct Iter<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    stack: [NodeIdx; MAX_DEPTH],
    depth: usize,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(arena: &'a NodeArena<K, V>, root: NodeIdx, len: usize) -> Self {
        let mut iter = Self {
            arena,
            stack: [NIL; MAX_DEPTH],
            depth: 0,
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut h: NodeIdx) {
        let arena = self.arena;
        while let Some(node) = arena.get(h) {
            if self.depth == MAX_DEPTH {
                break;
            }
            self.stack[self.depth] = h;
            self.depth += 1;
            h = node.left;
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.depth == 0 {
            return None;
        }
        self.depth -= 1;
        let arena: &'a NodeArena<K, V> = self.arena;
        let node = arena.get(self.stack[self.depth])?;
        self.push_left_spine(node.right);
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            stack: self.stack,
            depth: self.depth,
            remaining: self.remaining,
        }
    }
}
