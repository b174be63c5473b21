//! Index arena holding tree nodes
//!
//! Nodes live in a [`FastVec`] of slots and refer to each other by `u32`
//! index. Index 0 is reserved as the "absent" link and never names a slot;
//! slot `i` is stored at vector position `i - 1`. Vacant slots form an
//! intrusive free list, so releasing a node never allocates and a freed index
//! is handed out again before the vector grows.

use crate::containers::FastVec;
use crate::error::{Result, SrtError};

/// Node index; [`NIL`] means "no node"
pub type NodeIdx = u32;

/// The absent link
pub const NIL: NodeIdx = 0;

/// Link color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Red link
    Red,
    /// Black link
    Black,
}

impl Color {
    #[inline]
    pub(crate) fn flip(self) -> Self {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }
}

/// Tree node
#[derive(Debug, Clone)]
pub struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: NodeIdx,
    pub(crate) right: NodeIdx,
    pub(crate) color: Color,
}

impl<K, V> Node<K, V> {
    /// The node key
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The node value
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Left child index
    #[inline]
    pub fn left(&self) -> NodeIdx {
        self.left
    }

    /// Right child index
    #[inline]
    pub fn right(&self) -> NodeIdx {
        self.right
    }

    /// Color of the link from the parent
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }
}

#[derive(Debug, Clone)]
enum Slot<K, V> {
    Live(Node<K, V>),
    Vacant { next: NodeIdx },
}

/// Slot arena with an intrusive free list
#[derive(Debug, Clone)]
pub struct NodeArena<K, V> {
    slots: FastVec<Slot<K, V>>,
    free_head: NodeIdx,
    live: usize,
}

impl<K, V> NodeArena<K, V> {
    /// Create an empty arena
    pub fn new() -> Self {
        Self {
            slots: FastVec::new(),
            free_head: NIL,
            live: 0,
        }
    }

    /// Create an arena with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut arena = Self::new();
        arena.reserve(capacity)?;
        Ok(arena)
    }

    /// Number of live nodes
    #[inline]
    pub fn live(&self) -> usize {
        self.live
    }

    /// Number of slots ever handed out (live or vacant)
    #[inline]
    pub fn slots(&self) -> usize {
        self.slots.len()
    }

    /// Slot capacity before the arena grows
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Make room for `additional` more nodes beyond the live ones
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let vacant = self.slots.len() - self.live;
        if additional > vacant {
            self.slots.reserve(additional - vacant)?;
        }
        Ok(())
    }

    /// Store a new red node, reusing a vacant slot when one exists
    pub fn alloc(&mut self, key: K, value: V) -> Result<NodeIdx> {
        let node = Node {
            key,
            value,
            left: NIL,
            right: NIL,
            color: Color::Red,
        };

        if self.free_head != NIL {
            let idx = self.free_head;
            let slot = &mut self.slots[idx as usize - 1];
            self.free_head = match *slot {
                Slot::Vacant { next } => next,
                Slot::Live(_) => return Err(SrtError::invalid_data(format!("free list names live slot {}", idx))),
            };
            *slot = Slot::Live(node);
            self.live += 1;
            return Ok(idx);
        }

        let idx = NodeIdx::try_from(self.slots.len() + 1)
            .map_err(|_| SrtError::out_of_memory(usize::MAX))?;
        if idx == NodeIdx::MAX {
            return Err(SrtError::out_of_memory(usize::MAX));
        }
        self.slots.push(Slot::Live(node))?;
        self.live += 1;
        Ok(idx)
    }

    /// Vacate slot `idx`, returning its key and value
    ///
    /// Returns `None` for [`NIL`], out-of-range or already vacant indices.
    pub fn release(&mut self, idx: NodeIdx) -> Option<(K, V)> {
        if idx == NIL {
            return None;
        }
        let slot = self.slots.get_mut(idx as usize - 1)?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }
        let old = std::mem::replace(slot, Slot::Vacant { next: self.free_head });
        self.free_head = idx;
        self.live -= 1;
        match old {
            Slot::Live(node) => Some((node.key, node.value)),
            Slot::Vacant { .. } => None,
        }
    }

    /// Live node at `idx`
    #[inline]
    pub fn get(&self, idx: NodeIdx) -> Option<&Node<K, V>> {
        if idx == NIL {
            return None;
        }
        match self.slots.get(idx as usize - 1)? {
            Slot::Live(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    /// Mutable live node at `idx`
    #[inline]
    pub fn get_mut(&mut self, idx: NodeIdx) -> Option<&mut Node<K, V>> {
        if idx == NIL {
            return None;
        }
        match self.slots.get_mut(idx as usize - 1)? {
            Slot::Live(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    /// Node linked into the tree; a vacant slot here is a broken link
    #[inline]
    pub(crate) fn node(&self, idx: NodeIdx) -> &Node<K, V> {
        match &self.slots[idx as usize - 1] {
            Slot::Live(node) => node,
            Slot::Vacant { .. } => unreachable!("tree links vacant slot {}", idx),
        }
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, idx: NodeIdx) -> &mut Node<K, V> {
        match &mut self.slots[idx as usize - 1] {
            Slot::Live(node) => node,
            Slot::Vacant { .. } => unreachable!("tree links vacant slot {}", idx),
        }
    }

    /// Drop every node, keeping the allocation
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = NIL;
        self.live = 0;
    }

    /// Drop every node and release the allocation
    pub fn free(&mut self) {
        self.slots.free();
        self.free_head = NIL;
        self.live = 0;
    }

    /// Length of the free list
    pub fn vacant(&self) -> usize {
        let mut count = 0;
        let mut idx = self.free_head;
        while idx != NIL {
            count += 1;
            idx = match self.slots.get(idx as usize - 1) {
                Some(Slot::Vacant { next }) => *next,
                _ => break,
            };
        }
        count
    }
}

impl<K, V> Default for NodeArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
