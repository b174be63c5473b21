//! Ordered maps and sets
//!
//! Both are left-leaning red-black trees whose nodes live in a [`NodeArena`]
//! and link to each other by `u32` index. Rotations and deletions only rewrite
//! indices and colors, deleted slots are recycled through a free list, and a
//! node keeps its index for as long as its key stays in the tree.
//!
//! Keys come from a closed set ([`TreeKey`]): `i32`, `i64` and
//! [`StrBuf`](crate::StrBuf), compared numerically or byte by byte.

mod arena;
mod iter;
mod key;
mod map;
mod rb;
mod set;

pub use arena::{Color, Node, NodeArena, NodeIdx, NIL};
pub use iter::Iter;
pub use key::{KeyKind, TreeKey};
pub use map::OrderedMap;
pub use set::OrderedSet;

use crate::string::StrBuf;

/// `i32` to `i32` map
pub type IntMap32 = OrderedMap<i32, i32>;
/// `i64` to `i64` map
pub type IntMap64 = OrderedMap<i64, i64>;
/// String to string map
pub type StrMap = OrderedMap<StrBuf, StrBuf>;
/// Set of `i32`
pub type IntSet32 = OrderedSet<i32>;
/// Set of `i64`
pub type IntSet64 = OrderedSet<i64>;
/// Set of strings
pub type StrSet = OrderedSet<StrBuf>;
