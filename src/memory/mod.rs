//! Growable storage shared by all containers
//!
//! This module provides [`RawBuf`], the single growable-buffer primitive used
//! by strings, vectors and the tree arena, together with the [`GrowthPolicy`]
//! that decides how its capacity grows.

mod growth;
mod raw_buf;

pub use growth::{GrowthPolicy, GrowthStrategy};
pub use raw_buf::{RawBuf, StorageMode, INLINE_BYTES};
