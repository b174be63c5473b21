//! # srtlib: Growable Containers, Ordered Trees and Text Search
//!
//! This crate provides a small set of general-purpose building blocks that
//! share one growth implementation:
//!
//! - **Growable storage**: [`RawBuf`] with inline storage for short contents and
//!   a configurable [`GrowthPolicy`]
//! - **Vectors**: [`FastVec`] for integers and fixed-size records,
//!   [`RecordVec`] for records whose width is only known at run time
//! - **Strings**: [`StrBuf`], a byte string that is usually UTF-8, with
//!   substring replacement, bounded formatting and Unicode case conversion
//! - **Ordered maps and sets**: red-black trees whose nodes live in a
//!   [`NodeArena`] and are linked by `u32` indices
//! - **Substring search**: [`Finder`], a Horspool matcher that falls back to a
//!   linear scan on adversarial input
//!
//! ## Quick Start
//!
//! ```rust
//! use srtlib::{format_into, CaseMapper, FastVec, IntMap32, StrBuf, StrMap};
//!
//! let mut vec = FastVec::new();
//! vec.push(7i32).unwrap();
//! assert_eq!(vec.pop(), Some(7));
//!
//! let mut map = IntMap32::new();
//! map.insert(1, 100).unwrap();
//! assert_eq!(map.lookup(&1), Some(&100));
//!
//! let mut key = StrBuf::new();
//! format_into!(key, 64, "{:016}", 42).unwrap();
//! let mut names = StrMap::new();
//! names.insert(key, StrBuf::from_text("answer").unwrap()).unwrap();
//! assert!(names.contains(b"0000000000000042".as_slice()));
//!
//! let mut text = StrBuf::from_text("Hello World").unwrap();
//! CaseMapper::new().to_upper(&mut text).unwrap();
//! assert_eq!(text, "HELLO WORLD");
//! assert_eq!(text.find(0, b"WORLD"), Some(6));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod config;
pub mod containers;
pub mod error;
pub mod memory;
pub mod search;
pub mod string;
pub mod tree;

// Re-export core types
pub use containers::{FastVec, RecordVec};
pub use error::{Result, SrtError};
pub use memory::{GrowthPolicy, GrowthStrategy, RawBuf, StorageMode};
pub use string::{CaseDirection, CaseMapper, StrBuf};

pub use search::{find, Finder, SearchStrategy};

pub use tree::{
    IntMap32, IntMap64, IntSet32, IntSet64, KeyKind, NodeArena, NodeIdx, OrderedMap, OrderedSet,
    StrMap, StrSet, TreeKey,
};

pub use config::{Config, ContainerConfig};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library (currently only logs the version)
pub fn init() {
    log::debug!("Initializing srtlib v{}", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_functionality() {
        init();
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_version_info() {
        assert!(VERSION.contains('.'));
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2);
    }

    #[test]
    fn test_re_exports() {
        let _vec = FastVec::<i32>::new();
        let _str = StrBuf::from_text("test").unwrap();
        let _map = IntMap64::new();
        let _set = StrSet::new();
        let _finder = Finder::new(b"needle");

        let _err = SrtError::invalid_data("test");
        assert!(std::any::type_name::<Result<()>>().contains("SrtError"));
    }

    #[test]
    fn test_multiple_init_calls() {
        init();
        init();
    }
}
