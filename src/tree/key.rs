//! Key types accepted by ordered maps and sets

use crate::string::StrBuf;

mod sealed {
    pub trait Sealed {}

    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for crate::string::StrBuf {}
}

/// Kind of key stored in a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// 32-bit signed integer, numeric order
    Int32,
    /// 64-bit signed integer, numeric order
    Int64,
    /// Byte string, byte-lexicographic order
    Str,
}

/// Tree key: one of `i32`, `i64` or [`StrBuf`]
///
/// The set is closed; the trait cannot be implemented outside this crate.
pub trait TreeKey: sealed::Sealed + Ord {
    /// Kind tag of this key type
    const KIND: KeyKind;
}

impl TreeKey for i32 {
    const KIND: KeyKind = KeyKind::Int32;
}

impl TreeKey for i64 {
    const KIND: KeyKind = KeyKind::Int64;
}

impl TreeKey for StrBuf {
    const KIND: KeyKind = KeyKind::Str;
}
