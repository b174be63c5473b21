//! StrBuf: owned, growable byte string
//!
//! A `StrBuf` is a one-byte-wide [`RawBuf`]. Its contents are treated as UTF-8
//! text where that matters (case conversion, codepoint counts) but are not
//! required to be valid; every operation is defined on arbitrary bytes.

use super::case::{self, CaseMapper};
use super::utf8;
use crate::error::{Result, SrtError};
use crate::memory::{GrowthPolicy, RawBuf, StorageMode};
use crate::search::{self, Finder};
use std::borrow::{Borrow, Cow};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::{self, FromStr};

/// Owned byte string
///
/// # Examples
///
/// ```rust
/// use srtlib::StrBuf;
///
/// let mut s = StrBuf::from_text("Hello").unwrap();
/// s.append_str(", world").unwrap();
/// assert_eq!(s.find(0, b"world"), Some(7));
/// s.to_upper().unwrap();
/// assert_eq!(s.as_str(), Some("HELLO, WORLD"));
/// ```
pub struct StrBuf {
    buf: RawBuf,
}

impl StrBuf {
    /// Create an empty string
    #[inline]
    pub fn new() -> Self {
        Self {
            buf: RawBuf::for_type::<u8>(GrowthPolicy::DEFAULT),
        }
    }

    /// Create an empty string with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_policy(capacity, GrowthPolicy::DEFAULT)
    }

    /// Create an empty string with an explicit growth policy
    pub fn with_policy(capacity: usize, policy: GrowthPolicy) -> Result<Self> {
        Ok(Self {
            buf: RawBuf::with_policy(1, 1, capacity, policy)?,
        })
    }

    /// Create a string holding a copy of `text`
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_bytes(text.as_bytes())
    }

    /// Create a string holding a copy of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut s = Self::with_capacity(bytes.len())?;
        s.buf.extend_from_bytes(bytes)?;
        Ok(s)
    }

    /// Length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the string is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Capacity in bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Growth policy of the backing buffer
    #[inline]
    pub fn policy(&self) -> GrowthPolicy {
        self.buf.policy()
    }

    /// Where the bytes currently live
    #[inline]
    pub fn storage_mode(&self) -> StorageMode {
        self.buf.storage_mode()
    }

    /// Raw contents
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.buf.bytes()
    }

    /// Mutable raw contents
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.buf.bytes_mut()
    }

    /// Contents as `&str` when they are valid UTF-8
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        str::from_utf8(self.as_bytes()).ok()
    }

    /// Contents as text, replacing malformed sequences with U+FFFD
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Number of codepoints, counting each malformed byte as one
    pub fn len_chars(&self) -> usize {
        utf8::count_units(self.as_bytes())
    }

    /// Codepoint index of the unit containing byte offset `byte_pos`
    ///
    /// Used to turn a [`find`](Self::find) result into a character position.
    pub fn find_char_pos(&self, byte_pos: usize) -> usize {
        utf8::unit_index(self.as_bytes(), byte_pos)
    }

    /// Replace the contents with `bytes`, reusing capacity when it suffices
    pub fn assign(&mut self, bytes: &[u8]) -> Result<()> {
        self.buf.clear();
        self.buf.extend_from_bytes(bytes)
    }

    /// Replace the contents with `text`
    #[inline]
    pub fn assign_str(&mut self, text: &str) -> Result<()> {
        self.assign(text.as_bytes())
    }

    /// Append bytes
    #[inline]
    pub fn append(&mut self, bytes: &[u8]) -> Result<()> {
        self.buf.extend_from_bytes(bytes)
    }

    /// Append text
    #[inline]
    pub fn append_str(&mut self, text: &str) -> Result<()> {
        self.append(text.as_bytes())
    }

    /// Append one byte
    #[inline]
    pub fn push_byte(&mut self, byte: u8) -> Result<()> {
        self.buf.extend_from_bytes(&[byte])
    }

    /// Append the UTF-8 encoding of `c`
    #[inline]
    pub fn push_char(&mut self, c: char) -> Result<()> {
        let mut enc = [0u8; 4];
        self.append(c.encode_utf8(&mut enc).as_bytes())
    }

    /// Reserve room for `additional` more bytes
    #[inline]
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.buf.reserve(additional)
    }

    /// Shorten to `len` bytes; no effect when already shorter
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    /// Remove all bytes, keeping the allocation
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Release unused capacity
    #[inline]
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        self.buf.shrink_to_fit()
    }

    /// Release the storage, leaving an empty reusable string
    #[inline]
    pub fn free(&mut self) {
        self.buf.free();
    }

    /// Exchange contents with another string
    #[inline]
    pub fn swap(&mut self, other: &mut StrBuf) {
        self.buf.swap(&mut other.buf);
    }

    /// Byte-lexicographic comparison
    #[inline]
    pub fn compare(&self, other: &StrBuf) -> Ordering {
        self.as_bytes().cmp(other.as_bytes())
    }

    /// First occurrence of `needle` at or after byte offset `start`
    #[inline]
    pub fn find(&self, start: usize, needle: &[u8]) -> Option<usize> {
        search::find(self.as_bytes(), start, needle)
    }

    /// [`find`](Self::find) with a prebuilt [`Finder`]
    #[inline]
    pub fn find_with(&self, start: usize, finder: &Finder<'_>) -> Option<usize> {
        finder.find(self.as_bytes(), start)
    }

    /// Check for a byte prefix
    #[inline]
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.as_bytes().starts_with(prefix)
    }

    /// Check for a byte suffix
    #[inline]
    pub fn ends_with(&self, suffix: &[u8]) -> bool {
        self.as_bytes().ends_with(suffix)
    }

    /// Copy of the byte range `start..start + len`, clamped to the contents
    pub fn substr(&self, start: usize, len: usize) -> Result<StrBuf> {
        let bytes = self.as_bytes();
        let start = start.min(bytes.len());
        let end = start.saturating_add(len).min(bytes.len());
        let mut out = Self::with_policy(end - start, self.policy())?;
        out.append(&bytes[start..end])?;
        Ok(out)
    }

    /// Replace every non-overlapping occurrence of `pattern`
    ///
    /// Returns the number of replacements. An empty pattern replaces nothing.
    pub fn replace_all(&mut self, pattern: &[u8], replacement: &[u8]) -> Result<usize> {
        if pattern.is_empty() {
            return Ok(0);
        }
        let finder = Finder::new(pattern);
        if finder.find(self.as_bytes(), 0).is_none() {
            return Ok(0);
        }
        let mut out = Self::with_policy(self.len(), self.policy())?;
        let mut copied = 0;
        let mut count = 0;
        for pos in finder.find_iter(self.as_bytes()) {
            out.append(&self.as_bytes()[copied..pos])?;
            out.append(replacement)?;
            copied = pos + pattern.len();
            count += 1;
        }
        out.append(&self.as_bytes()[copied..])?;
        self.swap(&mut out);
        Ok(count)
    }

    /// Convert to lowercase in place with the default case mapper
    #[inline]
    pub fn to_lower(&mut self) -> Result<()> {
        CaseMapper::new().to_lower(self)
    }

    /// Convert to uppercase in place with the default case mapper
    #[inline]
    pub fn to_upper(&mut self) -> Result<()> {
        CaseMapper::new().to_upper(self)
    }

    /// Equality under simple case folding
    #[inline]
    pub fn eq_ignore_case(&self, other: &StrBuf) -> bool {
        case::eq_ignore_case(self.as_bytes(), other.as_bytes())
    }
}

impl Default for StrBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StrBuf {
    fn clone(&self) -> Self {
        match self.buf.try_clone() {
            Ok(buf) => Self { buf },
            Err(_) => std::alloc::handle_alloc_error(std::alloc::Layout::new::<u8>()),
        }
    }
}

impl FromStr for StrBuf {
    type Err = SrtError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text(s)
    }
}

impl PartialEq for StrBuf {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for StrBuf {}

impl PartialEq<str> for StrBuf {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for StrBuf {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialOrd for StrBuf {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StrBuf {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Hash for StrBuf {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl Borrow<[u8]> for StrBuf {
    fn borrow(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for StrBuf {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Display for StrBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl fmt::Debug for StrBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StrBuf({:?})", self.to_string_lossy())
    }
}

impl fmt::Write for StrBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_str(s).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    #[test]
    fn test_new_is_inline() {
        let s = StrBuf::new();
        assert!(s.is_empty());
        assert_eq!(s.storage_mode(), StorageMode::Inline);
        assert_eq!(s.capacity(), crate::memory::INLINE_BYTES);
    }

    #[test]
    fn test_assign_reuses_capacity() {
        let mut s = StrBuf::from_text(&"x".repeat(100)).unwrap();
        let cap = s.capacity();
        s.assign(b"short").unwrap();
        assert_eq!(s.as_bytes(), b"short");
        assert_eq!(s.capacity(), cap);
    }

    #[test]
    fn test_append_spills_to_heap() {
        let mut s = StrBuf::new();
        for _ in 0..10 {
            s.append_str("0123456789").unwrap();
        }
        assert_eq!(s.len(), 100);
        assert_eq!(s.storage_mode(), StorageMode::Heap);
        assert!(s.starts_with(b"0123"));
        assert!(s.ends_with(b"789"));
    }

    #[test]
    fn test_compare_is_bytewise() {
        let a = StrBuf::from_text("abc").unwrap();
        let b = StrBuf::from_text("abd").unwrap();
        let c = StrBuf::from_text("ab").unwrap();
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(c.compare(&a), Ordering::Less);
        assert_eq!(a.compare(&a.clone()), Ordering::Equal);
        // byte order, not collation: 'Z' < 'a'
        assert!(StrBuf::from_text("Z").unwrap() < StrBuf::from_text("a").unwrap());
    }

    #[test]
    fn test_find_and_char_pos() {
        let s = StrBuf::from_text("añb愛c").unwrap();
        let pos = s.find(0, "愛".as_bytes()).unwrap();
        assert_eq!(pos, 4);
        assert_eq!(s.find_char_pos(pos), 3);
        assert_eq!(s.find_char_pos(5), 3);
        assert_eq!(s.find_char_pos(6), 3);
        assert_eq!(s.find_char_pos(2), 1);
        assert_eq!(s.find_char_pos(7), 4);
        assert_eq!(s.len_chars(), 5);
        assert_eq!(s.find(5, b"c"), Some(7));
        assert_eq!(s.find(9, b""), None);
    }

    #[test]
    fn test_substr_clamps() {
        let s = StrBuf::from_text("hello world").unwrap();
        assert_eq!(s.substr(6, 5).unwrap(), "world");
        assert_eq!(s.substr(6, 100).unwrap(), "world");
        assert!(s.substr(100, 5).unwrap().is_empty());
    }

    #[test]
    fn test_replace_all() {
        let mut s = StrBuf::from_text("a-b-c-d").unwrap();
        assert_eq!(s.replace_all(b"-", b"--").unwrap(), 3);
        assert_eq!(s, "a--b--c--d");
        assert_eq!(s.replace_all(b"--", b"").unwrap(), 3);
        assert_eq!(s, "abcd");
        assert_eq!(s.replace_all(b"zz", b"y").unwrap(), 0);
        assert_eq!(s.replace_all(b"", b"y").unwrap(), 0);
        assert_eq!(s, "abcd");
    }

    #[test]
    fn test_case_and_eq_ignore_case() {
        let mut s = StrBuf::from_text("Straße Ñ").unwrap();
        let original = s.clone();
        s.to_upper().unwrap();
        assert_eq!(s, "STRAßE Ñ");
        assert!(s.eq_ignore_case(&original));
        s.to_lower().unwrap();
        assert_eq!(s, "straße ñ");
    }

    #[test]
    fn test_invalid_bytes_supported() {
        let s = StrBuf::from_bytes(&[b'a', 0xFF, b'b']).unwrap();
        assert_eq!(s.as_str(), None);
        assert_eq!(s.len_chars(), 3);
        assert_eq!(s.to_string(), "a\u{FFFD}b");
    }

    #[test]
    fn test_hash_matches_bytes() {
        let s = StrBuf::from_text("key").unwrap();
        let mut h1 = DefaultHasher::new();
        s.hash(&mut h1);
        let mut h2 = DefaultHasher::new();
        b"key"[..].hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn test_fmt_write_and_free() {
        use std::fmt::Write;
        let mut s = StrBuf::new();
        write!(s, "{}-{}", 1, "two").unwrap();
        assert_eq!(s, "1-two");
        s.free();
        assert!(s.is_empty());
        s.push_char('愛').unwrap();
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_from_str() {
        let s: StrBuf = "parsed".parse().unwrap();
        assert_eq!(format!("{:?}", s), "StrBuf(\"parsed\")");
    }
}
