//! RawBuf: the growable buffer primitive behind every container
//!
//! `RawBuf` stores `len` elements of a fixed byte width (chosen at run time)
//! in one contiguous allocation and grows it with `realloc`, which can often
//! extend the block in place instead of copying. Small buffers start in an
//! inline area inside the handle itself and spill to the heap on first growth
//! past it.
//!
//! `RawBuf` never interprets element bytes and never runs destructors. Typed
//! wrappers such as [`FastVec`](crate::containers::FastVec) layer element
//! semantics on top.

use super::growth::GrowthPolicy;
use crate::error::{Result, SrtError};
use std::alloc::{self, Layout};
use std::fmt;
use std::mem::{self, MaybeUninit};
use std::ptr::{self, NonNull};
use std::slice;

const INLINE_WORDS: usize = 4;

/// Size in bytes of the inline storage area
pub const INLINE_BYTES: usize = INLINE_WORDS * 8;

/// Largest element alignment the inline area can satisfy
const INLINE_ALIGN: usize = 8;

/// Where a buffer's elements currently live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Transient storage inside the handle (on the caller's stack when the
    /// handle is a local)
    Inline,
    /// Owned heap allocation
    Heap,
}

enum Storage {
    Inline([MaybeUninit<u64>; INLINE_WORDS]),
    Heap(NonNull<u8>),
}

/// Growable buffer of fixed-width elements
pub struct RawBuf {
    storage: Storage,
    elem_size: usize,
    elem_align: usize,
    len: usize,
    cap: usize,
    policy: GrowthPolicy,
}

impl RawBuf {
    /// Create an empty buffer with the default growth policy
    pub fn new(elem_size: usize, elem_align: usize) -> Result<Self> {
        Self::with_policy(elem_size, elem_align, 0, GrowthPolicy::DEFAULT)
    }

    /// Create a buffer with room for at least `capacity` elements
    ///
    /// A capacity hint of 0 defers allocation to the first growth, which then
    /// uses the policy minimum.
    pub fn with_capacity(elem_size: usize, elem_align: usize, capacity: usize) -> Result<Self> {
        Self::with_policy(elem_size, elem_align, capacity, GrowthPolicy::DEFAULT)
    }

    /// Create a buffer with an explicit growth policy
    pub fn with_policy(
        elem_size: usize,
        elem_align: usize,
        capacity: usize,
        policy: GrowthPolicy,
    ) -> Result<Self> {
        if elem_size == 0 {
            return Err(SrtError::invalid_data("element width must be non-zero"));
        }
        if elem_align == 0 || !elem_align.is_power_of_two() {
            return Err(SrtError::invalid_data(format!(
                "element alignment {} is not a power of two",
                elem_align
            )));
        }

        let mut buf = Self {
            storage: Storage::Inline([MaybeUninit::uninit(); INLINE_WORDS]),
            elem_size,
            elem_align,
            len: 0,
            cap: 0,
            policy,
        };
        buf.cap = buf.inline_capacity();

        if capacity > buf.cap {
            buf.grow_to(capacity)?;
        }
        Ok(buf)
    }

    /// Create an empty buffer laid out for values of type `T`
    ///
    /// Zero-sized types are given a one-byte slot so capacity accounting
    /// stays uniform.
    pub fn for_type<T>(policy: GrowthPolicy) -> Self {
        let mut buf = Self {
            storage: Storage::Inline([MaybeUninit::uninit(); INLINE_WORDS]),
            elem_size: mem::size_of::<T>().max(1),
            elem_align: mem::align_of::<T>(),
            len: 0,
            cap: 0,
            policy,
        };
        buf.cap = buf.inline_capacity();
        buf
    }

    /// Element capacity of the inline area for this element layout
    #[inline]
    fn inline_capacity(&self) -> usize {
        if self.policy.inline() && self.elem_align <= INLINE_ALIGN {
            INLINE_BYTES / self.elem_size
        } else {
            0
        }
    }

    /// Number of elements stored
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the buffer holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Capacity in elements
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Element width in bytes
    #[inline]
    pub fn elem_size(&self) -> usize {
        self.elem_size
    }

    /// Element alignment in bytes
    #[inline]
    pub fn elem_align(&self) -> usize {
        self.elem_align
    }

    /// Growth policy in effect
    #[inline]
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Current storage mode
    #[inline]
    pub fn storage_mode(&self) -> StorageMode {
        match self.storage {
            Storage::Inline(_) => StorageMode::Inline,
            Storage::Heap(_) => StorageMode::Heap,
        }
    }

    /// Pointer to the first element
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        match &self.storage {
            Storage::Inline(words) => words.as_ptr() as *const u8,
            Storage::Heap(ptr) => ptr.as_ptr(),
        }
    }

    /// Mutable pointer to the first element
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        match &mut self.storage {
            Storage::Inline(words) => words.as_mut_ptr() as *mut u8,
            Storage::Heap(ptr) => ptr.as_ptr(),
        }
    }

    /// Stored elements as raw bytes
    ///
    /// Only meaningful for element types without padding; typed wrappers with
    /// arbitrary `T` go through `as_ptr` instead.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        // SAFETY: the first len * elem_size bytes were written by push/extend
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len * self.elem_size) }
    }

    /// Stored elements as mutable raw bytes
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        let n = self.len * self.elem_size;
        // SAFETY: see `bytes`
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), n) }
    }

    /// Byte view of element `index`
    #[inline]
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        if index >= self.len {
            return None;
        }
        let start = index * self.elem_size;
        Some(&self.bytes()[start..start + self.elem_size])
    }

    /// Mutable byte view of element `index`
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        if index >= self.len {
            return None;
        }
        let size = self.elem_size;
        let start = index * size;
        Some(&mut self.bytes_mut()[start..start + size])
    }

    /// Set the logical length
    ///
    /// # Safety
    ///
    /// `new_len <= capacity()` and the first `new_len` elements must be
    /// initialized.
    #[inline]
    pub unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= self.cap);
        self.len = new_len;
    }

    /// Reserve space for at least `additional` more elements
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or_else(|| SrtError::out_of_memory(usize::MAX))?;
        self.ensure_capacity(required)
    }

    /// Ensure the buffer can hold `needed` elements
    ///
    /// Grows geometrically according to the policy; existing elements keep
    /// their order. Never lowers the capacity.
    #[inline]
    pub fn ensure_capacity(&mut self, needed: usize) -> Result<()> {
        if needed <= self.cap {
            return Ok(());
        }
        let target = self
            .policy
            .next_capacity(self.cap, needed, self.elem_size)
            .ok_or_else(|| SrtError::out_of_memory(usize::MAX))?;
        self.grow_to(target)
    }

    fn layout_for(&self, cap: usize) -> Result<Layout> {
        let size = cap
            .checked_mul(self.elem_size)
            .ok_or_else(|| SrtError::out_of_memory(usize::MAX))?;
        Layout::from_size_align(size, self.elem_align).map_err(|_| SrtError::out_of_memory(size))
    }

    #[cold]
    #[inline(never)]
    fn grow_to(&mut self, new_cap: usize) -> Result<()> {
        if new_cap <= self.cap {
            return Ok(());
        }
        let new_layout = self.layout_for(new_cap)?;

        let new_ptr = match self.storage {
            Storage::Heap(ptr) => {
                let old_layout = self.layout_for(self.cap)?;
                // SAFETY: ptr was allocated with old_layout; the alignment is
                // unchanged and the new size is non-zero
                unsafe { alloc::realloc(ptr.as_ptr(), old_layout, new_layout.size()) }
            }
            Storage::Inline(_) => {
                // SAFETY: new_cap > 0 and elem_size > 0, so the layout is non-zero
                let fresh = unsafe { alloc::alloc(new_layout) };
                if !fresh.is_null() && self.len > 0 {
                    // SAFETY: the inline area holds len initialized elements
                    unsafe {
                        ptr::copy_nonoverlapping(self.as_ptr(), fresh, self.len * self.elem_size)
                    };
                }
                fresh
            }
        };

        let new_ptr = NonNull::new(new_ptr).ok_or_else(|| SrtError::out_of_memory(new_layout.size()))?;
        log::trace!(
            "buffer grow: {} -> {} elements of {} bytes ({:?})",
            self.cap,
            new_cap,
            self.elem_size,
            self.storage_mode()
        );
        self.storage = Storage::Heap(new_ptr);
        self.cap = new_cap;
        Ok(())
    }

    /// Append one element given as exactly `elem_size` bytes
    pub fn push_bytes(&mut self, elem: &[u8]) -> Result<()> {
        if elem.len() != self.elem_size {
            return Err(SrtError::invalid_data(format!(
                "element is {} bytes, buffer width is {}",
                elem.len(),
                self.elem_size
            )));
        }
        self.extend_from_bytes(elem)
    }

    /// Append whole elements from a byte slice whose length is a multiple of
    /// the element width
    pub fn extend_from_bytes(&mut self, data: &[u8]) -> Result<()> {
        if data.len() % self.elem_size != 0 {
            return Err(SrtError::invalid_data(format!(
                "{} bytes is not a whole number of {}-byte elements",
                data.len(),
                self.elem_size
            )));
        }
        let count = data.len() / self.elem_size;
        self.reserve(count)?;
        // SAFETY: capacity for len + count elements was reserved above and the
        // source cannot overlap storage we hold exclusively
        unsafe {
            let dst = self.as_mut_ptr().add(self.len * self.elem_size);
            ptr::copy_nonoverlapping(data.as_ptr(), dst, data.len());
        }
        self.len += count;
        Ok(())
    }

    /// Remove the last element, copying its bytes into `out`
    ///
    /// Returns `false` when the buffer is empty. `out` must be exactly
    /// `elem_size` bytes.
    pub fn pop_into(&mut self, out: &mut [u8]) -> bool {
        if self.len == 0 || out.len() != self.elem_size {
            return false;
        }
        self.len -= 1;
        let start = self.len * self.elem_size;
        // SAFETY: element `len` (after decrement) is initialized and in bounds
        unsafe {
            ptr::copy_nonoverlapping(self.as_ptr().add(start), out.as_mut_ptr(), self.elem_size);
        }
        true
    }

    /// Shorten the buffer to `new_len` elements without touching capacity
    #[inline]
    pub fn truncate(&mut self, new_len: usize) {
        if new_len < self.len {
            self.len = new_len;
        }
    }

    /// Remove all elements, keeping the allocation
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Release unused capacity
    ///
    /// This is one of the two operations (with [`free`](Self::free)) that may
    /// lower the capacity. Contents that fit the inline area move back there.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        let ptr = match self.storage {
            Storage::Inline(_) => return Ok(()),
            Storage::Heap(ptr) => ptr,
        };
        if self.len == self.cap {
            return Ok(());
        }

        let old_layout = self.layout_for(self.cap)?;
        let inline_cap = self.inline_capacity();
        if self.len <= inline_cap {
            let mut words = [MaybeUninit::<u64>::uninit(); INLINE_WORDS];
            // SAFETY: len * elem_size <= INLINE_BYTES and the heap block holds
            // len initialized elements
            unsafe {
                ptr::copy_nonoverlapping(
                    ptr.as_ptr(),
                    words.as_mut_ptr() as *mut u8,
                    self.len * self.elem_size,
                );
                alloc::dealloc(ptr.as_ptr(), old_layout);
            }
            self.storage = Storage::Inline(words);
            self.cap = inline_cap;
            return Ok(());
        }

        let new_layout = self.layout_for(self.len)?;
        // SAFETY: ptr was allocated with old_layout; the new size is non-zero
        let new_ptr = unsafe { alloc::realloc(ptr.as_ptr(), old_layout, new_layout.size()) };
        let new_ptr = NonNull::new(new_ptr).ok_or_else(|| SrtError::out_of_memory(new_layout.size()))?;
        log::trace!("buffer shrink: {} -> {} elements", self.cap, self.len);
        self.storage = Storage::Heap(new_ptr);
        self.cap = self.len;
        Ok(())
    }

    /// Release the storage and reset to an empty buffer
    ///
    /// Elements are not dropped; typed owners must drop them first.
    pub fn free(&mut self) {
        self.release_heap();
        self.storage = Storage::Inline([MaybeUninit::uninit(); INLINE_WORDS]);
        self.len = 0;
        self.cap = self.inline_capacity();
    }

    fn release_heap(&mut self) {
        if let Storage::Heap(ptr) = self.storage {
            if let Ok(layout) = self.layout_for(self.cap) {
                // SAFETY: ptr was allocated with this layout
                unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
            }
        }
    }

    /// Copy the buffer, contents included
    ///
    /// Only valid for element types whose bytes can be duplicated freely
    /// (bytes, plain integers, opaque records).
    pub fn try_clone(&self) -> Result<Self> {
        let mut copy = Self::with_policy(self.elem_size, self.elem_align, self.len, self.policy)?;
        copy.extend_from_bytes(self.bytes())?;
        Ok(copy)
    }

    /// Exchange contents with another buffer
    #[inline]
    pub fn swap(&mut self, other: &mut RawBuf) {
        mem::swap(self, other);
    }
}

impl Drop for RawBuf {
    fn drop(&mut self) {
        self.release_heap();
    }
}

impl fmt::Debug for RawBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuf")
            .field("elem_size", &self.elem_size)
            .field("len", &self.len)
            .field("cap", &self.cap)
            .field("storage", &self.storage_mode())
            .finish()
    }
}

// Safety: RawBuf exclusively owns its allocation and holds no shared state;
// typed owners add PhantomData to restrict auto traits by element type
unsafe impl Send for RawBuf {}
unsafe impl Sync for RawBuf {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::GrowthStrategy;

    #[test]
    fn test_new() {
        let buf = RawBuf::new(4, 4).unwrap();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.capacity(), INLINE_BYTES / 4);
        assert_eq!(buf.storage_mode(), StorageMode::Inline);
    }

    #[test]
    fn test_invalid_widths() {
        assert!(RawBuf::new(0, 1).is_err());
        assert!(RawBuf::new(4, 3).is_err());
        assert!(RawBuf::new(4, 0).is_err());
    }

    #[test]
    fn test_push_pop_bytes() {
        let mut buf = RawBuf::new(2, 1).unwrap();
        buf.push_bytes(&[1, 2]).unwrap();
        buf.push_bytes(&[3, 4]).unwrap();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.get(1), Some(&[3u8, 4][..]));
        assert_eq!(buf.get(2), None);

        let mut out = [0u8; 2];
        assert!(buf.pop_into(&mut out));
        assert_eq!(out, [3, 4]);
        assert!(buf.pop_into(&mut out));
        assert!(!buf.pop_into(&mut out));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_wrong_width_rejected() {
        let mut buf = RawBuf::new(4, 4).unwrap();
        assert!(buf.push_bytes(&[1, 2, 3]).is_err());
        assert!(buf.extend_from_bytes(&[0; 6]).is_err());
        let mut out = [0u8; 3];
        buf.push_bytes(&[1, 2, 3, 4]).unwrap();
        assert!(!buf.pop_into(&mut out));
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_spill_to_heap_preserves_contents() {
        let mut buf = RawBuf::new(1, 1).unwrap();
        let data: Vec<u8> = (0..100u8).collect();
        for chunk in data.chunks(7) {
            buf.extend_from_bytes(chunk).unwrap();
        }
        assert_eq!(buf.storage_mode(), StorageMode::Heap);
        assert_eq!(buf.bytes(), &data[..]);
    }

    #[test]
    fn test_capacity_monotonic() {
        let mut buf = RawBuf::new(8, 8).unwrap();
        let mut last = buf.capacity();
        for i in 0..5000u64 {
            buf.push_bytes(&i.to_ne_bytes()).unwrap();
            assert!(buf.capacity() >= last);
            assert!(buf.capacity() >= buf.len());
            last = buf.capacity();
        }
    }

    #[test]
    fn test_with_capacity_hint() {
        let buf = RawBuf::with_capacity(8, 8, 1000).unwrap();
        assert!(buf.capacity() >= 1000);
        assert_eq!(buf.storage_mode(), StorageMode::Heap);
    }

    #[test]
    fn test_shrink_to_fit() {
        let mut buf = RawBuf::with_capacity(1, 1, 1000).unwrap();
        buf.extend_from_bytes(&[7u8; 100]).unwrap();
        buf.shrink_to_fit().unwrap();
        assert_eq!(buf.capacity(), 100);
        assert_eq!(buf.bytes(), &[7u8; 100][..]);

        buf.truncate(10);
        buf.shrink_to_fit().unwrap();
        assert_eq!(buf.storage_mode(), StorageMode::Inline);
        assert_eq!(buf.bytes(), &[7u8; 10][..]);
    }

    #[test]
    fn test_free_resets() {
        let mut buf = RawBuf::with_capacity(4, 4, 512).unwrap();
        buf.extend_from_bytes(&[1u8; 64]).unwrap();
        buf.free();
        assert!(buf.is_empty());
        assert_eq!(buf.storage_mode(), StorageMode::Inline);
        buf.push_bytes(&[9, 9, 9, 9]).unwrap();
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_no_inline_policy() {
        let policy = GrowthPolicy::new(GrowthStrategy::GoldenRatio, 0, false);
        let mut buf = RawBuf::with_policy(1, 1, 0, policy).unwrap();
        assert_eq!(buf.capacity(), 0);
        buf.push_bytes(&[1]).unwrap();
        assert_eq!(buf.storage_mode(), StorageMode::Heap);
    }

    #[test]
    fn test_large_alignment_skips_inline() {
        let buf = RawBuf::new(16, 16).unwrap();
        assert_eq!(buf.capacity(), 0);
    }

    #[test]
    fn test_try_clone_and_move() {
        let mut buf = RawBuf::new(1, 1).unwrap();
        buf.extend_from_bytes(b"inline").unwrap();
        let copy = buf.try_clone().unwrap();
        let moved = buf;
        assert_eq!(moved.bytes(), b"inline");
        assert_eq!(copy.bytes(), b"inline");
    }

    #[test]
    fn test_reserve_overflow() {
        let mut buf = RawBuf::new(8, 8).unwrap();
        buf.push_bytes(&[0; 8]).unwrap();
        assert!(buf.reserve(usize::MAX).is_err());
    }
}
