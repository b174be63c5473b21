//! RecordVec: vector of opaque fixed-width records
//!
//! The element width is chosen at run time and each element is copied in and
//! out as a block of bytes, so one implementation serves any plain-data record
//! without per-type code.

use crate::error::{Result, SrtError};
use crate::memory::{GrowthPolicy, RawBuf, StorageMode};
use std::fmt;
use std::mem;
use std::ptr;

/// Record alignment used for the backing buffer
const RECORD_ALIGN: usize = 8;

/// Vector of fixed-width byte records
///
/// # Examples
///
/// ```rust
/// use srtlib::RecordVec;
///
/// let mut v = RecordVec::new(4, 0).unwrap();
/// v.push(&[1, 2, 3, 4]).unwrap();
/// assert_eq!(v.at(0), Some(&[1u8, 2, 3, 4][..]));
/// assert!(v.push(&[1, 2]).is_err());
/// ```
pub struct RecordVec {
    buf: RawBuf,
}

impl RecordVec {
    /// Create a vector of `width`-byte records with a capacity hint
    pub fn new(width: usize, capacity: usize) -> Result<Self> {
        Self::with_policy(width, capacity, GrowthPolicy::DEFAULT)
    }

    /// Create a vector with an explicit growth policy
    pub fn with_policy(width: usize, capacity: usize, policy: GrowthPolicy) -> Result<Self> {
        Ok(Self {
            buf: RawBuf::with_policy(width, RECORD_ALIGN.min(width.next_power_of_two()), capacity, policy)?,
        })
    }

    /// Create a vector sized for records of type `T`
    pub fn for_record<T: Copy>(capacity: usize) -> Result<Self> {
        Self::new(mem::size_of::<T>(), capacity)
    }

    /// Record width in bytes
    #[inline]
    pub fn width(&self) -> usize {
        self.buf.elem_size()
    }

    /// Number of records
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the vector is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Capacity in records
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Where the records currently live
    #[inline]
    pub fn storage_mode(&self) -> StorageMode {
        self.buf.storage_mode()
    }

    /// Append a record; `record` must be exactly `width()` bytes
    #[inline]
    pub fn push(&mut self, record: &[u8]) -> Result<()> {
        self.buf.push_bytes(record)
    }

    /// Remove the last record into `out`; `false` when empty
    #[inline]
    pub fn pop_into(&mut self, out: &mut [u8]) -> bool {
        self.buf.pop_into(out)
    }

    /// Remove the last record without copying it out
    pub fn pop_discard(&mut self) -> bool {
        let len = self.buf.len();
        if len == 0 {
            return false;
        }
        self.buf.truncate(len - 1);
        true
    }

    /// Byte view of record `index`
    #[inline]
    pub fn at(&self, index: usize) -> Option<&[u8]> {
        self.buf.get(index)
    }

    /// Mutable byte view of record `index`
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        self.buf.get_mut(index)
    }

    /// Append a typed record by copying its bytes
    ///
    /// # Safety
    ///
    /// `T` must contain no padding bytes. Every stored byte is later
    /// readable through [`at`](Self::at), and padding is uninitialized memory.
    pub unsafe fn push_record<T: Copy>(&mut self, record: &T) -> Result<()> {
        if mem::size_of::<T>() != self.width() {
            return Err(SrtError::invalid_data(format!(
                "record type is {} bytes, vector width is {}",
                mem::size_of::<T>(),
                self.width()
            )));
        }
        self.buf.reserve(1)?;
        let len = self.buf.len();
        // SAFETY: one slot of width bytes was reserved; T is Copy and, per the
        // caller contract, has no padding, so every copied byte is initialized
        unsafe {
            let dst = self.buf.as_mut_ptr().add(len * self.width());
            ptr::copy_nonoverlapping(record as *const T as *const u8, dst, mem::size_of::<T>());
            self.buf.set_len(len + 1);
        }
        Ok(())
    }

    /// Copy out record `index` as a `T`
    ///
    /// # Safety
    ///
    /// The bytes of the record must be a valid `T`, for example because they
    /// were written by [`push_record`](Self::push_record) with the same type.
    pub unsafe fn at_record<T: Copy>(&self, index: usize) -> Option<T> {
        if mem::size_of::<T>() != self.width() {
            return None;
        }
        let bytes = self.buf.get(index)?;
        // SAFETY: the slot holds width == size_of::<T>() bytes that the caller
        // guarantees form a valid T; read_unaligned tolerates the alignment
        Some(unsafe { ptr::read_unaligned(bytes.as_ptr() as *const T) })
    }

    /// Remove all records, keeping the allocation
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Reserve room for `additional` more records
    #[inline]
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.buf.reserve(additional)
    }

    /// Release unused capacity
    #[inline]
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        self.buf.shrink_to_fit()
    }

    /// Release the storage
    #[inline]
    pub fn free(&mut self) {
        self.buf.free();
    }

    /// Iterate over records as byte slices
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.buf.bytes().chunks_exact(self.width())
    }
}

impl fmt::Debug for RecordVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordVec")
            .field("width", &self.width())
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl Clone for RecordVec {
    fn clone(&self) -> Self {
        match self.buf.try_clone() {
            Ok(buf) => Self { buf },
            Err(_) => std::alloc::handle_alloc_error(std::alloc::Layout::new::<u8>()),
        }
    }
}
