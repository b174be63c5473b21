//! FastVec: typed vector on top of the shared growable buffer
//!
//! `FastVec<T>` keeps the buffer bookkeeping in a [`RawBuf`] whose element
//! width is `size_of::<T>()`, so vectors, strings and the tree arena all share
//! one growth implementation. Growth goes through `realloc`, which can often
//! extend the block in place instead of copying, and short vectors start in
//! the handle's inline area.

use crate::error::{check_bounds, Result, SrtError};
use crate::memory::{GrowthPolicy, RawBuf, StorageMode};
use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut, Index, IndexMut};
use std::ptr;
use std::slice;

/// Growable vector of `T`
///
/// Elements are moved in and out as whole values (a bitwise copy of the
/// element), which works uniformly for integers and any fixed-size record.
///
/// # Examples
///
/// ```rust
/// use srtlib::FastVec;
///
/// let mut vec = FastVec::new();
/// vec.push(42).unwrap();
/// vec.push(84).unwrap();
/// assert_eq!(vec.len(), 2);
/// assert_eq!(vec.at(0), Some(42));
/// assert_eq!(vec.at(2), None);
/// ```
pub struct FastVec<T> {
    buf: RawBuf,
    _marker: PhantomData<T>,
}

impl<T> FastVec<T> {
    /// Create a new empty FastVec
    #[inline]
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::DEFAULT)
    }

    /// Create an empty FastVec using the given growth policy
    #[inline]
    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            buf: RawBuf::for_type::<T>(policy),
            _marker: PhantomData,
        }
    }

    /// Create a FastVec with room for at least `cap` elements
    pub fn with_capacity(cap: usize) -> Result<Self> {
        let mut vec = Self::new();
        vec.buf.ensure_capacity(cap)?;
        Ok(vec)
    }

    /// Create a FastVec with the specified size, filled with the given value
    pub fn with_size(size: usize, value: T) -> Result<Self>
    where
        T: Clone,
    {
        let mut vec = Self::with_capacity(size)?;
        vec.resize(size, value)?;
        Ok(vec)
    }

    /// Get the number of elements in the vector
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the vector is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Get the capacity of the vector
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Where the elements currently live
    #[inline]
    pub fn storage_mode(&self) -> StorageMode {
        self.buf.storage_mode()
    }

    /// Get a pointer to the underlying data
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr() as *const T
    }

    /// Get a mutable pointer to the underlying data
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr() as *mut T
    }

    /// Get the vector as a slice
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        if self.is_empty() {
            &[]
        } else {
            // SAFETY: len elements are initialized and the pointer is aligned for T
            unsafe { slice::from_raw_parts(self.as_ptr(), self.len()) }
        }
    }

    /// Get the vector as a mutable slice
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.is_empty() {
            &mut []
        } else {
            let len = self.len();
            // SAFETY: see `as_slice`
            unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), len) }
        }
    }

    /// Reserve space for at least `additional` more elements
    #[inline]
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.buf.reserve(additional)
    }

    /// Ensure the vector has at least the specified capacity
    #[inline]
    pub fn ensure_capacity(&mut self, min_cap: usize) -> Result<()> {
        self.buf.ensure_capacity(min_cap)
    }

    /// Push an element to the end of the vector
    #[inline]
    pub fn push(&mut self, value: T) -> Result<()> {
        let len = self.len();
        if len == self.capacity() {
            self.buf.ensure_capacity(len + 1)?;
        }
        // SAFETY: capacity > len after the check above
        unsafe {
            ptr::write(self.as_mut_ptr().add(len), value);
            self.buf.set_len(len + 1);
        }
        Ok(())
    }

    /// Pop an element from the end of the vector
    ///
    /// Returns `None` when the vector is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        // SAFETY: element len - 1 is initialized; shrinking len first hands
        // ownership of it to the caller
        unsafe {
            self.buf.set_len(len - 1);
            Some(ptr::read(self.as_ptr().add(len - 1)))
        }
    }

    /// Copy out the element at `index`, or `None` when out of range
    #[inline]
    pub fn at(&self, index: usize) -> Option<T>
    where
        T: Copy,
    {
        self.as_slice().get(index).copied()
    }

    /// Overwrite the element at `index`
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.len();
        match self.as_mut_slice().get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(SrtError::out_of_bounds(index, len)),
        }
    }

    /// Reference to the last element
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Insert an element at the specified index
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(SrtError::out_of_bounds(index, len));
        }
        if len == self.capacity() {
            self.buf.ensure_capacity(len + 1)?;
        }
        // SAFETY: capacity > len; the tail is shifted with an overlapping copy
        unsafe {
            let p = self.as_mut_ptr().add(index);
            ptr::copy(p, p.add(1), len - index);
            ptr::write(p, value);
            self.buf.set_len(len + 1);
        }
        Ok(())
    }

    /// Remove and return the element at the specified index
    pub fn remove(&mut self, index: usize) -> Result<T> {
        let len = self.len();
        check_bounds(index, len)?;
        // SAFETY: index < len; the tail is shifted left over the read slot
        unsafe {
            let p = self.as_mut_ptr().add(index);
            let value = ptr::read(p);
            ptr::copy(p.add(1), p, len - index - 1);
            self.buf.set_len(len - 1);
            Ok(value)
        }
    }

    /// Resize the vector to the specified length
    pub fn resize(&mut self, new_len: usize, value: T) -> Result<()>
    where
        T: Clone,
    {
        let len = self.len();
        if new_len > len {
            self.buf.ensure_capacity(new_len)?;
            for i in len..new_len {
                // SAFETY: i < capacity; len is bumped per element so a
                // panicking clone leaves the vector consistent
                unsafe {
                    ptr::write(self.as_mut_ptr().add(i), value.clone());
                    self.buf.set_len(i + 1);
                }
            }
        } else {
            self.truncate(new_len);
        }
        Ok(())
    }

    /// Shorten the vector, dropping the excess elements
    pub fn truncate(&mut self, new_len: usize) {
        let len = self.len();
        if new_len >= len {
            return;
        }
        // SAFETY: elements new_len..len are initialized and no longer reachable
        // once len is lowered
        unsafe {
            self.buf.set_len(new_len);
            let tail = slice::from_raw_parts_mut(self.as_mut_ptr().add(new_len), len - new_len);
            ptr::drop_in_place(tail);
        }
    }

    /// Clear all elements from the vector
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Shrink the capacity to fit the current length
    #[inline]
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        self.buf.shrink_to_fit()
    }

    /// Drop every element and release the storage
    pub fn free(&mut self) {
        self.clear();
        self.buf.free();
    }

    /// Extend the vector with elements from an iterator
    pub fn extend<I>(&mut self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(lower)?;
        for item in iter {
            self.push(item)?;
        }
        Ok(())
    }

    /// Append clones of all elements of a slice
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        self.reserve(items.len())?;
        for item in items {
            let len = self.len();
            // SAFETY: capacity for items.len() more elements was reserved
            unsafe {
                ptr::write(self.as_mut_ptr().add(len), item.clone());
                self.buf.set_len(len + 1);
            }
        }
        Ok(())
    }

    /// Sort the elements in place (unstable)
    #[inline]
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.as_mut_slice().sort_unstable();
    }

    /// Index of the first element equal to `value`
    #[inline]
    pub fn find(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.as_slice().iter().position(|item| item == value)
    }
}

impl<T> Default for FastVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for FastVec<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Deref for FastVec<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T> DerefMut for FastVec<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T> Index<usize> for FastVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for FastVec<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.as_mut_slice()[index]
    }
}

impl<T: fmt::Debug> fmt::Debug for FastVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq> PartialEq for FastVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for FastVec<T> {}

impl<T: Clone> Clone for FastVec<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_policy(self.buf.policy());
        if copy.reserve(self.len()).is_err() {
            alloc::handle_alloc_error(Layout::new::<T>());
        }
        for item in self.as_slice() {
            let len = copy.len();
            // SAFETY: capacity for self.len() elements was reserved
            unsafe {
                ptr::write(copy.as_mut_ptr().add(len), item.clone());
                copy.buf.set_len(len + 1);
            }
        }
        copy
    }
}

impl<'a, T> IntoIterator for &'a FastVec<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}
