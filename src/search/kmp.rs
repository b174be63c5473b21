//! Knuth-Morris-Pratt scan, the linear fallback for adversarial inputs

use crate::containers::FastVec;
use crate::error::Result;

/// Prefix-function table for one needle
#[derive(Debug, Clone)]
pub(super) struct FailureTable {
    // border[i]: length of the longest proper border of needle[..=i]
    border: FastVec<usize>,
}

impl FailureTable {
    pub(super) fn build(needle: &[u8]) -> Result<Self> {
        let m = needle.len();
        let mut border = FastVec::with_size(m, 0usize)?;
        let mut k = 0usize;
        for i in 1..m {
            while k > 0 && needle[i] != needle[k] {
                k = border[k - 1];
            }
            if needle[i] == needle[k] {
                k += 1;
            }
            border[i] = k;
        }
        Ok(Self { border })
    }

    /// First occurrence of `needle` at or after `start`
    pub(super) fn scan(&self, haystack: &[u8], start: usize, needle: &[u8]) -> Option<usize> {
        let m = needle.len();
        if m == 0 {
            return (start <= haystack.len()).then_some(start);
        }
        let rest = haystack.get(start..)?;
        let mut q = 0usize;
        for (i, &b) in rest.iter().enumerate() {
            while q > 0 && b != needle[q] {
                q = self.border[q - 1];
            }
            if b == needle[q] {
                q += 1;
            }
            if q == m {
                return Some(start + i + 1 - m);
            }
        }
        None
    }
}
