//! Horspool bad-character scan with a work budget

/// Outcome of a budgeted scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Scan {
    /// Match at this offset
    Found(usize),
    /// No match in the rest of the haystack
    Exhausted,
    /// Work budget exceeded; windows before this offset hold no match
    OverBudget(usize),
}

/// Last-occurrence shift table over the byte alphabet
#[derive(Clone)]
pub(super) struct SkipTable {
    shift: [usize; 256],
}

impl SkipTable {
    /// Build the table for a needle of at least two bytes
    pub(super) fn new(needle: &[u8]) -> Self {
        let m = needle.len();
        debug_assert!(m >= 2);
        let mut shift = [m; 256];
        for (i, &b) in needle[..m - 1].iter().enumerate() {
            shift[b as usize] = m - 1 - i;
        }
        Self { shift }
    }

    #[inline]
    pub(super) fn shift(&self, byte: u8) -> usize {
        self.shift[byte as usize]
    }

    /// Scan `haystack[start..]` for `needle`.
    ///
    /// With a `budget`, the scan gives up once the bytes it has verified exceed
    /// `budget * (pos - start) + m`.
    pub(super) fn scan(&self, haystack: &[u8], start: usize, needle: &[u8], budget: Option<usize>) -> Scan {
        let n = haystack.len();
        let m = needle.len();
        if m == 0 || start > n || n - start < m {
            return Scan::Exhausted;
        }
        let last = m - 1;
        let tail_byte = needle[last];
        let end = n - m;

        let mut pos = start;
        let mut work = 0usize;
        while pos <= end {
            let tail = haystack[pos + last];
            if tail == tail_byte {
                work += m;
                if haystack[pos..pos + last] == needle[..last] {
                    return Scan::Found(pos);
                }
            } else {
                work += 1;
            }
            pos += self.shift(tail);

            if let Some(budget) = budget {
                if work > budget.saturating_mul(pos - start).saturating_add(m) {
                    return Scan::OverBudget(pos);
                }
            }
        }
        Scan::Exhausted
    }
}
