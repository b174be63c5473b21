//! Substring search over raw bytes
//!
//! Matching works on bytes: valid UTF-8 is self-synchronizing, so a byte match
//! of a UTF-8 needle is always a codepoint-aligned match in UTF-8 text.
//!
//! Two strategies are chosen by needle length:
//!
//! - **Short** needles (up to [`SearchConfig::short_needle_max`] bytes) use a
//!   direct scan driven by the first needle byte.
//! - **Longer** needles use a Horspool bad-character skip table. Horspool alone
//!   degrades to O(n·m) on repetitive near-miss inputs, so the scan counts the
//!   bytes it verifies and, once that exceeds
//!   [`SearchConfig::fallback_budget`] per scanned byte, finishes with a
//!   Knuth-Morris-Pratt scan from the current window. The worst case is
//!   therefore O(n + m).
//!
//! # Examples
//!
//! ```rust
//! use srtlib::search::{find, Finder};
//!
//! assert_eq!(find(b"11111111111111111112k1", 0, b"1111111112k1"), Some(10));
//!
//! let finder = Finder::new(b"ab");
//! let hits: Vec<usize> = finder.find_iter(b"abxabab").collect();
//! assert_eq!(hits, vec![0, 3, 5]);
//! ```

mod horspool;
mod kmp;

use crate::config::SearchConfig;
use crate::error::Result;
use horspool::{Scan, SkipTable};
use kmp::FailureTable;
use once_cell::unsync::OnceCell;
use std::fmt;

/// Strategy picked for a needle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Direct first-byte scan
    Short,
    /// Horspool skip table with the linear fallback
    Horspool,
}

#[derive(Clone)]
enum Matcher {
    Short,
    Horspool(SkipTable),
}

/// Find the first occurrence of `needle` in `haystack` at or after `start`.
///
/// An empty needle matches at `start` as long as `start <= haystack.len()`.
/// Returns `None` when `start` is past the end or the needle does not fit in
/// the remaining bytes.
#[inline]
pub fn find(haystack: &[u8], start: usize, needle: &[u8]) -> Option<usize> {
    Finder::new(needle).find(haystack, start)
}

/// Precomputed searcher for one needle
///
/// Building a `Finder` once and reusing it avoids rebuilding the skip table on
/// every search. The linear-fallback table is built lazily the first time a
/// search needs it and cached afterwards.
#[derive(Clone)]
pub struct Finder<'n> {
    needle: &'n [u8],
    matcher: Matcher,
    budget: usize,
    failure: OnceCell<FailureTable>,
}

impl<'n> Finder<'n> {
    /// Create a finder with the default configuration
    pub fn new(needle: &'n [u8]) -> Self {
        Self::build(needle, &SearchConfig::DEFAULT)
    }

    /// Create a finder with an explicit configuration
    pub fn with_config(needle: &'n [u8], config: &SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(needle, config))
    }

    fn build(needle: &'n [u8], config: &SearchConfig) -> Self {
        let matcher = if needle.len() <= config.short_needle_max.max(1) {
            Matcher::Short
        } else {
            Matcher::Horspool(SkipTable::new(needle))
        };
        Self {
            needle,
            matcher,
            budget: config.fallback_budget.max(1),
            failure: OnceCell::new(),
        }
    }

    /// The needle this finder searches for
    #[inline]
    pub fn needle(&self) -> &'n [u8] {
        self.needle
    }

    /// Strategy chosen for the needle
    pub fn strategy(&self) -> SearchStrategy {
        match self.matcher {
            Matcher::Short => SearchStrategy::Short,
            Matcher::Horspool(_) => SearchStrategy::Horspool,
        }
    }

    /// First occurrence at or after `start`
    pub fn find(&self, haystack: &[u8], start: usize) -> Option<usize> {
        let m = self.needle.len();
        if start > haystack.len() {
            return None;
        }
        if m == 0 {
            return Some(start);
        }
        if haystack.len() - start < m {
            return None;
        }
        match &self.matcher {
            Matcher::Short => short_scan(haystack, start, self.needle),
            Matcher::Horspool(table) => match table.scan(haystack, start, self.needle, Some(self.budget)) {
                Scan::Found(pos) => Some(pos),
                Scan::Exhausted => None,
                Scan::OverBudget(pos) => self.fallback(haystack, pos, table),
            },
        }
    }

    #[cold]
    fn fallback(&self, haystack: &[u8], pos: usize, table: &SkipTable) -> Option<usize> {
        match self.failure.get_or_try_init(|| FailureTable::build(self.needle)) {
            Ok(failure) => {
                log::debug!(
                    "search budget exceeded at offset {} (needle {} bytes), switching to linear scan",
                    pos,
                    self.needle.len()
                );
                failure.scan(haystack, pos, self.needle)
            }
            Err(e) => {
                log::debug!("linear scan table unavailable ({}), continuing skip scan", e);
                match table.scan(haystack, pos, self.needle, None) {
                    Scan::Found(found) => Some(found),
                    _ => None,
                }
            }
        }
    }

    /// Iterate over non-overlapping matches, left to right
    ///
    /// An empty needle yields no matches.
    pub fn find_iter<'f, 'h>(&'f self, haystack: &'h [u8]) -> FindIter<'f, 'n, 'h> {
        FindIter {
            finder: self,
            haystack,
            pos: 0,
        }
    }
}

impl fmt::Debug for Finder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Finder")
            .field("needle_len", &self.needle.len())
            .field("strategy", &self.strategy())
            .field("budget", &self.budget)
            .finish()
    }
}

/// Direct scan for needles of a few bytes
fn short_scan(haystack: &[u8], start: usize, needle: &[u8]) -> Option<usize> {
    let m = needle.len();
    let first = needle[0];
    let rest = &needle[1..];
    let end = haystack.len() - m;

    let mut pos = start;
    while pos <= end {
        pos += haystack[pos..=end].iter().position(|&b| b == first)?;
        if haystack[pos + 1..pos + m] == *rest {
            return Some(pos);
        }
        pos += 1;
    }
    None
}

/// Iterator over non-overlapping matches of a [`Finder`]
#[derive(Debug)]
pub struct FindIter<'f, 'n, 'h> {
    finder: &'f Finder<'n>,
    haystack: &'h [u8],
    pos: usize,
}

impl Iterator for FindIter<'_, '_, '_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let m = self.finder.needle.len();
        if m == 0 || self.pos > self.haystack.len() {
            return None;
        }
        match self.finder.find(self.haystack, self.pos) {
            Some(found) => {
                self.pos = found + m;
                Some(found)
            }
            None => {
                self.pos = self.haystack.len() + 1;
                None
            }
        }
    }
}
