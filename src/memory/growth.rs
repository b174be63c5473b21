//! Capacity growth policy shared by every buffer-backed container
//!
//! A [`GrowthPolicy`] decides the next capacity whenever a buffer runs out of
//! room. Growth is geometric so appends stay amortized O(1), and small
//! allocations are rounded up to an allocator-friendly byte size.

use serde::{Deserialize, Serialize};

/// Byte granularity for rounding small allocations
const ROUND_BYTES: usize = 16;

/// Allocations above this size are not rounded
const ROUND_LIMIT: usize = 4096;

/// Geometric growth strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthStrategy {
    /// Capacity doubles on every growth
    Doubling,
    /// Capacity grows by 3/2
    OneAndHalf,
    /// Capacity grows by 103/64 (about 1.609)
    GoldenRatio,
}

impl Default for GrowthStrategy {
    fn default() -> Self {
        Self::Doubling
    }
}

impl GrowthStrategy {
    /// Growth ratio as `(numerator, denominator)`
    #[inline]
    pub const fn ratio(self) -> (usize, usize) {
        match self {
            Self::Doubling => (2, 1),
            Self::OneAndHalf => (3, 2),
            Self::GoldenRatio => (103, 64),
        }
    }

    /// Parse a strategy name as used in environment variables
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "doubling" | "double" | "2" => Some(Self::Doubling),
            "one_and_half" | "onehalf" | "1.5" => Some(Self::OneAndHalf),
            "golden" | "golden_ratio" | "goldenratio" | "1.618" => Some(Self::GoldenRatio),
            _ => None,
        }
    }
}

/// Capacity growth policy
///
/// The policy is a small `Copy` value stored inside each buffer, so containers
/// created from different configurations can coexist without global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    strategy: GrowthStrategy,
    min_capacity_bytes: usize,
    inline: bool,
}

impl GrowthPolicy {
    /// Default policy: doubling, 64-byte first allocation, inline storage enabled
    pub const DEFAULT: GrowthPolicy = GrowthPolicy {
        strategy: GrowthStrategy::Doubling,
        min_capacity_bytes: 64,
        inline: true,
    };

    /// Create a policy
    pub const fn new(strategy: GrowthStrategy, min_capacity_bytes: usize, inline: bool) -> Self {
        Self {
            strategy,
            min_capacity_bytes,
            inline,
        }
    }

    /// Growth strategy
    #[inline]
    pub fn strategy(&self) -> GrowthStrategy {
        self.strategy
    }

    /// Minimum size in bytes of the first heap allocation
    #[inline]
    pub fn min_capacity_bytes(&self) -> usize {
        self.min_capacity_bytes
    }

    /// Whether small buffers start in inline storage
    #[inline]
    pub fn inline(&self) -> bool {
        self.inline
    }

    /// Compute the capacity (in elements) to grow to
    ///
    /// The result is at least `needed`, at least the geometric successor of
    /// `current`, and at least the policy minimum. Returns `None` when the byte
    /// size would overflow.
    pub fn next_capacity(&self, current: usize, needed: usize, elem_size: usize) -> Option<usize> {
        debug_assert!(elem_size > 0);
        let (num, den) = self.strategy.ratio();
        let grown = (current / den)
            .checked_mul(num)?
            .checked_add((current % den) * num / den)?
            .max(current.saturating_add(1));
        let min_elems = (self.min_capacity_bytes / elem_size).max(1);
        let target = needed.max(grown).max(min_elems);

        let bytes = target.checked_mul(elem_size)?;
        if bytes > ROUND_LIMIT {
            return Some(target);
        }
        let rounded = bytes.checked_add(ROUND_BYTES - 1)? & !(ROUND_BYTES - 1);
        Some((rounded / elem_size).max(target))
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}
