use std::ops::RangeInclusive;

use common::{AggError, AggResult};
use derive_more::Display;

/// An inclusive index interval `[start, end]`.
/// Every node of a tree covers one of these, and every query or range update targets one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "[{}, {}]", start, end)]
pub struct Bounds {
    /// First index covered.
    pub start: usize,
    /// Last index covered.
    pub end: usize,
}

impl Bounds {
    /// Creates `[start, end]`. Callers must ensure `start <= end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Creates the bounds `[index, index]` of a single element.
    pub fn single(index: usize) -> Self {
        Self::new(index, index)
    }

    /// Validates `range` against a sequence of `len` elements.
    /// # Returns
    /// [AggError::InvalidRange] if `range.start() > range.end()` or `range.end() >= len`.
    pub fn checked(range: RangeInclusive<usize>, len: usize) -> AggResult<Self> {
        let (start, end) = range.into_inner();
        if start > end || end >= len {
            Err(AggError::InvalidRange { start, end, len })
        } else {
            Ok(Self { start, end })
        }
    }

    /// Validates a single `index` against a sequence of `len` elements.
    /// # Returns
    /// [AggError::InvalidIndex] if `index >= len`.
    pub fn checked_index(index: usize, len: usize) -> AggResult<Self> {
        if index >= len {
            Err(AggError::InvalidIndex { index, len })
        } else {
            Ok(Self::single(index))
        }
    }

    /// Number of indices covered. Never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    pub fn is_superset(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Splits at the midpoint `(start + end) / 2` into `[start, mid]` and `[mid + 1, end]`.
    /// Returns `None` for single element bounds.
    pub fn split(&self) -> Option<(Self, Self)> {
        if self.is_single() {
            None
        } else {
            let mid = self.start + (self.end - self.start) / 2;
            Some((Self::new(self.start, mid), Self::new(mid + 1, self.end)))
        }
    }
}

impl From<Bounds> for RangeInclusive<usize> {
    fn from(bounds: Bounds) -> Self {
        bounds.start..=bounds.end
    }
}
