//! A plain vector model to check interval trees against.

use std::ops::RangeInclusive;

/// Stores every element explicitly, so each call costs O(range length).
/// The tree under test and this model should always agree.
#[derive(Clone, Debug, PartialEq)]
pub struct NaiveSequence<V> {
    values: Vec<V>,
}

impl<V: Clone> NaiveSequence<V> {
    /// Wraps `values`.
    pub fn new(values: Vec<V>) -> Self {
        Self { values }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All elements in index order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Folds the elements of `range` from left to right with `combine`.
    /// # Panics
    /// If `range` is empty or out of bounds.
    pub fn fold(&self, range: RangeInclusive<usize>, combine: impl Fn(&V, &V) -> V) -> V {
        self.values[range]
            .iter()
            .cloned()
            .reduce(|acc, value| combine(&acc, &value))
            .expect("folded an empty range")
    }

    /// Replaces the element at `index`.
    pub fn set(&mut self, index: usize, value: V) {
        self.values[index] = value;
    }

    /// Replaces every element of `range` by `f` of it.
    pub fn update(&mut self, range: RangeInclusive<usize>, f: impl Fn(&V) -> V) {
        for value in self.values[range].iter_mut() {
            *value = f(value);
        }
    }
}
