#![cfg_attr(feature = "strict", deny(warnings))]
#![cfg_attr(feature = "strict", deny(clippy::all))]
#![cfg_attr(feature = "strict", deny(missing_docs))]
//! This crate contains stuff that's really helpful for tests.
use std::ops::RangeInclusive;

use proptest::prelude::*;

mod naive;
pub use naive::NaiveSequence;

/// One call against a tree, as generated by [operations].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Apply the value to every element in the range.
    Update(RangeInclusive<usize>, i64),
    /// Aggregate the range.
    Query(RangeInclusive<usize>),
}

/// Gives a strategy generating non empty sequences of at most `max_len` small integers.
pub fn sequence(max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1000i64..1000, 1..=max_len)
}

prop_compose! {
    /// Gives a valid inclusive range into a sequence of `len` elements.
    pub fn range_within(len: usize)(a in 0..len, b in 0..len) -> RangeInclusive<usize> {
        a.min(b)..=a.max(b)
    }
}

/// Gives a strategy generating a single [Operation] on a sequence of `len` elements.
/// Updates use values in `-100..100`.
pub fn operation(len: usize) -> impl Strategy<Value = Operation> {
    prop_oneof![
        (range_within(len), -100i64..100).prop_map(|(range, x)| Operation::Update(range, x)),
        range_within(len).prop_map(Operation::Query),
    ]
}

/// Gives a strategy generating up to `max_ops` [Operation]s on a sequence of `len` elements.
pub fn operations(len: usize, max_ops: usize) -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(operation(len), 0..=max_ops)
}

prop_compose! {
    /// Gives a sequence of at most `max_len` values together with up to `max_ops` [Operation]s
    /// which are all valid for it.
    pub fn sequence_with_operations(max_len: usize, max_ops: usize)
        (values in sequence(max_len))
        (ops in operations(values.len(), max_ops), values in Just(values))
        -> (Vec<i64>, Vec<Operation>) {
        (values, ops)
    }
}
