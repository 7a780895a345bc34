//! This module contains everything related to the Segment Tree datastructure.
//!
//! Both trees partition the indices `0..n` once, at construction, by recursively cutting
//! `[l, r]` into `[l, (l + r) / 2]` and `[(l + r) / 2 + 1, r]`. Every node stores the aggregate
//! of its range, so any range can be answered by combining O(log n) node aggregates.
//!
//! What an aggregate is and how it gets combined is defined by a policy:
//! - [IntervalTree] takes an [Aggregation] and supports point updates and range queries.
//! - [LazyIntervalTree] takes a [LazyAggregation] and supports range updates and range queries.
//!
//! Ready made policies live in [policies], ad hoc ones can be assembled from closures with
//! [PolicyBuilder].
//!
//! All calls validate their indices before touching the tree. Rejected calls return
//! [AggError::InvalidIndex](common::AggError::InvalidIndex) or
//! [AggError::InvalidRange](common::AggError::InvalidRange) and leave the tree unchanged.
//!
//! # Remark
//! The trees are not synchronized. Share them between threads only behind a lock covering
//! every call, queries of the lazy tree included, since those flush.
//! # Example
//! ```
//! # use interval_trees::segment_tree::{IntervalTree, LazyIntervalTree, policies::{AddSum, Sum}};
//! let mut eager = IntervalTree::new(vec![1, 2, 3, 4, 5], Sum::new()).unwrap();
//! eager.update(0, 10).unwrap();
//! assert_eq!(eager.query(0..=1).unwrap(), 12);
//!
//! let mut lazy = LazyIntervalTree::new(vec![1, 2, 3, 4, 5], AddSum::new()).unwrap();
//! lazy.update(1..=3, 10).unwrap();
//! assert_eq!(lazy.query(0..=4).unwrap(), 45);
//! ```

mod arena;

mod bounds;
pub use bounds::Bounds;

mod eager;
pub use eager::IntervalTree;

mod lazy;
pub use lazy::LazyIntervalTree;

mod policy;
pub use policy::{
    Aggregation, ClosureAggregation, ClosureLazyAggregation, LazyAggregation, PolicyBuilder,
};

pub mod policies;

#[cfg(test)]
mod tests;
