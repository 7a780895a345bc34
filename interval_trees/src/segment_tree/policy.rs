//! The aggregation policies a tree is parametrized with.

use std::fmt;

use common::{AggError, AggResult};

/// Tells an [IntervalTree](super::IntervalTree) how to merge the aggregates of two neighbouring
/// ranges into the aggregate of their union.
///
/// `combine` has to be associative. It does not have to be commutative: the left argument
/// always covers the lower indices.
pub trait Aggregation {
    /// The summary value stored at every node. Leaves store the input elements.
    type Value: Clone;

    fn combine(&self, left: &Self::Value, right: &Self::Value) -> Self::Value;
}

/// Extends [Aggregation] with deferred range operations, as needed by
/// [LazyIntervalTree](super::LazyIntervalTree).
///
/// The two functions have to agree with each other: applying `compose(older, newer)` once must
/// give the same aggregate as applying `older` and then `newer`.
/// # Example
/// "Add x to every element" under sum aggregation.
/// ```
/// # use interval_trees::segment_tree::{Aggregation, LazyAggregation};
/// #[derive(Clone)]
/// struct AddToSum;
///
/// impl Aggregation for AddToSum {
///     type Value = i64;
///     fn combine(&self, left: &i64, right: &i64) -> i64 {
///         left + right
///     }
/// }
///
/// impl LazyAggregation for AddToSum {
///     type Pending = i64;
///     fn compose(&self, older: &i64, newer: &i64) -> i64 {
///         older + newer
///     }
///     fn apply(&self, pending: &i64, aggregate: &i64, range_len: usize) -> i64 {
///         aggregate + pending * range_len as i64
///     }
/// }
/// ```
pub trait LazyAggregation: Aggregation {
    /// A range operation which has not been pushed to a node's children yet.
    type Pending: Clone;

    /// Merges two operations into one, `older` arrived first.
    fn compose(&self, older: &Self::Pending, newer: &Self::Pending) -> Self::Pending;

    /// Applies `pending` to the already combined `aggregate` of a range spanning `range_len` leaves.
    fn apply(
        &self,
        pending: &Self::Pending,
        aggregate: &Self::Value,
        range_len: usize,
    ) -> Self::Value;
}

type CombineFn<V> = Box<dyn Fn(&V, &V) -> V>;
type ComposeFn<P> = Box<dyn Fn(&P, &P) -> P>;
type ApplyFn<V, P> = Box<dyn Fn(&P, &V, usize) -> V>;

/// Collects closures to be used as a policy.
/// Every missing operation is reported as [AggError::ConfigurationError] when building.
/// # Example
/// ```
/// # use interval_trees::segment_tree::{LazyIntervalTree, PolicyBuilder};
/// let policy = PolicyBuilder::new()
///     .combine(|a: &i64, b: &i64| a + b)
///     .compose(|older: &i64, newer: &i64| older + newer)
///     .apply(|x: &i64, agg: &i64, len| agg + x * len as i64)
///     .build_lazy()
///     .unwrap();
/// let mut tree = LazyIntervalTree::new(vec![1, 2, 3], policy).unwrap();
/// tree.update(0..=1, 5).unwrap();
/// assert_eq!(tree.query(0..=2).unwrap(), 16);
///
/// assert!(PolicyBuilder::<i64, i64>::new()
///     .combine(|a: &i64, b: &i64| a + b)
///     .build_lazy()
///     .is_err());
/// ```
pub struct PolicyBuilder<V, P = ()> {
    combine: Option<CombineFn<V>>,
    compose: Option<ComposeFn<P>>,
    apply: Option<ApplyFn<V, P>>,
}

impl<V, P> PolicyBuilder<V, P> {
    pub fn new() -> Self {
        Self {
            combine: None,
            compose: None,
            apply: None,
        }
    }

    pub fn combine(mut self, f: impl Fn(&V, &V) -> V + 'static) -> Self {
        self.combine = Some(Box::new(f));
        self
    }

    pub fn compose(mut self, f: impl Fn(&P, &P) -> P + 'static) -> Self {
        self.compose = Some(Box::new(f));
        self
    }

    pub fn apply(mut self, f: impl Fn(&P, &V, usize) -> V + 'static) -> Self {
        self.apply = Some(Box::new(f));
        self
    }

    /// Builds a policy for eager trees. Only `combine` is required.
    pub fn build_aggregation(self) -> AggResult<ClosureAggregation<V>> {
        match self.combine {
            Some(combine) => Ok(ClosureAggregation { combine }),
            None => Err(missing(&["combine"])),
        }
    }

    /// Builds a policy for lazy trees. `combine`, `compose` and `apply` are required.
    pub fn build_lazy(self) -> AggResult<ClosureLazyAggregation<V, P>> {
        match (self.combine, self.compose, self.apply) {
            (Some(combine), Some(compose), Some(apply)) => Ok(ClosureLazyAggregation {
                combine,
                compose,
                apply,
            }),
            (combine, compose, apply) => {
                let absent: Vec<&str> = [
                    ("combine", combine.is_none()),
                    ("compose", compose.is_none()),
                    ("apply", apply.is_none()),
                ]
                .iter()
                .filter(|(_, is_absent)| *is_absent)
                .map(|(name, _)| *name)
                .collect();
                Err(missing(&absent))
            }
        }
    }
}

impl<V, P> Default for PolicyBuilder<V, P> {
    fn default() -> Self {
        Self::new()
    }
}

fn missing(operations: &[&str]) -> AggError {
    log::debug!("rejecting policy, missing {:?}", operations);
    AggError::ConfigurationError(format!(
        "policy is missing the operation(s): {}",
        operations.join(", ")
    ))
}

/// An [Aggregation] backed by a closure. Built by [PolicyBuilder::build_aggregation].
pub struct ClosureAggregation<V> {
    combine: CombineFn<V>,
}

impl<V: Clone> Aggregation for ClosureAggregation<V> {
    type Value = V;

    fn combine(&self, left: &V, right: &V) -> V {
        (self.combine)(left, right)
    }
}

impl<V> fmt::Debug for ClosureAggregation<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureAggregation").finish()
    }
}

/// A [LazyAggregation] backed by closures. Built by [PolicyBuilder::build_lazy].
pub struct ClosureLazyAggregation<V, P> {
    combine: CombineFn<V>,
    compose: ComposeFn<P>,
    apply: ApplyFn<V, P>,
}

impl<V: Clone, P> Aggregation for ClosureLazyAggregation<V, P> {
    type Value = V;

    fn combine(&self, left: &V, right: &V) -> V {
        (self.combine)(left, right)
    }
}

impl<V: Clone, P: Clone> LazyAggregation for ClosureLazyAggregation<V, P> {
    type Pending = P;

    fn compose(&self, older: &P, newer: &P) -> P {
        (self.compose)(older, newer)
    }

    fn apply(&self, pending: &P, aggregate: &V, range_len: usize) -> V {
        (self.apply)(pending, aggregate, range_len)
    }
}

impl<V, P> fmt::Debug for ClosureLazyAggregation<V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureLazyAggregation").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eager_policy_needs_combine() {
        let err = PolicyBuilder::<i64>::new().build_aggregation().unwrap_err();
        assert!(matches!(err, AggError::ConfigurationError(_)));
    }

    #[test]
    fn lazy_policy_reports_every_missing_operation() {
        let err = PolicyBuilder::<i64, i64>::new()
            .compose(|a, b| a + b)
            .build_lazy()
            .unwrap_err();
        match err {
            AggError::ConfigurationError(message) => {
                assert!(message.contains("combine"));
                assert!(message.contains("apply"));
                assert!(!message.contains("compose"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn closures_are_called_with_their_arguments() {
        let policy = PolicyBuilder::<i64, i64>::new()
            .combine(|a, b| *a.max(b))
            .compose(|_, newer| *newer)
            .apply(|x, _, len| x * len as i64)
            .build_lazy()
            .unwrap();
        assert_eq!(policy.combine(&3, &7), 7);
        assert_eq!(policy.compose(&3, &7), 7);
        assert_eq!(policy.apply(&3, &100, 4), 12);
    }
}
