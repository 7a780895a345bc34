use std::ops::RangeInclusive;

use common::AggResult;

use super::{
    arena::{Arena, Descent, NodeIdx},
    Aggregation, Bounds,
};

/// An interval tree which keeps every aggregate up to date at all times.
/// It supports replacing single values and aggregating arbitrary ranges, both in O(log n).
/// # Example
/// ```
/// # use interval_trees::segment_tree::{IntervalTree, policies::Min};
/// let mut tree = IntervalTree::new(vec![5, 3, 8, 1, 9], Min::new()).unwrap();
/// assert_eq!(tree.query(0..=2).unwrap(), 3);
///
/// tree.update(1, 7).unwrap();
/// assert_eq!(tree.query(0..=2).unwrap(), 5);
/// assert_eq!(tree.query(0..=4).unwrap(), 1);
///
/// // out of bounds calls are rejected and leave the tree alone
/// assert!(tree.update(5, 0).is_err());
/// assert!(tree.query(2..=5).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct IntervalTree<A: Aggregation> {
    arena: Arena<A::Value>,
    policy: A,
}

impl<A: Aggregation> IntervalTree<A> {
    /// Builds the tree over `values`, which are addressed by `0..values.len()` afterwards.
    /// # Runtime
    /// O(n)
    /// # Returns
    /// [ConfigurationError](common::AggError::ConfigurationError) if `values` is empty.
    pub fn new(values: impl IntoIterator<Item = A::Value>, policy: A) -> AggResult<Self> {
        let arena = Arena::build(values, &policy)?;
        Ok(Self { arena, policy })
    }

    /// Number of values in the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Always false, a tree can't be built from an empty sequence.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The policy the tree was built with.
    pub fn policy(&self) -> &A {
        &self.policy
    }

    /// Replaces the value at `index` and recombines every ancestor.
    /// # Runtime
    /// O(log n)
    /// # Returns
    /// [InvalidIndex](common::AggError::InvalidIndex) if `index >= self.len()`.
    pub fn update(&mut self, index: usize, value: A::Value) -> AggResult<()> {
        self.arena.check_index(index)?;
        log::trace!("update at {}", index);

        let path = self.arena.path_to(index);
        let mut ancestors = path.iter().rev();
        if let Some(&leaf) = ancestors.next() {
            self.arena[leaf].aggregate = value;
        }
        for &ancestor in ancestors {
            self.arena.recombine(ancestor, &self.policy);
        }
        Ok(())
    }

    /// Gives the combination of all values with indices in `range`, from left to right.
    /// # Runtime
    /// O(log n)
    /// # Returns
    /// [InvalidRange](common::AggError::InvalidRange) if `range` is reversed or reaches past the last index.
    pub fn query(&self, range: RangeInclusive<usize>) -> AggResult<A::Value> {
        let target = self.arena.check_range(range)?;
        Ok(self.query_inner(self.arena.root(), target))
    }

    /// The value at `index`.
    pub fn get(&self, index: usize) -> AggResult<A::Value> {
        let target = self.arena.check_index(index)?;
        Ok(self.query_inner(self.arena.root(), target))
    }

    /// All values in index order.
    pub fn to_vec(&self) -> Vec<A::Value> {
        self.arena.leaves()
    }

    fn query_inner(&self, idx: NodeIdx, target: Bounds) -> A::Value {
        let node = &self.arena[idx];
        if node.bounds == target {
            return node.aggregate.clone();
        }
        match self.arena.descend(idx, target) {
            Descent::Left(child) | Descent::Right(child) => self.query_inner(child, target),
            Descent::Split { left, right } => {
                let left = self.query_inner(left.0, left.1);
                let right = self.query_inner(right.0, right.1);
                self.policy.combine(&left, &right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment_tree::policies::{Max, Sum};
    use common::AggError;

    #[test]
    fn empty_input_is_rejected() {
        let result = IntervalTree::new(Vec::<i32>::new(), Sum::new());
        assert!(matches!(result, Err(AggError::ConfigurationError(_))));
    }

    #[test]
    fn query_of_whole_range_is_root_aggregate() {
        let tree = IntervalTree::new(vec![1, 2, 3, 4, 5], Sum::new()).unwrap();
        assert_eq!(tree.query(0..=4).unwrap(), 15);
        assert_eq!(tree.query(1..=3).unwrap(), 9);
        assert_eq!(tree.query(4..=4).unwrap(), 5);
    }

    #[test]
    fn invalid_index_reports_length() {
        let mut tree = IntervalTree::new(vec![1, 2, 3], Max::new()).unwrap();
        match tree.update(3, 10) {
            Err(AggError::InvalidIndex { index, len }) => {
                assert_eq!(index, 3);
                assert_eq!(len, 3);
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert_eq!(tree.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn invalid_ranges_are_rejected() {
        let tree = IntervalTree::new(vec![1, 2, 3], Sum::new()).unwrap();
        assert!(matches!(
            tree.query(2..=1),
            Err(AggError::InvalidRange { .. })
        ));
        assert!(matches!(
            tree.query(0..=3),
            Err(AggError::InvalidRange { .. })
        ));
        assert!(tree.get(3).is_err());
    }

    #[test]
    fn update_is_isolated_to_its_index() {
        let mut tree = IntervalTree::new(vec![4, 4, 4, 4, 4, 4, 4], Sum::new()).unwrap();
        tree.update(5, -10).unwrap();
        assert_eq!(tree.get(5).unwrap(), -10);
        assert_eq!(tree.to_vec(), vec![4, 4, 4, 4, 4, -10, 4]);
        assert_eq!(tree.query(0..=6).unwrap(), 14);
        assert_eq!(tree.query(4..=6).unwrap(), -2);
    }

    #[test]
    fn combine_keeps_left_to_right_order() {
        #[derive(Debug, Clone)]
        struct Concat;
        impl Aggregation for Concat {
            type Value = String;
            fn combine(&self, left: &String, right: &String) -> String {
                format!("{}{}", left, right)
            }
        }

        let mut tree = IntervalTree::new("abcdefg".chars().map(String::from), Concat).unwrap();
        assert_eq!(tree.query(1..=5).unwrap(), "bcdef");
        tree.update(3, "XY".into()).unwrap();
        assert_eq!(tree.query(0..=6).unwrap(), "abcXYefg");
    }
}
