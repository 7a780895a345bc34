use std::ops::RangeInclusive;

use common::AggResult;
use typed_index_collections::TiVec;

use super::{
    arena::{Arena, Children, Descent, NodeIdx},
    Bounds, LazyAggregation,
};

/// An interval tree with lazy propagation.
/// Besides range queries it supports range updates, both in O(log n):
/// an update covering a whole node is only recorded as pending at that node and pushed
/// one level down (flushed) once a later call has to look below it.
///
/// The aggregate stored at a node does not include the node's own pending operation.
/// Every aggregate is flushed before it is read, so no caller observes a stale value.
/// # Example
/// ```
/// # use interval_trees::segment_tree::{LazyIntervalTree, policies::AddMax};
/// let mut tree = LazyIntervalTree::new(vec![0; 8], AddMax::new()).unwrap();
/// tree.update(0..=5, 2).unwrap();
/// tree.update(4..=7, 3).unwrap();
/// assert_eq!(tree.query(0..=7).unwrap(), 5);
/// assert_eq!(tree.query(6..=7).unwrap(), 3);
/// assert_eq!(tree.to_vec(), vec![2, 2, 2, 2, 5, 5, 3, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct LazyIntervalTree<A: LazyAggregation> {
    arena: Arena<A::Value>,
    pending: TiVec<NodeIdx, Option<A::Pending>>,
    policy: A,
}

impl<A: LazyAggregation> LazyIntervalTree<A> {
    /// Builds the tree over `values` with nothing pending.
    /// # Runtime
    /// O(n)
    /// # Returns
    /// [ConfigurationError](common::AggError::ConfigurationError) if `values` is empty.
    pub fn new(values: impl IntoIterator<Item = A::Value>, policy: A) -> AggResult<Self> {
        let arena = Arena::build(values, &policy)?;
        let pending = (0..arena.num_nodes()).map(|_| None).collect();
        Ok(Self {
            arena,
            pending,
            policy,
        })
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

    /// Applies `op` to every value with an index in `range`.
    /// # Runtime
    /// O(log n)
    /// # Returns
    /// [InvalidRange](common::AggError::InvalidRange) if `range` is reversed or reaches past the last index.
    pub fn update(&mut self, range: RangeInclusive<usize>, op: A::Pending) -> AggResult<()> {
        let target = self.arena.check_range(range)?;
        log::trace!("range update on {}", target);
        self.update_inner(self.arena.root(), target, &op);
        Ok(())
    }

    /// Gives the combination of all values with indices in `range`, from left to right.
    /// This needs mutable access since pending operations on the way get flushed.
    /// # Runtime
    /// O(log n)
    /// # Returns
    /// [InvalidRange](common::AggError::InvalidRange) if `range` is reversed or reaches past the last index.
    pub fn query(&mut self, range: RangeInclusive<usize>) -> AggResult<A::Value> {
        let target = self.arena.check_range(range)?;
        Ok(self.query_inner(self.arena.root(), target))
    }

    /// The value at `index`.
    pub fn get(&mut self, index: usize) -> AggResult<A::Value> {
        let target = self.arena.check_index(index)?;
        Ok(self.query_inner(self.arena.root(), target))
    }

    /// Flushes every pending operation down to the leaves and returns all values in index order.
    /// # Runtime
    /// O(n)
    pub fn to_vec(&mut self) -> Vec<A::Value> {
        self.flush_subtree(self.arena.root());
        self.arena.leaves()
    }

    fn update_inner(&mut self, idx: NodeIdx, target: Bounds, op: &A::Pending) {
        if self.arena[idx].bounds == target {
            self.defer(idx, op);
            return;
        }

        self.flush(idx);
        match self.arena.descend(idx, target) {
            Descent::Left(child) | Descent::Right(child) => self.update_inner(child, target, op),
            Descent::Split { left, right } => {
                self.update_inner(left.0, left.1, op);
                self.update_inner(right.0, right.1, op);
            }
        }
        self.pull(idx);
    }

    fn query_inner(&mut self, idx: NodeIdx, target: Bounds) -> A::Value {
        self.flush(idx);
        if self.arena[idx].bounds == target {
            return self.arena[idx].aggregate.clone();
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

    /// Composes `op` into the pending operation of `idx`, after whatever is pending there already.
    fn defer(&mut self, idx: NodeIdx, op: &A::Pending) {
        let merged = match self.pending[idx].take() {
            Some(older) => self.policy.compose(&older, op),
            None => op.clone(),
        };
        self.pending[idx] = Some(merged);
    }

    /// Applies the pending operation of `idx` to its aggregate and defers it to both children.
    /// The children's aggregates are not touched. Does nothing if nothing is pending.
    pub(crate) fn flush(&mut self, idx: NodeIdx) {
        let pending = match self.pending[idx].take() {
            Some(pending) => pending,
            None => return,
        };

        let node = &mut self.arena[idx];
        node.aggregate = self
            .policy
            .apply(&pending, &node.aggregate, node.bounds.len());
        let children = node.children;
        if let Some(Children { left, right }) = children {
            self.defer(left, &pending);
            self.defer(right, &pending);
        }
    }

    // Brings both children up to date and recombines `idx` from them.
    fn pull(&mut self, idx: NodeIdx) {
        if let Some(Children { left, right }) = self.arena[idx].children {
            self.flush(left);
            self.flush(right);
            self.arena.recombine(idx, &self.policy);
        }
    }

    fn flush_subtree(&mut self, idx: NodeIdx) {
        self.flush(idx);
        if let Some(Children { left, right }) = self.arena[idx].children {
            self.flush_subtree(left);
            self.flush_subtree(right);
        }
    }
}
