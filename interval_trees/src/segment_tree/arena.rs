use std::ops::{Index, IndexMut};

use common::{AggError, AggResult};
use derive_more::*;
use typed_index_collections::TiVec;

use super::{Aggregation, Bounds};

// An Index into an Arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
pub(crate) struct NodeIdx(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Children {
    pub(crate) left: NodeIdx,
    pub(crate) right: NodeIdx,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Node<V> {
    pub(crate) bounds: Bounds,
    // present iff bounds covers more than one index
    pub(crate) children: Option<Children>,
    pub(crate) aggregate: V,
}

/// Where a target range lies relative to the children of a node whose own bounds differ from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Descent {
    Left(NodeIdx),
    Right(NodeIdx),
    /// The target straddles the children, cut at their stored boundary.
    Split {
        left: (NodeIdx, Bounds),
        right: (NodeIdx, Bounds),
    },
}

/// All nodes of one tree, stored flat in post-order.
/// Children always precede their parent, so the root is the last node,
/// and the leaves appear in the order of the indices they cover.
#[derive(Debug, Clone)]
pub(crate) struct Arena<V> {
    nodes: TiVec<NodeIdx, Node<V>>,
    len: usize,
}

impl<V: Clone> Arena<V> {
    /// Partitions `[0, n - 1]` at midpoints and combines bottom up.
    /// # Returns
    /// [AggError::ConfigurationError] if `values` is empty.
    pub(crate) fn build<A>(values: impl IntoIterator<Item = V>, policy: &A) -> AggResult<Self>
    where
        A: Aggregation<Value = V>,
    {
        let values: Vec<V> = values.into_iter().collect();
        if values.is_empty() {
            log::debug!("refusing to build a tree over an empty sequence");
            return Err(AggError::ConfigurationError(
                "cannot build an interval tree over an empty sequence".into(),
            ));
        }

        let len = values.len();
        let mut arena = Self {
            nodes: TiVec::with_capacity(2 * len - 1),
            len,
        };
        let mut leaves = values.into_iter();
        arena.build_inner(Bounds::new(0, len - 1), &mut leaves, policy);
        log::trace!("built arena with {} nodes over {} values", arena.nodes.len(), len);
        Ok(arena)
    }

    fn build_inner<A>(
        &mut self,
        bounds: Bounds,
        leaves: &mut impl Iterator<Item = V>,
        policy: &A,
    ) -> NodeIdx
    where
        A: Aggregation<Value = V>,
    {
        let node = match bounds.split() {
            None => {
                let aggregate = match leaves.next() {
                    Some(value) => value,
                    None => unreachable!("the partition has exactly one leaf per value"),
                };
                Node {
                    bounds,
                    children: None,
                    aggregate,
                }
            }
            Some((left_bounds, right_bounds)) => {
                let left = self.build_inner(left_bounds, leaves, policy);
                let right = self.build_inner(right_bounds, leaves, policy);
                let aggregate = policy.combine(&self[left].aggregate, &self[right].aggregate);
                Node {
                    bounds,
                    children: Some(Children { left, right }),
                    aggregate,
                }
            }
        };
        let idx = NodeIdx(self.nodes.len());
        self.nodes.push(node);
        idx
    }

    /// Sets the aggregate of `idx` to the combination of its children's aggregates.
    /// Leaves are left untouched.
    pub(crate) fn recombine<A>(&mut self, idx: NodeIdx, policy: &A)
    where
        A: Aggregation<Value = V>,
    {
        if let Some(Children { left, right }) = self[idx].children {
            let aggregate = policy.combine(&self[left].aggregate, &self[right].aggregate);
            self[idx].aggregate = aggregate;
        }
    }

    /// Clones the aggregates stored at the leaves, in index order.
    pub(crate) fn leaves(&self) -> Vec<V> {
        self.nodes
            .iter()
            .filter(|node| node.children.is_none())
            .map(|node| node.aggregate.clone())
            .collect()
    }
}

impl<V> Arena<V> {
    pub(crate) fn root(&self) -> NodeIdx {
        NodeIdx(self.nodes.len() - 1)
    }

    /// Number of values (leaves).
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Number of nodes, always `2 * len - 1`.
    pub(crate) fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn check_range(&self, range: std::ops::RangeInclusive<usize>) -> AggResult<Bounds> {
        Bounds::checked(range, self.len).map_err(|err| {
            log::debug!("rejected call: {}", err);
            err
        })
    }

    pub(crate) fn check_index(&self, index: usize) -> AggResult<Bounds> {
        Bounds::checked_index(index, self.len).map_err(|err| {
            log::debug!("rejected call: {}", err);
            err
        })
    }

    /// Decides where to continue with `target` below `idx`.
    /// This uses the bounds stored at the children, never a freshly computed midpoint,
    /// so every recursion lands on an existing node.
    /// # Panics
    /// If `idx` is a leaf. Callers only descend when `target` is a strict subset of the node's bounds,
    /// which a leaf does not have.
    pub(crate) fn descend(&self, idx: NodeIdx, target: Bounds) -> Descent {
        debug_assert!(self[idx].bounds.is_superset(&target));
        debug_assert!(self[idx].bounds != target);
        let Children { left, right } = match self[idx].children {
            Some(children) => children,
            None => unreachable!("a leaf can only be targeted by its own bounds"),
        };
        let left_bounds = self[left].bounds;
        let right_bounds = self[right].bounds;

        if target.end <= left_bounds.end {
            Descent::Left(left)
        } else if right_bounds.start <= target.start {
            Descent::Right(right)
        } else {
            Descent::Split {
                left: (left, Bounds::new(target.start, left_bounds.end)),
                right: (right, Bounds::new(right_bounds.start, target.end)),
            }
        }
    }

    /// Follows the path from the root to the leaf covering `index`, root first.
    pub(crate) fn path_to(&self, index: usize) -> Vec<NodeIdx> {
        let mut path = vec![self.root()];
        let mut current = self.root();
        while let Some(Children { left, right }) = self[current].children {
            current = if index <= self[left].bounds.end {
                left
            } else {
                right
            };
            path.push(current);
        }
        path
    }
}

impl<V> Index<NodeIdx> for Arena<V> {
    type Output = Node<V>;

    fn index(&self, index: NodeIdx) -> &Self::Output {
        &self.nodes[index]
    }
}

impl<V> IndexMut<NodeIdx> for Arena<V> {
    fn index_mut(&mut self, index: NodeIdx) -> &mut Self::Output {
        &mut self.nodes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment_tree::policies::Sum;
    use proptest::prelude::*;

    fn arena(len: usize) -> Arena<u64> {
        Arena::build((0..len as u64).collect::<Vec<_>>(), &Sum::new()).unwrap()
    }

    #[test]
    fn empty_sequence_is_a_configuration_error() {
        let result = Arena::build(Vec::<u64>::new(), &Sum::new());
        assert!(matches!(result, Err(AggError::ConfigurationError(_))));
    }

    #[test]
    fn single_value_is_a_lone_leaf() {
        let arena = arena(1);
        assert_eq!(arena.num_nodes(), 1);
        assert_eq!(arena[arena.root()].bounds, Bounds::single(0));
        assert_eq!(arena[arena.root()].children, None);
    }

    #[test]
    fn five_values_split_at_integer_midpoints() {
        let arena = arena(5);
        let root = &arena[arena.root()];
        let Children { left, right } = root.children.unwrap();
        assert_eq!(arena[left].bounds, Bounds::new(0, 2));
        assert_eq!(arena[right].bounds, Bounds::new(3, 4));
        assert_eq!(root.aggregate, 10);
    }

    #[test]
    fn descend_cuts_at_stored_child_boundary() {
        let arena = arena(5);
        let root = arena.root();
        let Children { left, right } = arena[root].children.unwrap();
        assert_eq!(arena.descend(root, Bounds::new(0, 1)), Descent::Left(left));
        assert_eq!(arena.descend(root, Bounds::new(3, 3)), Descent::Right(right));
        assert_eq!(
            arena.descend(root, Bounds::new(1, 4)),
            Descent::Split {
                left: (left, Bounds::new(1, 2)),
                right: (right, Bounds::new(3, 4)),
            }
        );
    }

    proptest! {
        #[test]
        fn has_one_node_per_partition_cell(len in 1..300usize) {
            let arena = arena(len);
            prop_assert_eq!(arena.num_nodes(), 2 * len - 1);
            prop_assert_eq!(arena.leaves(), (0..len as u64).collect::<Vec<_>>());
        }

        #[test]
        fn every_parent_combines_its_children(len in 1..300usize) {
            let arena = arena(len);
            for node in arena.nodes.iter() {
                if let Some(Children { left, right }) = node.children {
                    prop_assert_eq!(node.aggregate, arena[left].aggregate + arena[right].aggregate);
                    prop_assert_eq!(node.bounds.start, arena[left].bounds.start);
                    prop_assert_eq!(arena[left].bounds.end + 1, arena[right].bounds.start);
                    prop_assert_eq!(node.bounds.end, arena[right].bounds.end);
                }
            }
        }

        #[test]
        fn path_ends_in_the_leaf_of_the_index(len in 1..300usize, index in 0..300usize) {
            prop_assume!(index < len);
            let arena = arena(len);
            let path = arena.path_to(index);
            prop_assert_eq!(path[0], arena.root());
            let leaf = &arena[*path.last().unwrap()];
            prop_assert_eq!(leaf.bounds, Bounds::single(index));
            for window in path.windows(2) {
                prop_assert!(arena[window[0]].bounds.is_superset(&arena[window[1]].bounds));
            }
        }
    }
}
