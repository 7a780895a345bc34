//! Ready made policies for numeric sequences.
//!
//! The lazy policies come in two flavours:
//! - additive (`Add*`): a range update adds `x` to every element, pending additions compose by summing.
//! - overwrite (`Assign*`): a range update sets every element to `x`, the latest pending assignment wins.

use std::{fmt, marker::PhantomData, ops::Add, ops::Mul};

use num::traits::AsPrimitive;

use super::{Aggregation, LazyAggregation};

macro_rules! declare_policy {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub struct $name<T>(PhantomData<T>);

        impl<T> $name<T> {
            pub fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<T> Default for $name<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T> Clone for $name<T> {
            fn clone(&self) -> Self {
                Self::new()
            }
        }

        impl<T> Copy for $name<T> {}

        impl<T> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(stringify!($name))
            }
        }
    };
}

macro_rules! combine_by {
    ($name:ident, sum) => {
        impl<T: Copy + Add<Output = T>> Aggregation for $name<T> {
            type Value = T;

            fn combine(&self, left: &T, right: &T) -> T {
                *left + *right
            }
        }
    };
    ($name:ident, min) => {
        impl<T: Copy + PartialOrd> Aggregation for $name<T> {
            type Value = T;

            fn combine(&self, left: &T, right: &T) -> T {
                if right < left {
                    *right
                } else {
                    *left
                }
            }
        }
    };
    ($name:ident, max) => {
        impl<T: Copy + PartialOrd> Aggregation for $name<T> {
            type Value = T;

            fn combine(&self, left: &T, right: &T) -> T {
                if right > left {
                    *right
                } else {
                    *left
                }
            }
        }
    };
}

declare_policy!(
    /// Sum of a range.
    Sum
);
combine_by!(Sum, sum);

declare_policy!(
    /// Minimum of a range.
    Min
);
combine_by!(Min, min);

declare_policy!(
    /// Maximum of a range.
    Max
);
combine_by!(Max, max);

declare_policy!(
    /// Range add, range sum.
    /// # Example
    /// ```
    /// # use interval_trees::segment_tree::{policies::AddSum, LazyIntervalTree};
    /// let mut tree = LazyIntervalTree::new(vec![1, 2, 3, 4, 5], AddSum::new()).unwrap();
    /// tree.update(1..=3, 10).unwrap();
    /// assert_eq!(tree.query(0..=4).unwrap(), 45);
    /// assert_eq!(tree.query(1..=1).unwrap(), 12);
    /// ```
    AddSum
);
combine_by!(AddSum, sum);

impl<T> LazyAggregation for AddSum<T>
where
    T: Copy + Add<Output = T> + Mul<Output = T> + 'static,
    usize: AsPrimitive<T>,
{
    type Pending = T;

    fn compose(&self, older: &T, newer: &T) -> T {
        *older + *newer
    }

    fn apply(&self, pending: &T, aggregate: &T, range_len: usize) -> T {
        *aggregate + *pending * range_len.as_()
    }
}

declare_policy!(
    /// Range add, range minimum.
    AddMin
);
combine_by!(AddMin, min);

impl<T: Copy + PartialOrd + Add<Output = T>> LazyAggregation for AddMin<T> {
    type Pending = T;

    fn compose(&self, older: &T, newer: &T) -> T {
        *older + *newer
    }

    fn apply(&self, pending: &T, aggregate: &T, _range_len: usize) -> T {
        *aggregate + *pending
    }
}

declare_policy!(
    /// Range add, range maximum.
    AddMax
);
combine_by!(AddMax, max);

impl<T: Copy + PartialOrd + Add<Output = T>> LazyAggregation for AddMax<T> {
    type Pending = T;

    fn compose(&self, older: &T, newer: &T) -> T {
        *older + *newer
    }

    fn apply(&self, pending: &T, aggregate: &T, _range_len: usize) -> T {
        *aggregate + *pending
    }
}

declare_policy!(
    /// Range assignment, range sum.
    AssignSum
);
combine_by!(AssignSum, sum);

impl<T> LazyAggregation for AssignSum<T>
where
    T: Copy + Add<Output = T> + Mul<Output = T> + 'static,
    usize: AsPrimitive<T>,
{
    type Pending = T;

    fn compose(&self, _older: &T, newer: &T) -> T {
        *newer
    }

    fn apply(&self, pending: &T, _aggregate: &T, range_len: usize) -> T {
        *pending * range_len.as_()
    }
}

declare_policy!(
    /// Range assignment, range minimum.
    /// # Example
    /// ```
    /// # use interval_trees::segment_tree::{policies::AssignMin, LazyIntervalTree};
    /// let mut tree = LazyIntervalTree::new(vec![5, 3, 8, 1, 9], AssignMin::new()).unwrap();
    /// tree.update(0..=2, 0).unwrap();
    /// assert_eq!(tree.query(0..=4).unwrap(), 0);
    /// assert_eq!(tree.query(3..=4).unwrap(), 1);
    /// ```
    AssignMin
);
combine_by!(AssignMin, min);

impl<T: Copy + PartialOrd> LazyAggregation for AssignMin<T> {
    type Pending = T;

    fn compose(&self, _older: &T, newer: &T) -> T {
        *newer
    }

    fn apply(&self, pending: &T, _aggregate: &T, _range_len: usize) -> T {
        *pending
    }
}

declare_policy!(
    /// Range assignment, range maximum.
    AssignMax
);
combine_by!(AssignMax, max);

impl<T: Copy + PartialOrd> LazyAggregation for AssignMax<T> {
    type Pending = T;

    fn compose(&self, _older: &T, newer: &T) -> T {
        *newer
    }

    fn apply(&self, pending: &T, _aggregate: &T, _range_len: usize) -> T {
        *pending
    }
}
