macro_rules! generic_interval_tree_tests {
    ($ident: ident, $policy: expr) => {
        mod $ident {
            use crate::segment_tree::{
                policies::*, Aggregation, IntervalTree, LazyAggregation, LazyIntervalTree,
            };
            use proptest::prelude::*;
            use test_helpers::{sequence, sequence_with_operations, NaiveSequence, Operation};

            proptest! {
                #![proptest_config(ProptestConfig::with_cases(16))]

                #[test]
                fn eager_query_matches_fold(values in sequence(200)) {
                    let policy = $policy;
                    let tree = IntervalTree::new(values.clone(), policy).unwrap();
                    let naive = NaiveSequence::new(values);

                    for l in 0..naive.len() {
                        for r in l..naive.len() {
                            prop_assert_eq!(
                                tree.query(l..=r).unwrap(),
                                naive.fold(l..=r, |a, b| policy.combine(a, b))
                            );
                        }
                    }
                }
            }

            proptest! {
                #![proptest_config(ProptestConfig::with_cases(64))]

                #[test]
                fn point_update_is_isolated(
                    values in sequence(100),
                    index in 0..100usize,
                    value in -1000i64..1000,
                ) {
                    prop_assume!(index < values.len());
                    let policy = $policy;
                    let mut tree = IntervalTree::new(values.clone(), policy).unwrap();
                    tree.update(index, value).unwrap();

                    prop_assert_eq!(tree.get(index).unwrap(), value);
                    for (i, original) in values.iter().enumerate().filter(|(i, _)| *i != index) {
                        prop_assert_eq!(tree.get(i).unwrap(), *original);
                    }
                }

                #[test]
                fn interleaved_lazy_calls_match_naive(
                    (values, ops) in sequence_with_operations(100, 1000)
                ) {
                    let policy = $policy;
                    let mut tree = LazyIntervalTree::new(values.clone(), policy).unwrap();
                    let mut naive = NaiveSequence::new(values);

                    for op in ops {
                        match op {
                            Operation::Update(range, x) => {
                                tree.update(range.clone(), x).unwrap();
                                naive.update(range, |value| policy.apply(&x, value, 1));
                            }
                            Operation::Query(range) => {
                                prop_assert_eq!(
                                    tree.query(range.clone()).unwrap(),
                                    naive.fold(range, |a, b| policy.combine(a, b))
                                );
                            }
                        }
                    }
                    prop_assert_eq!(tree.to_vec(), naive.values().to_vec());
                }

                #[test]
                fn single_element_ranges_behave_like_point_updates(
                    (values, ops) in sequence_with_operations(50, 100)
                ) {
                    let policy = $policy;
                    let mut lazy = LazyIntervalTree::new(values.clone(), policy).unwrap();
                    let mut eager = IntervalTree::new(values, policy).unwrap();

                    for op in ops {
                        if let Operation::Update(range, x) = op {
                            let index = *range.start();
                            let updated = policy.apply(&x, &eager.get(index).unwrap(), 1);
                            lazy.update(index..=index, x).unwrap();
                            eager.update(index, updated).unwrap();
                        }
                    }
                    prop_assert_eq!(lazy.to_vec(), eager.to_vec());
                    let last = eager.len() - 1;
                    prop_assert_eq!(lazy.query(0..=last).unwrap(), eager.query(0..=last).unwrap());
                }
            }
        }
    };
}

generic_interval_tree_tests!(add_sum, AddSum::<i64>::new());
generic_interval_tree_tests!(add_min, AddMin::<i64>::new());
generic_interval_tree_tests!(add_max, AddMax::<i64>::new());
generic_interval_tree_tests!(assign_sum, AssignSum::<i64>::new());
generic_interval_tree_tests!(assign_min, AssignMin::<i64>::new());
generic_interval_tree_tests!(assign_max, AssignMax::<i64>::new());
