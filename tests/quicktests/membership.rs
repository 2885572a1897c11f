use std::collections::BTreeMap;

use steptree::{SearchTree, Simulation, TreeConfig, TreeKind};

use crate::{empty, Op};

/// Applies `ops` to a tree and to a multiset of counts, comparing the two after every
/// operation. Every intermediate snapshot must be ordered as well.
fn matches_model(kind: TreeKind, degree: usize, ops: &[Op<i8>]) -> bool {
    let mut tree = empty(kind, degree);
    let mut model: BTreeMap<i8, usize> = BTreeMap::new();

    for op in ops {
        let trace = match op {
            Op::Insert(value) => {
                *model.entry(*value).or_default() += 1;
                tree.add_with_steps(*value)
            }
            Op::Remove(value) => {
                if let Some(count) = model.get_mut(value) {
                    *count -= 1;
                    if *count == 0 {
                        model.remove(value);
                    }
                }
                tree.remove_with_steps(value)
            }
        };

        let ordered = trace.iter().all(|(snapshot, _)| {
            snapshot
                .in_order()
                .windows(2)
                .all(|pair| pair[0] <= pair[1])
        });
        if !ordered {
            return false;
        }
        if let Some((last, _)) = trace.last() {
            tree = last.clone();
        }

        let expected: Vec<&i8> = model
            .iter()
            .flat_map(|(value, &count)| std::iter::repeat_n(value, count))
            .collect();
        if tree.in_order() != expected || tree.size() != expected.len() {
            return false;
        }
        if !model.keys().all(|value| tree.contains(value)) {
            return false;
        }
    }

    true
}

/// Removing a value the tree doesn't hold does nothing, no matter how often.
fn absent_removal_is_noop(kind: TreeKind, values: &[i8], missing: i8) -> bool {
    let tree = values
        .iter()
        .filter(|&&value| value != missing)
        .fold(empty(kind, 2), |tree, &value| tree.add(value));

    let removed = tree.remove(&missing);
    tree.remove_with_steps(&missing).is_empty() && removed.remove_with_steps(&missing).is_empty()
}

/// A validating simulation never reports a broken invariant.
fn simulation_stays_valid(kind: TreeKind, degree: usize, ops: &[Op<i8>]) -> bool {
    let config = TreeConfig::new()
        .with_kind(kind)
        .with_degree(degree)
        .with_validation(true);
    let Ok(mut simulation) = Simulation::<i8>::new(config) else {
        return false;
    };
    simulation.run(ops.iter().map(Op::operation)).is_ok()
}

quickcheck::quickcheck! {
    fn fuzz_binary_membership(ops: Vec<Op<i8>>) -> bool {
        matches_model(TreeKind::Binary, 2, &ops)
    }

    fn fuzz_avl_membership(ops: Vec<Op<i8>>) -> bool {
        matches_model(TreeKind::Avl, 2, &ops)
    }

    fn fuzz_red_black_membership(ops: Vec<Op<i8>>) -> bool {
        matches_model(TreeKind::RedBlack, 2, &ops)
    }

    fn fuzz_btree_membership(ops: Vec<Op<i8>>) -> bool {
        matches_model(TreeKind::BTree, 2, &ops) && matches_model(TreeKind::BTree, 3, &ops)
    }

    fn fuzz_absent_removal(values: Vec<i8>, missing: i8) -> bool {
        TreeKind::ALL
            .iter()
            .all(|&kind| absent_removal_is_noop(kind, &values, missing))
    }

    fn fuzz_validating_simulation(ops: Vec<Op<i8>>) -> bool {
        TreeKind::ALL
            .iter()
            .all(|&kind| simulation_stays_valid(kind, 2, &ops))
    }
}
