use steptree::{AnyTree, SearchTree, TreeKind};

use crate::{empty, Op};

/// Applies `ops`, checking `holds` on every tree in between operations.
fn always(
    kind: TreeKind,
    degree: usize,
    ops: &[Op<i8>],
    holds: impl Fn(&AnyTree<i8>) -> bool,
) -> bool {
    let mut tree = empty(kind, degree);
    for op in ops {
        tree = match op {
            Op::Insert(value) => tree.add(*value),
            Op::Remove(value) => tree.remove(value),
        };
        if !holds(&tree) {
            return false;
        }
    }
    true
}

fn log2(n: usize) -> f64 {
    (n as f64).log2()
}

quickcheck::quickcheck! {
    fn fuzz_avl_height_bound(ops: Vec<Op<i8>>) -> bool {
        always(TreeKind::Avl, 2, &ops, |tree| {
            tree.validate().is_ok() && (tree.height() as f64) <= 1.45 * log2(tree.size() + 2)
        })
    }

    fn fuzz_red_black_height_bound(ops: Vec<Op<i8>>) -> bool {
        always(TreeKind::RedBlack, 2, &ops, |tree| {
            tree.validate().is_ok() && (tree.height() as f64) <= 2.0 * log2(tree.size() + 1)
        })
    }

    fn fuzz_btree_fill(ops: Vec<Op<i8>>) -> bool {
        [2, 3, 4]
            .iter()
            .all(|&degree| always(TreeKind::BTree, degree, &ops, |tree| tree.validate().is_ok()))
    }
}
