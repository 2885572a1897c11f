//! Property tests that run every tree kind through random operation queues.

mod balance;
mod membership;

use quickcheck::{Arbitrary, Gen};
use steptree::{AnyTree, Operation, TreeConfig, TreeKind};

/// An enum for the various kinds of "things" to do to
/// search trees in a quicktest.
#[derive(Copy, Clone, Debug)]
pub enum Op<T> {
    /// Insert the value into the tree
    Insert(T),
    /// Remove the value from the tree
    Remove(T),
}

impl<T> Arbitrary for Op<T>
where
    T: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation. Inserts are
    /// twice as likely as removals so the trees actually grow.
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 0, 1]).unwrap() {
            0 => Op::Insert(T::arbitrary(g)),
            1 => Op::Remove(T::arbitrary(g)),
            _ => unreachable!(),
        }
    }
}

impl<T: Clone> Op<T> {
    /// The queue entry that does the same thing.
    pub fn operation(&self) -> Operation<T> {
        match self {
            Op::Insert(value) => Operation::insert(value.clone()),
            Op::Remove(value) => Operation::remove(value.clone()),
        }
    }
}

/// An empty tree of the given kind. The degree only matters for B-trees.
pub fn empty(kind: TreeKind, degree: usize) -> AnyTree<i8> {
    let config = TreeConfig::new().with_kind(kind).with_degree(degree);
    AnyTree::new(&config).unwrap()
}
