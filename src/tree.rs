//! The interface every tree kind offers.
//!
//! A tree is an immutable snapshot. [`add_with_steps`][SearchTree::add_with_steps]
//! and [`remove_with_steps`][SearchTree::remove_with_steps] never touch the
//! receiver; they return the whole sequence of snapshots the operation passes
//! through, each paired with the [`Step`] that produced it. The last snapshot of
//! a non-empty trace is the result of the operation.

use std::fmt;

use crate::error::TreeResult;
use crate::step::Step;

/// Every intermediate state `S` of one operation, each with the step that produced it.
pub type Trace<S, T> = Vec<(S, Step<T>)>;

/// Tree-level operations shared by all tree kinds.
pub trait SearchTree: Clone {
    /// The type of the stored values.
    type Value: Ord + Clone + fmt::Debug;

    /// Inserts `value`, returning every intermediate snapshot. The trace is never empty.
    fn add_with_steps(&self, value: Self::Value) -> Trace<Self, Self::Value>;

    /// Removes one occurrence of `value`, returning every intermediate snapshot. If the tree
    /// doesn't hold `value` the trace is empty.
    fn remove_with_steps(&self, value: &Self::Value) -> Trace<Self, Self::Value>;

    /// Whether the tree holds `value`.
    fn contains(&self, value: &Self::Value) -> bool;

    /// All values in ascending order.
    fn in_order(&self) -> Vec<&Self::Value>;

    /// Number of levels. An empty tree has a height of 0, a single node a height of 1.
    fn height(&self) -> usize;

    /// Number of stored values.
    fn size(&self) -> usize;

    /// Checks the structural invariants of this tree kind, reporting the first violation.
    fn validate(&self) -> TreeResult<()>;

    /// Whether the tree holds no values.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns a new tree that also holds `value`.
    fn add(&self, value: Self::Value) -> Self {
        last_snapshot(self, self.add_with_steps(value))
    }

    /// Returns a new tree without one occurrence of `value`. If the tree never held `value` the
    /// new tree is identical to this one.
    fn remove(&self, value: &Self::Value) -> Self {
        last_snapshot(self, self.remove_with_steps(value))
    }
}

fn last_snapshot<S: Clone, T>(original: &S, trace: Trace<S, T>) -> S {
    trace
        .into_iter()
        .last()
        .map_or_else(|| original.clone(), |(tree, _)| tree)
}
