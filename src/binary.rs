//! Persistent binary search trees and the machinery shared by their balanced variants.
//!
//! Nodes are never modified. Inserting or removing a value rebuilds the path from the
//! edit point up to the root and shares every untouched subtree with the previous tree
//! through [`Rc`]s. Each level of that rebuild re-hangs the snapshots produced below it
//! under a fresh copy of itself, so every intermediate state of the operation is
//! available as a complete tree.
//!
//! What differs between the plain tree, the [AVL tree][crate::avl] and the
//! [red-black tree][crate::red_black] is plugged in through the [`Balance`] trait:
//! after a child changed, [`Balance::balance_with_steps`] gets to repair the node
//! that owns it.
//!
//! # Examples
//!
//! ```
//! use steptree::binary::Bst;
//! use steptree::step::StepKind;
//! use steptree::tree::SearchTree;
//!
//! let tree = Bst::new().add(2).add(1).add(3);
//!
//! // Removing a node with two children first removes its successor...
//! let trace = tree.remove_with_steps(&2);
//! let kinds: Vec<_> = trace.iter().map(|(_, step)| step.kind()).collect();
//! assert_eq!(kinds, [StepKind::Remove, StepKind::Replace]);
//!
//! // ...and every snapshot is a complete tree.
//! assert_eq!(trace[0].0.to_string(), "(2 (1) ())");
//! assert_eq!(trace[1].0.to_string(), "(3 (1) ())");
//!
//! // The original tree is untouched.
//! assert_eq!(tree.to_string(), "(2 (1) (3))");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::error::{TreeError, TreeResult};
use crate::step::Step;
use crate::tree::{SearchTree, Trace};

/// An optional child, shared between all trees that contain it.
pub type Link<N> = Option<Rc<N>>;

/// Which child of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// The left child, holding smaller values.
    Left,
    /// The right child, holding larger (or equal) values.
    Right,
}

impl Side {
    /// The other side.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Read access to a binary node. This is everything needed to search or render a tree.
pub trait BinaryNode: Sized {
    /// The type of the stored value.
    type Value: Ord + Clone + fmt::Debug;

    /// The value stored in this node.
    fn value(&self) -> &Self::Value;

    /// The left child.
    fn left(&self) -> &Link<Self>;

    /// The right child.
    fn right(&self) -> &Link<Self>;

    /// The child on `side`.
    fn child(&self, side: Side) -> &Link<Self> {
        match side {
            Side::Left => self.left(),
            Side::Right => self.right(),
        }
    }

    /// Whether this node has no children.
    fn is_leaf(&self) -> bool {
        self.left().is_none() && self.right().is_none()
    }

    /// Writes the label a diagram would show for this node.
    fn fmt_label(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        Self::Value: fmt::Display,
    {
        write!(f, "{}", self.value())
    }
}

/// The rebalancing strategy of a binary node kind.
///
/// The shared descent calls [`balance_with_steps`][Balance::balance_with_steps] on every
/// node of the search path, bottom-up, right after one of its children changed.
pub trait Balance: BinaryNode {
    /// State a child hands to its parent while a removal unwinds, e.g. a missing black node.
    type Mark: Copy + Default + fmt::Debug;

    /// A new node without children.
    fn leaf(value: Self::Value) -> Self;

    /// A copy of this node with different children. Derived data (like a height) is
    /// recomputed, node data (like a color) is kept.
    fn with_children(&self, left: Link<Self>, right: Link<Self>) -> Self;

    /// A copy of this node holding a different value.
    fn with_value(&self, value: Self::Value) -> Self;

    /// A copy of this node with the child on `side` replaced.
    fn with_child(&self, side: Side, child: Link<Self>) -> Self {
        match side {
            Side::Left => self.with_children(child, self.right().clone()),
            Side::Right => self.with_children(self.left().clone(), child),
        }
    }

    /// Repairs `node` after its child on `side` changed. `mark` is what that child handed up
    /// (always the default after an insertion).
    fn balance_with_steps(node: Rc<Self>, side: Side, mark: Self::Mark) -> Unwind<Self>;

    /// Removes `node`, which has at most one child, putting `replacement` in its place.
    fn unlink(node: &Self, replacement: Link<Self>) -> Unwind<Self> {
        Unwind::settled(vec![(replacement, Step::remove(node.value().clone()))])
    }

    /// Final touches on the root once an operation has unwound completely.
    fn finish_with_steps(_root: &Rc<Self>) -> Trace<Link<Self>, Self::Value> {
        Vec::new()
    }

    /// Checks the invariants specific to this node kind for the tree rooted at `root`.
    fn check(root: &Link<Self>) -> TreeResult<()>;
}

/// The snapshots one level of an operation produced, plus what it hands to its parent.
#[derive(Debug)]
pub struct Unwind<N: Balance> {
    /// Every intermediate subtree, each with the step that produced it.
    pub trace: Trace<Link<N>, N::Value>,
    /// What the parent still has to repair.
    pub mark: N::Mark,
}

impl<N: Balance> Unwind<N> {
    /// Snapshots that leave nothing for the parent to repair.
    pub fn settled(trace: Trace<Link<N>, N::Value>) -> Self {
        Self {
            trace,
            mark: N::Mark::default(),
        }
    }
}

/// Returns the node that results from rotating `node` in `direction`: rotating left lifts the
/// right child, rotating right lifts the left child. Returns `None` if there is no child to lift.
///
/// ```text
///      node                  lifted
///     /    \     left        /    \
///    x    lifted  ->       node    z
///         /   \           /   \
///        y     z         x     y
/// ```
pub fn rotate<N: Balance>(node: &N, direction: Side) -> Option<N> {
    let lifted = node.child(direction.opposite()).as_ref()?;
    let lowered = node.with_child(direction.opposite(), lifted.child(direction).clone());
    Some(lifted.with_child(direction, Some(Rc::new(lowered))))
}

/// The step recording a rotation in `direction` at `value`.
pub fn rotation_step<T>(direction: Side, value: T) -> Step<T> {
    match direction {
        Side::Left => Step::rotate_left(value),
        Side::Right => Step::rotate_right(value),
    }
}

/// Re-hangs every snapshot of the subtree on `side` under a copy of `node`. Also returns the
/// copy made for the last snapshot (or `node` itself when there were none).
pub fn rewrap<N: Balance>(
    node: &Rc<N>,
    side: Side,
    below: Trace<Link<N>, N::Value>,
) -> (Trace<Link<N>, N::Value>, Rc<N>) {
    let mut current = Rc::clone(node);
    let trace = below
        .into_iter()
        .map(|(child, step)| {
            current = Rc::new(node.with_child(side, child));
            (Some(Rc::clone(&current)), step)
        })
        .collect();
    (trace, current)
}

fn add_at<N: Balance>(link: &Link<N>, value: N::Value) -> Trace<Link<N>, N::Value> {
    let Some(node) = link else {
        return vec![(Some(Rc::new(N::leaf(value.clone()))), Step::add(value))];
    };

    // Equal values go to the right.
    let side = if value < *node.value() {
        Side::Left
    } else {
        Side::Right
    };
    let below = add_at(node.child(side), value);
    let (mut trace, current) = rewrap(node, side, below);
    trace.extend(N::balance_with_steps(current, side, N::Mark::default()).trace);
    trace
}

fn remove_at<N: Balance>(link: &Link<N>, value: &N::Value) -> Unwind<N> {
    let Some(node) = link else {
        return Unwind::settled(Vec::new());
    };

    match value.cmp(node.value()) {
        Ordering::Less => unwind(node, Side::Left, remove_at(node.left(), value)),
        Ordering::Greater => unwind(node, Side::Right, remove_at(node.right(), value)),
        Ordering::Equal => match (node.left(), node.right()) {
            // With two children the in-order successor is removed from the right subtree
            // first and then takes this node's place.
            (Some(_), Some(right)) => {
                let successor = leftmost(right).value().clone();
                let below = remove_leftmost(right);
                let (mut trace, current) = rewrap(node, Side::Right, below.trace);
                let replaced = Rc::new(current.with_value(successor.clone()));
                trace.push((
                    Some(Rc::clone(&replaced)),
                    Step::replace(node.value().clone(), successor),
                ));

                let balanced = N::balance_with_steps(replaced, Side::Right, below.mark);
                trace.extend(balanced.trace);
                Unwind {
                    trace,
                    mark: balanced.mark,
                }
            }
            (left, right) => N::unlink(node, left.clone().or_else(|| right.clone())),
        },
    }
}

fn remove_leftmost<N: Balance>(node: &Rc<N>) -> Unwind<N> {
    match node.left() {
        Some(left) => unwind(node, Side::Left, remove_leftmost(left)),
        None => N::unlink(node, node.right().clone()),
    }
}

/// Hangs the snapshots of a removal below `side` under `node` and lets `node` repair itself.
fn unwind<N: Balance>(node: &Rc<N>, side: Side, below: Unwind<N>) -> Unwind<N> {
    if below.trace.is_empty() {
        return below;
    }

    let (mut trace, current) = rewrap(node, side, below.trace);
    let balanced = N::balance_with_steps(current, side, below.mark);
    trace.extend(balanced.trace);
    Unwind {
        trace,
        mark: balanced.mark,
    }
}

fn leftmost<N: BinaryNode>(node: &Rc<N>) -> &N {
    let mut node = node.as_ref();
    while let Some(left) = node.left() {
        node = left;
    }
    node
}

/// Height of the subtree at `link`, computed by walking it.
pub fn height<N: BinaryNode>(link: &Link<N>) -> usize {
    link.as_ref()
        .map_or(0, |node| height(node.left()).max(height(node.right())) + 1)
}

fn size<N: BinaryNode>(link: &Link<N>) -> usize {
    link.as_ref()
        .map_or(0, |node| size(node.left()) + size(node.right()) + 1)
}

fn collect_in_order<'a, N: BinaryNode>(link: &'a Link<N>, values: &mut Vec<&'a N::Value>) {
    if let Some(node) = link {
        collect_in_order(node.left(), values);
        values.push(node.value());
        collect_in_order(node.right(), values);
    }
}

/// A binary search tree snapshot. What kind of tree it is depends on the node type `N`.
pub struct BinaryTree<N> {
    root: Link<N>,
}

/// A plain binary search tree that never rebalances.
pub type Bst<T> = BinaryTree<Node<T>>;

impl<N> Clone for BinaryTree<N> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
        }
    }
}

impl<N> Default for BinaryTree<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: fmt::Debug> fmt::Debug for BinaryTree<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryTree")
            .field("root", &self.root)
            .finish()
    }
}

impl<N> BinaryTree<N> {
    /// Generates a new, empty tree.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// The root node, if any.
    pub fn root(&self) -> Option<&N> {
        self.root.as_deref()
    }
}

impl<N: Balance> BinaryTree<N> {
    fn from_trace(mut trace: Trace<Link<N>, N::Value>) -> Trace<Self, N::Value> {
        if let Some(Some(root)) = trace.last().map(|(root, _)| root.clone()) {
            trace.extend(N::finish_with_steps(&root));
        }
        trace
            .into_iter()
            .map(|(root, step)| (Self { root }, step))
            .collect()
    }
}

impl<N: Balance> SearchTree for BinaryTree<N> {
    type Value = N::Value;

    fn add_with_steps(&self, value: N::Value) -> Trace<Self, N::Value> {
        Self::from_trace(add_at(&self.root, value))
    }

    fn remove_with_steps(&self, value: &N::Value) -> Trace<Self, N::Value> {
        // A mark that reaches the root has nothing left to repair.
        Self::from_trace(remove_at(&self.root, value).trace)
    }

    fn contains(&self, value: &N::Value) -> bool {
        let mut link = &self.root;
        while let Some(node) = link {
            link = match value.cmp(node.value()) {
                Ordering::Less => node.left(),
                Ordering::Equal => return true,
                Ordering::Greater => node.right(),
            };
        }
        false
    }

    fn in_order(&self) -> Vec<&N::Value> {
        let mut values = Vec::new();
        collect_in_order(&self.root, &mut values);
        values
    }

    fn height(&self) -> usize {
        height(&self.root)
    }

    fn size(&self) -> usize {
        size(&self.root)
    }

    fn validate(&self) -> TreeResult<()> {
        let values = self.in_order();
        if let Some(pair) = values.windows(2).find(|pair| pair[0] > pair[1]) {
            return Err(TreeError::invariant(format!(
                "{:?} comes before {:?} in order",
                pair[0], pair[1]
            )));
        }
        N::check(&self.root)
    }
}

impl<N: BinaryNode> fmt::Display for BinaryTree<N>
where
    N::Value: fmt::Display,
{
    /// Nested brackets: `(20 (10) ())` is 20 with only a left child 10.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => fmt_subtree(root.as_ref(), f),
            None => f.write_str("()"),
        }
    }
}

fn fmt_subtree<N: BinaryNode>(node: &N, f: &mut fmt::Formatter<'_>) -> fmt::Result
where
    N::Value: fmt::Display,
{
    f.write_str("(")?;
    node.fmt_label(f)?;
    if !node.is_leaf() {
        for child in [node.left(), node.right()] {
            f.write_str(" ")?;
            match child {
                Some(child) => fmt_subtree(child.as_ref(), f)?,
                None => f.write_str("()")?,
            }
        }
    }
    f.write_str(")")
}

/// A node of a plain binary search tree: a value and two optional children.
#[derive(Debug)]
pub struct Node<T> {
    value: T,
    left: Link<Self>,
    right: Link<Self>,
}

impl<T: Ord + Clone + fmt::Debug> BinaryNode for Node<T> {
    type Value = T;

    fn value(&self) -> &T {
        &self.value
    }

    fn left(&self) -> &Link<Self> {
        &self.left
    }

    fn right(&self) -> &Link<Self> {
        &self.right
    }
}

impl<T: Ord + Clone + fmt::Debug> Balance for Node<T> {
    type Mark = ();

    fn leaf(value: T) -> Self {
        Self {
            value,
            left: None,
            right: None,
        }
    }

    fn with_children(&self, left: Link<Self>, right: Link<Self>) -> Self {
        Self {
            value: self.value.clone(),
            left,
            right,
        }
    }

    fn with_value(&self, value: T) -> Self {
        Self {
            value,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }

    fn balance_with_steps(_node: Rc<Self>, _side: Side, _mark: ()) -> Unwind<Self> {
        Unwind::settled(Vec::new())
    }

    fn check(_root: &Link<Self>) -> TreeResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepKind;

    fn build(values: &[i32]) -> Bst<i32> {
        values.iter().fold(Bst::new(), |tree, &value| tree.add(value))
    }

    fn kinds<S>(trace: &Trace<S, i32>) -> Vec<StepKind> {
        trace.iter().map(|(_, step)| step.kind()).collect()
    }

    #[test]
    fn test_add_emits_one_step() {
        let tree = build(&[2, 1]);
        let trace = tree.add_with_steps(3);

        assert_eq!(kinds(&trace), [StepKind::Add]);
        assert_eq!(trace[0].1.values(), &[3]);
        assert_eq!(trace[0].0.to_string(), "(2 (1) (3))");
    }

    #[test]
    fn test_add_shares_untouched_subtrees() {
        let tree = build(&[2, 1]);
        let new_tree = tree.add(3);

        let (Some(old), Some(new)) = (&tree.root, &new_tree.root) else {
            panic!("both trees have roots");
        };
        let (Some(old_left), Some(new_left)) = (old.left(), new.left()) else {
            panic!("both roots have left children");
        };
        assert!(Rc::ptr_eq(old_left, new_left));
    }

    #[test]
    fn test_delete_no_children() {
        let tree = build(&[1, 2]);
        let trace = tree.remove_with_steps(&2);

        assert_eq!(kinds(&trace), [StepKind::Remove]);
        assert_eq!(trace[0].0.to_string(), "(1)");
        assert!(tree.contains(&2));
    }

    #[test]
    fn test_delete_one_child() {
        let tree = build(&[1, 2, 3]);
        let trace = tree.remove_with_steps(&2);

        assert_eq!(kinds(&trace), [StepKind::Remove]);
        assert_eq!(trace[0].0.to_string(), "(1 () (3))");
    }

    #[test]
    fn test_delete_two_children_with_grandchild() {
        let tree = build(&[2, 1, 4, 3]);
        let trace = tree.remove_with_steps(&2);

        assert_eq!(kinds(&trace), [StepKind::Remove, StepKind::Replace]);
        assert_eq!(trace[1].1.values(), &[2, 3]);
        assert_eq!(trace[1].0.to_string(), "(3 (1) (4))");
    }

    #[test]
    fn test_delete_missing_value_is_empty() {
        let tree = build(&[2, 1, 3]);

        assert!(tree.remove_with_steps(&42).is_empty());
        assert!(tree.remove_with_steps(&42).is_empty());
        assert!(Bst::<i32>::new().remove_with_steps(&1).is_empty());
    }

    #[test]
    fn test_duplicates_go_right() {
        let tree = build(&[2, 2]);

        assert_eq!(tree.to_string(), "(2 () (2))");
        assert_eq!(tree.size(), 2);

        let tree = tree.remove(&2);
        assert_eq!(tree.to_string(), "(2)");
        assert!(tree.contains(&2));
    }

    #[test]
    fn test_height_and_size() {
        let tree = build(&[1, 2, 3, 4]);
        assert_eq!(tree.height(), 4);
        assert_eq!(tree.size(), 4);
        assert_eq!(tree.in_order(), [&1, &2, &3, &4]);
        assert!(Bst::<i32>::new().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Bst::<i32>::new().to_string(), "()");
        assert_eq!(build(&[1]).to_string(), "(1)");
        assert_eq!(build(&[1, 3]).to_string(), "(1 () (3))");
        assert_eq!(build(&[2, 1, 3]).to_string(), "(2 (1) (3))");
        assert_eq!(build(&[3, 2, 1]).to_string(), "(3 (2 (1) ()) ())");
    }

    #[test]
    fn test_rotate() {
        let tree = build(&[1, 2, 3]);
        let Some(root) = tree.root() else {
            panic!("tree has a root");
        };

        let Some(rotated) = rotate(root, Side::Left) else {
            panic!("root has a right child");
        };
        let rotated = BinaryTree {
            root: Some(Rc::new(rotated)),
        };
        assert_eq!(rotated.to_string(), "(2 (1) (3))");
        assert!(rotate(root, Side::Right).is_none());
    }
}
