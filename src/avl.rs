//! AVL trees: binary search trees whose nodes remember their height.
//!
//! After a child changed, a node compares the heights of its two subtrees. If they
//! differ by more than one it rotates toward the shorter side, first straightening
//! the taller child with a rotation of its own when that child leans inward. Every
//! node on the search path gets this check, so removals (which can shorten a subtree
//! at several levels) are repaired all the way up.
//!
//! # Examples
//!
//! ```
//! use steptree::avl::AvlTree;
//! use steptree::step::Step;
//! use steptree::tree::SearchTree;
//!
//! let tree = AvlTree::new().add(30).add(20);
//! let trace = tree.add_with_steps(10);
//!
//! // The insertion itself, then a single rotation restores the balance.
//! let steps: Vec<_> = trace.iter().map(|(_, step)| step.clone()).collect();
//! assert_eq!(steps, [Step::add(10), Step::rotate_right(30)]);
//! assert_eq!(trace[1].0.to_string(), "(20 (10) (30))");
//!
//! // The snapshot in between is not balanced.
//! assert!(trace[0].0.validate().is_err());
//! assert!(trace[1].0.validate().is_ok());
//! ```

use std::fmt;
use std::rc::Rc;

use crate::binary::{rotate, rotation_step, Balance, BinaryNode, BinaryTree, Link, Side, Unwind};
use crate::error::{TreeError, TreeResult};
use crate::tree::Trace;

/// A self-balancing binary search tree.
pub type AvlTree<T> = BinaryTree<AvlNode<T>>;

/// A node of an [`AvlTree`].
#[derive(Debug)]
pub struct AvlNode<T> {
    value: T,
    left: Link<Self>,
    right: Link<Self>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    height: usize,
}

impl<T> AvlNode<T> {
    /// The number of levels in the subtree rooted at this node.
    pub fn height(&self) -> usize {
        self.height
    }
}

fn link_height<T>(link: &Link<AvlNode<T>>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

impl<T: Ord + Clone + fmt::Debug> BinaryNode for AvlNode<T> {
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

impl<T: Ord + Clone + fmt::Debug> Balance for AvlNode<T> {
    type Mark = ();

    fn leaf(value: T) -> Self {
        Self {
            value,
            left: None,
            right: None,
            height: 1,
        }
    }

    fn with_children(&self, left: Link<Self>, right: Link<Self>) -> Self {
        Self {
            height: link_height(&left).max(link_height(&right)) + 1,
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
            height: self.height,
        }
    }

    fn balance_with_steps(node: Rc<Self>, _side: Side, _mark: ()) -> Unwind<Self> {
        Unwind::settled(balance(node))
    }

    fn check(root: &Link<Self>) -> TreeResult<()> {
        check_heights(root).map(drop)
    }
}

/// Rotates `node` if its subtrees' heights differ by more than one.
fn balance<T: Ord + Clone + fmt::Debug>(node: Rc<AvlNode<T>>) -> Trace<Link<AvlNode<T>>, T> {
    let left_height = link_height(&node.left);
    let right_height = link_height(&node.right);
    let direction = if right_height > left_height + 1 {
        Side::Left
    } else if left_height > right_height + 1 {
        Side::Right
    } else {
        return Vec::new();
    };

    let heavy_side = direction.opposite();
    let Some(heavy) = node.child(heavy_side).clone() else {
        return Vec::new();
    };

    let mut trace = Vec::new();
    let mut pivot = node;
    if link_height(heavy.child(direction)) > link_height(heavy.child(heavy_side)) {
        if let Some(straightened) = rotate(heavy.as_ref(), heavy_side) {
            pivot = Rc::new(pivot.with_child(heavy_side, Some(Rc::new(straightened))));
            trace.push((
                Some(Rc::clone(&pivot)),
                rotation_step(heavy_side, heavy.value.clone()),
            ));
        }
    }
    if let Some(rotated) = rotate(pivot.as_ref(), direction) {
        trace.push((
            Some(Rc::new(rotated)),
            rotation_step(direction, pivot.value.clone()),
        ));
    }
    trace
}

/// Verifies cached heights and the balance of every node, returning the subtree's height.
fn check_heights<T: fmt::Debug>(link: &Link<AvlNode<T>>) -> TreeResult<usize> {
    let Some(node) = link else {
        return Ok(0);
    };

    let left_height = check_heights(&node.left)?;
    let right_height = check_heights(&node.right)?;
    let height = left_height.max(right_height) + 1;
    if node.height != height {
        return Err(TreeError::invariant(format!(
            "node {:?} caches height {} but has height {height}",
            node.value, node.height
        )));
    }
    if left_height.abs_diff(right_height) > 1 {
        return Err(TreeError::invariant(format!(
            "node {:?} has subtrees of heights {left_height} and {right_height}",
            node.value
        )));
    }
    Ok(height)
}
