//! Red-black trees.
//!
//! New nodes are red. After an insertion, every node on the search path checks whether
//! its child on that path is red and has a red child of its own:
//!
//! * with a red uncle the parent and uncle turn black and the grandparent red, which may
//!   move the problem two levels up;
//! * with a black uncle an inner grandchild is first rotated to the outside, then the
//!   grandparent is rotated down and swaps colors with the parent.
//!
//! Removing a black node without a red child to take its place leaves its parent one
//! black node short on that side. That deficit travels upward as a [`Mark`] handed from
//! child to parent while the removal unwinds. It never ends up in a node: the parent
//! resolves it with the four textbook cases (red sibling, black sibling with black
//! children, black sibling with only a red near child, black sibling with a red far
//! child), or passes it on to its own parent.
//!
//! The root is recolored black at the end of every operation. Recolorings that happen
//! together are reported as a single [`Color`][crate::step::StepKind::Color] step.
//!
//! # Examples
//!
//! ```
//! use steptree::red_black::RedBlackTree;
//! use steptree::step::Step;
//! use steptree::tree::SearchTree;
//!
//! let tree = RedBlackTree::new().add(10).add(20);
//! let trace = tree.add_with_steps(30);
//!
//! let steps: Vec<_> = trace.iter().map(|(_, step)| step.clone()).collect();
//! assert_eq!(
//!     steps,
//!     [Step::add(30), Step::rotate_left(10), Step::color(vec![20, 10])]
//! );
//! assert_eq!(trace[2].0.to_string(), "(20:B (10:R) (30:R))");
//! ```

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::binary::{
    rewrap, rotate, rotation_step, Balance, BinaryNode, BinaryTree, Link, Side, Unwind,
};
use crate::error::{TreeError, TreeResult};
use crate::step::Step;
use crate::tree::Trace;

/// A self-balancing binary search tree with colored nodes.
pub type RedBlackTree<T> = BinaryTree<RedBlackNode<T>>;

/// The color of a [`RedBlackNode`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    /// A red node never has a red child.
    Red,
    /// Every path down from a node passes the same number of black nodes.
    Black,
}

/// What a removal hands from a child to its parent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mark {
    /// Nothing to repair.
    #[default]
    Clear,
    /// The child's subtree has one black node fewer than its sibling's.
    DoubleBlack,
}

/// A node of a [`RedBlackTree`].
#[derive(Debug)]
pub struct RedBlackNode<T> {
    value: T,
    color: Color,
    left: Link<Self>,
    right: Link<Self>,
}

impl<T: Clone> RedBlackNode<T> {
    /// The color of this node.
    pub fn color(&self) -> Color {
        self.color
    }

    fn with_color(&self, color: Color) -> Self {
        Self {
            value: self.value.clone(),
            color,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}

fn is_red<T>(link: &Link<RedBlackNode<T>>) -> bool {
    link.as_ref().is_some_and(|node| node.color == Color::Red)
}

/// One step listing every node whose color actually changes, if any does.
fn color_step<T: Clone>(changes: &[(&RedBlackNode<T>, Color)]) -> Option<Step<T>> {
    let values: Vec<_> = changes
        .iter()
        .filter(|(node, color)| node.color != *color)
        .map(|(node, _)| node.value.clone())
        .collect();
    (!values.is_empty()).then(|| Step::color(values))
}

impl<T: Ord + Clone + fmt::Debug> BinaryNode for RedBlackNode<T> {
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

    fn fmt_label(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        Self::Value: fmt::Display,
    {
        let color = match self.color {
            Color::Red => "R",
            Color::Black => "B",
        };
        write!(f, "{}:{color}", self.value)
    }
}

impl<T: Ord + Clone + fmt::Debug> Balance for RedBlackNode<T> {
    type Mark = Mark;

    fn leaf(value: T) -> Self {
        Self {
            value,
            color: Color::Red,
            left: None,
            right: None,
        }
    }

    fn with_children(&self, left: Link<Self>, right: Link<Self>) -> Self {
        Self {
            value: self.value.clone(),
            color: self.color,
            left,
            right,
        }
    }

    fn with_value(&self, value: T) -> Self {
        Self {
            value,
            color: self.color,
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }

    fn balance_with_steps(node: Rc<Self>, side: Side, mark: Mark) -> Unwind<Self> {
        match mark {
            Mark::Clear => Unwind::settled(fix_double_red(&node, side)),
            Mark::DoubleBlack => fix_double_black(node, side),
        }
    }

    fn unlink(node: &Self, replacement: Link<Self>) -> Unwind<Self> {
        let mut trace = vec![(replacement.clone(), Step::remove(node.value.clone()))];
        if node.color == Color::Red {
            return Unwind::settled(trace);
        }

        match replacement {
            Some(child) if child.color == Color::Red => {
                trace.push((
                    Some(Rc::new(child.with_color(Color::Black))),
                    Step::color(vec![child.value.clone()]),
                ));
                Unwind::settled(trace)
            }
            _ => Unwind {
                trace,
                mark: Mark::DoubleBlack,
            },
        }
    }

    fn finish_with_steps(root: &Rc<Self>) -> Trace<Link<Self>, T> {
        match color_step(&[(root.as_ref(), Color::Black)]) {
            Some(step) => vec![(Some(Rc::new(root.with_color(Color::Black))), step)],
            None => Vec::new(),
        }
    }

    fn check(root: &Link<Self>) -> TreeResult<()> {
        if let Some(root) = root.as_ref().filter(|root| root.color == Color::Red) {
            return Err(TreeError::invariant(format!(
                "root {:?} is red",
                root.value
            )));
        }
        check_colors(root).map(drop)
    }
}

/// Repairs a red child with a red grandchild below `node` on `side`.
fn fix_double_red<T: Ord + Clone + fmt::Debug>(
    node: &Rc<RedBlackNode<T>>,
    side: Side,
) -> Trace<Link<RedBlackNode<T>>, T> {
    let Some(parent) = node.child(side) else {
        return Vec::new();
    };
    if parent.color == Color::Black {
        return Vec::new();
    }
    let Some(red_side) = [side, side.opposite()]
        .into_iter()
        .find(|&s| is_red(parent.child(s)))
    else {
        return Vec::new();
    };

    if let Some(uncle) = node
        .child(side.opposite())
        .as_ref()
        .filter(|uncle| uncle.color == Color::Red)
    {
        trace!(grandparent = ?node.value, "double red below a red uncle");
        let step = color_step(&[
            (parent.as_ref(), Color::Black),
            (uncle.as_ref(), Color::Black),
            (node.as_ref(), Color::Red),
        ]);
        let parent = Some(Rc::new(parent.with_color(Color::Black)));
        let uncle = Some(Rc::new(uncle.with_color(Color::Black)));
        let (left, right) = match side {
            Side::Left => (parent, uncle),
            Side::Right => (uncle, parent),
        };
        let recolored = RedBlackNode {
            color: Color::Red,
            ..node.with_children(left, right)
        };
        return step
            .map(|step| vec![(Some(Rc::new(recolored)), step)])
            .unwrap_or_default();
    }

    let mut trace = Vec::new();
    let mut grandparent = Rc::clone(node);
    if red_side != side {
        trace!(grandparent = ?node.value, "double red on the inside");
        if let Some(rotated) = rotate(parent.as_ref(), side) {
            grandparent = Rc::new(grandparent.with_child(side, Some(Rc::new(rotated))));
            trace.push((
                Some(Rc::clone(&grandparent)),
                rotation_step(side, parent.value.clone()),
            ));
        }
    }

    trace!(grandparent = ?node.value, "double red on the outside");
    let direction = side.opposite();
    let Some(rotated) = rotate(grandparent.as_ref(), direction) else {
        return trace;
    };
    let rotated = Rc::new(rotated);
    trace.push((
        Some(Rc::clone(&rotated)),
        rotation_step(direction, grandparent.value.clone()),
    ));

    let Some(lowered) = rotated.child(direction) else {
        return trace;
    };
    let step = color_step(&[
        (rotated.as_ref(), Color::Black),
        (lowered.as_ref(), Color::Red),
    ]);
    if let Some(step) = step {
        let lowered = Rc::new(lowered.with_color(Color::Red));
        let recolored = RedBlackNode {
            color: Color::Black,
            ..rotated.with_child(direction, Some(lowered))
        };
        trace.push((Some(Rc::new(recolored)), step));
    }
    trace
}

/// Repairs `node` whose subtree on `side` lacks one black node.
fn fix_double_black<T: Ord + Clone + fmt::Debug>(
    node: Rc<RedBlackNode<T>>,
    side: Side,
) -> Unwind<RedBlackNode<T>> {
    let far_side = side.opposite();
    let Some(sibling) = node.child(far_side).clone() else {
        // Only possible if the tree was broken to begin with.
        return Unwind {
            trace: Vec::new(),
            mark: Mark::DoubleBlack,
        };
    };
    let mut trace = Vec::new();

    if sibling.color == Color::Red {
        trace!(parent = ?node.value, "double black with a red sibling");
        let Some(rotated) = rotate(node.as_ref(), side) else {
            return Unwind::settled(trace);
        };
        let rotated = Rc::new(rotated);
        trace.push((
            Some(Rc::clone(&rotated)),
            rotation_step(side, node.value.clone()),
        ));

        let Some(lowered) = rotated.child(side).clone() else {
            return Unwind::settled(trace);
        };
        let step = color_step(&[
            (rotated.as_ref(), Color::Black),
            (lowered.as_ref(), Color::Red),
        ]);
        let lowered = Rc::new(lowered.with_color(Color::Red));
        let top = Rc::new(RedBlackNode {
            color: Color::Black,
            ..rotated.with_child(side, Some(Rc::clone(&lowered)))
        });
        if let Some(step) = step {
            trace.push((Some(Rc::clone(&top)), step));
        }

        // The lowered node is red now, so the deficit ends below it.
        let below = fix_double_black(lowered, side);
        let (below_trace, _) = rewrap(&top, side, below.trace);
        trace.extend(below_trace);
        return Unwind {
            trace,
            mark: below.mark,
        };
    }

    let near_red = is_red(sibling.child(side));
    let far_red = is_red(sibling.child(far_side));

    if !near_red && !far_red {
        trace!(parent = ?node.value, "double black with a black sibling and black nephews");
        let step = color_step(&[
            (sibling.as_ref(), Color::Red),
            (node.as_ref(), Color::Black),
        ]);
        let mark = match node.color {
            Color::Red => Mark::Clear,
            Color::Black => Mark::DoubleBlack,
        };
        let recolored = RedBlackNode {
            color: Color::Black,
            ..node.with_child(far_side, Some(Rc::new(sibling.with_color(Color::Red))))
        };
        if let Some(step) = step {
            trace.push((Some(Rc::new(recolored)), step));
        }
        return Unwind { trace, mark };
    }

    let mut node = node;
    let mut sibling = sibling;
    if !far_red {
        trace!(parent = ?node.value, "double black with a red near nephew");
        if let Some(rotated) = rotate(sibling.as_ref(), far_side) {
            let rotated = Rc::new(rotated);
            node = Rc::new(node.with_child(far_side, Some(Rc::clone(&rotated))));
            trace.push((
                Some(Rc::clone(&node)),
                rotation_step(far_side, sibling.value.clone()),
            ));

            if let Some(lowered) = rotated.child(far_side) {
                let step = color_step(&[
                    (rotated.as_ref(), Color::Black),
                    (lowered.as_ref(), Color::Red),
                ]);
                let lowered = Rc::new(lowered.with_color(Color::Red));
                sibling = Rc::new(RedBlackNode {
                    color: Color::Black,
                    ..rotated.with_child(far_side, Some(lowered))
                });
                node = Rc::new(node.with_child(far_side, Some(Rc::clone(&sibling))));
                if let Some(step) = step {
                    trace.push((Some(Rc::clone(&node)), step));
                }
            }
        }
    }

    trace!(parent = ?node.value, "double black with a red far nephew");
    let Some(far) = sibling.child(far_side).clone() else {
        return Unwind::settled(trace);
    };
    let step = color_step(&[
        (sibling.as_ref(), node.color),
        (node.as_ref(), Color::Black),
        (far.as_ref(), Color::Black),
    ]);
    let sibling = RedBlackNode {
        color: node.color,
        ..sibling.with_child(far_side, Some(Rc::new(far.with_color(Color::Black))))
    };
    let recolored = Rc::new(RedBlackNode {
        color: Color::Black,
        ..node.with_child(far_side, Some(Rc::new(sibling)))
    });
    if let Some(step) = step {
        trace.push((Some(Rc::clone(&recolored)), step));
    }
    if let Some(rotated) = rotate(recolored.as_ref(), side) {
        trace.push((
            Some(Rc::new(rotated)),
            rotation_step(side, node.value.clone()),
        ));
    }
    Unwind::settled(trace)
}

/// Verifies the coloring below `link`, returning its black height (counting the empty leaves).
fn check_colors<T: fmt::Debug>(link: &Link<RedBlackNode<T>>) -> TreeResult<usize> {
    let Some(node) = link else {
        return Ok(1);
    };

    if node.color == Color::Red && (is_red(&node.left) || is_red(&node.right)) {
        return Err(TreeError::invariant(format!(
            "red node {:?} has a red child",
            node.value
        )));
    }
    let left = check_colors(&node.left)?;
    let right = check_colors(&node.right)?;
    if left != right {
        return Err(TreeError::invariant(format!(
            "node {:?} has black heights {left} and {right}",
            node.value
        )));
    }
    Ok(left + usize::from(node.color == Color::Black))
}
