//! Persistent B-trees of degree `t`.
//!
//! Every node but the root holds between `t - 1` and `2t - 1` keys and every internal node
//! has one child more than it has keys. All leaves are at the same depth.
//!
//! Insertion walks down from the root. A full node (`2t - 1` keys) on the way is split
//! before the walk enters it, its middle key moving up into the parent, and a node the
//! insertion itself filled up is split right after. Removal walks down as well and makes
//! sure it only ever enters a node that can spare a key: a child with `t - 1` keys first
//! steals a key from a sibling through the parent, or is merged with a sibling and the
//! separating key. A key found in an internal node is replaced by its predecessor (or
//! successor) from a child that can spare it, or pushed down into the merge of both
//! children. A root left without keys by a merge is replaced by its only child.
//!
//! # Examples
//!
//! ```
//! use steptree::btree::BTree;
//! use steptree::step::Step;
//! use steptree::tree::SearchTree;
//!
//! let tree = BTree::new(2)?.add(10).add(20);
//! let trace = tree.add_with_steps(30);
//!
//! let steps: Vec<_> = trace.iter().map(|(_, step)| step.clone()).collect();
//! assert_eq!(steps, [Step::add(30), Step::split(20)]);
//! assert_eq!(trace[1].0.to_string(), "[20]([10] [30])");
//!
//! let trace = trace[1].0.remove_with_steps(&30);
//! let steps: Vec<_> = trace.iter().map(|(_, step)| step.clone()).collect();
//! assert_eq!(steps, [Step::merge(20), Step::remove(30)]);
//! assert_eq!(trace[1].0.to_string(), "[10, 20]");
//! # Ok::<(), steptree::error::TreeError>(())
//! ```

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::config::MIN_DEGREE;
use crate::error::{TreeError, TreeResult};
use crate::step::Step;
use crate::tree::{SearchTree, Trace};

/// A node of a [`BTree`]: sorted keys and, unless it's a leaf, one more child than keys.
#[derive(Debug)]
pub struct BTreeNode<T> {
    values: Vec<T>,
    children: Vec<Rc<BTreeNode<T>>>,
}

impl<T> BTreeNode<T> {
    /// The keys of this node in ascending order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// The children of this node. Child `i` holds the values between key `i - 1` and key `i`.
    pub fn children(&self) -> &[Rc<BTreeNode<T>>] {
        &self.children
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn is_full(&self, degree: usize) -> bool {
        self.values.len() >= 2 * degree - 1
    }

    fn is_full_at(&self, index: usize, degree: usize) -> bool {
        let child = self.children.get(index);
        child.is_some_and(|child| child.is_full(degree))
    }

    /// Whether this node holds the minimum number of keys and so can't give one away.
    fn is_sparse(&self, degree: usize) -> bool {
        self.values.len() < degree
    }

    fn is_sparse_at(&self, index: usize, degree: usize) -> bool {
        let child = self.children.get(index);
        child.is_some_and(|child| child.is_sparse(degree))
    }

    fn max(&self) -> Option<&T> {
        match self.children.last() {
            Some(child) => child.max(),
            None => self.values.last(),
        }
    }

    fn min(&self) -> Option<&T> {
        match self.children.first() {
            Some(child) => child.min(),
            None => self.values.first(),
        }
    }

    fn height(&self) -> usize {
        self.children.first().map_or(0, |child| child.height()) + 1
    }

    fn size(&self) -> usize {
        let below: usize = self.children.iter().map(|child| child.size()).sum();
        self.values.len() + below
    }

    fn collect_in_order<'a>(&'a self, values: &mut Vec<&'a T>) {
        for (index, value) in self.values.iter().enumerate() {
            if let Some(child) = self.children.get(index) {
                child.collect_in_order(values);
            }
            values.push(value);
        }
        if let Some(child) = self.children.get(self.values.len()) {
            child.collect_in_order(values);
        }
    }
}

impl<T: Ord + Clone> BTreeNode<T> {
    fn leaf(values: Vec<T>) -> Self {
        Self {
            values,
            children: Vec::new(),
        }
    }

    fn contains(&self, value: &T) -> bool {
        let mut node = self;
        loop {
            let index = node.values.partition_point(|v| v < value);
            if node.values.get(index) == Some(value) {
                return true;
            }
            match node.children.get(index) {
                Some(child) => node = child,
                None => return false,
            }
        }
    }

    fn with_child(&self, index: usize, child: Rc<Self>) -> Self {
        let mut children = self.children.clone();
        children[index] = child;
        Self {
            values: self.values.clone(),
            children,
        }
    }

    fn with_value(&self, index: usize, value: T) -> Self {
        let mut values = self.values.clone();
        values[index] = value;
        Self {
            values,
            children: self.children.clone(),
        }
    }

    /// Splits the full child at `index` around its middle key, which moves up into this node.
    /// Returns the new node and the key that moved up.
    fn split_child(&self, index: usize) -> Option<(Self, T)> {
        let child = self.children.get(index)?;
        let middle = child.values.len() / 2;
        let promoted = child.values.get(middle)?.clone();
        let (left_children, right_children) = if child.is_leaf() {
            (Vec::new(), Vec::new())
        } else {
            (
                child.children[..=middle].to_vec(),
                child.children[middle + 1..].to_vec(),
            )
        };
        let left = Self {
            values: child.values[..middle].to_vec(),
            children: left_children,
        };
        let right = Self {
            values: child.values[middle + 1..].to_vec(),
            children: right_children,
        };

        let mut values = self.values.clone();
        values.insert(index, promoted.clone());
        let mut children = self.children.clone();
        children[index] = Rc::new(left);
        children.insert(index + 1, Rc::new(right));
        Some((Self { values, children }, promoted))
    }

    /// Merges the children at `index` and `index + 1` together with the key between them.
    fn merge_children(&self, index: usize) -> Option<Self> {
        let left = self.children.get(index)?;
        let right = self.children.get(index + 1)?;
        let separator = self.values.get(index)?;

        let mut merged_values = left.values.clone();
        merged_values.push(separator.clone());
        merged_values.extend_from_slice(&right.values);
        let merged = Self {
            values: merged_values,
            children: [&left.children[..], &right.children[..]].concat(),
        };

        let mut values = self.values.clone();
        values.remove(index);
        let mut children = self.children.clone();
        children.remove(index + 1);
        children[index] = Rc::new(merged);
        Some(Self { values, children })
    }

    /// Gives the child at `index` the key in front of it, which is replaced by the largest key
    /// of the left sibling. Only works if that sibling can spare a key.
    fn steal_from_left(&self, index: usize, degree: usize) -> Option<(Self, usize, Step<T>)> {
        let left = self.children.get(index.checked_sub(1)?)?;
        if left.is_sparse(degree) {
            return None;
        }
        let child = self.children.get(index)?;
        let separator = self.values.get(index - 1)?.clone();
        let (stolen, left_values) = left.values.split_last()?;
        let (moved, left_children) = match left.children.split_last() {
            Some((moved, rest)) => (Some(Rc::clone(moved)), rest.to_vec()),
            None => (None, Vec::new()),
        };

        let left = Self {
            values: left_values.to_vec(),
            children: left_children,
        };
        let mut child_values = vec![separator.clone()];
        child_values.extend_from_slice(&child.values);
        let mut child_children: Vec<_> = moved.into_iter().collect();
        child_children.extend(child.children.iter().cloned());
        let child = Self {
            values: child_values,
            children: child_children,
        };

        let mut values = self.values.clone();
        values[index - 1] = stolen.clone();
        let mut children = self.children.clone();
        children[index - 1] = Rc::new(left);
        children[index] = Rc::new(child);
        let step = Step::steal_left(separator, stolen.clone());
        Some((Self { values, children }, index, step))
    }

    /// Gives the child at `index` the key behind it, which is replaced by the smallest key of
    /// the right sibling. Only works if that sibling can spare a key.
    fn steal_from_right(&self, index: usize, degree: usize) -> Option<(Self, usize, Step<T>)> {
        let right = self.children.get(index + 1)?;
        if right.is_sparse(degree) {
            return None;
        }
        let child = self.children.get(index)?;
        let separator = self.values.get(index)?.clone();
        let (stolen, right_values) = right.values.split_first()?;
        let (moved, right_children) = match right.children.split_first() {
            Some((moved, rest)) => (Some(Rc::clone(moved)), rest.to_vec()),
            None => (None, Vec::new()),
        };

        let right = Self {
            values: right_values.to_vec(),
            children: right_children,
        };
        let mut child_values = child.values.clone();
        child_values.push(separator.clone());
        let mut child_children = child.children.clone();
        child_children.extend(moved);
        let child = Self {
            values: child_values,
            children: child_children,
        };

        let mut values = self.values.clone();
        values[index] = stolen.clone();
        let mut children = self.children.clone();
        children[index] = Rc::new(child);
        children[index + 1] = Rc::new(right);
        let step = Step::steal_right(separator, stolen.clone());
        Some((Self { values, children }, index, step))
    }

    /// Merges the child at `index` with its right sibling or, for the last child, its left one.
    /// Returns the new node and the index of the merged child.
    fn merge_around(&self, index: usize) -> Option<(Self, usize, Step<T>)> {
        let index = if index + 1 < self.children.len() {
            index
        } else {
            index.checked_sub(1)?
        };
        let separator = self.values.get(index)?.clone();
        let merged = self.merge_children(index)?;
        Some((merged, index, Step::merge(separator)))
    }
}

/// A rebuilt trace together with the node its last snapshot was hung under.
type Rewrapped<T> = (Trace<Rc<BTreeNode<T>>, T>, Rc<BTreeNode<T>>);

/// Re-hangs every snapshot of the child at `index` under a copy of `node`. Also returns the
/// copy made for the last snapshot (or `node` itself when there were none).
fn rewrap<T: Ord + Clone>(
    node: &Rc<BTreeNode<T>>,
    index: usize,
    below: Trace<Rc<BTreeNode<T>>, T>,
) -> Rewrapped<T> {
    let mut current = Rc::clone(node);
    let trace = below
        .into_iter()
        .map(|(child, step)| {
            current = Rc::new(node.with_child(index, child));
            (Rc::clone(&current), step)
        })
        .collect();
    (trace, current)
}

fn split_root<T: Ord + Clone>(root: &Rc<BTreeNode<T>>) -> Option<(BTreeNode<T>, T)> {
    let parent = BTreeNode {
        values: Vec::new(),
        children: vec![Rc::clone(root)],
    };
    parent.split_child(0)
}

fn insert<T: Ord + Clone + fmt::Debug>(
    node: &Rc<BTreeNode<T>>,
    value: T,
    degree: usize,
) -> Trace<Rc<BTreeNode<T>>, T> {
    // Equal values go behind the keys they equal.
    let mut index = node.values.partition_point(|v| v <= &value);
    if node.is_leaf() {
        let mut values = node.values.clone();
        values.insert(index, value.clone());
        return vec![(Rc::new(BTreeNode::leaf(values)), Step::add(value))];
    }

    let mut trace = Vec::new();
    let mut node = Rc::clone(node);
    if node.is_full_at(index, degree) {
        if let Some((split, promoted)) = node.split_child(index) {
            trace!(key = ?promoted, "split a full node before entering it");
            if value >= promoted {
                index += 1;
            }
            node = Rc::new(split);
            trace.push((Rc::clone(&node), Step::split(promoted)));
        }
    }

    let Some(child) = node.children.get(index) else {
        return trace;
    };
    let (below, mut current) = rewrap(&node, index, insert(child, value, degree));
    trace.extend(below);

    if current.is_full_at(index, degree) {
        if let Some((split, promoted)) = current.split_child(index) {
            trace!(key = ?promoted, "split a node filled up by the insertion");
            current = Rc::new(split);
            trace.push((Rc::clone(&current), Step::split(promoted)));
        }
    }
    trace
}

fn remove<T: Ord + Clone + fmt::Debug>(
    node: &Rc<BTreeNode<T>>,
    value: &T,
    degree: usize,
) -> Trace<Rc<BTreeNode<T>>, T> {
    let index = node.values.partition_point(|v| v < value);
    let found = node.values.get(index) == Some(value);

    if node.is_leaf() {
        if !found {
            return Vec::new();
        }
        let mut values = node.values.clone();
        values.remove(index);
        return vec![(
            Rc::new(BTreeNode::leaf(values)),
            Step::remove(value.clone()),
        )];
    }

    if found {
        remove_separator(node, index, value, degree)
    } else {
        remove_below(node, index, value, degree)
    }
}

/// Removes `value`, which is the key at `index` of the internal `node`.
fn remove_separator<T: Ord + Clone + fmt::Debug>(
    node: &Rc<BTreeNode<T>>,
    index: usize,
    value: &T,
    degree: usize,
) -> Trace<Rc<BTreeNode<T>>, T> {
    let (Some(left), Some(right)) = (node.children.get(index), node.children.get(index + 1))
    else {
        return Vec::new();
    };

    if !left.is_sparse(degree) {
        if let Some(predecessor) = left.max().cloned() {
            trace!(key = ?value, "replace a key by its predecessor");
            let (mut trace, current) = rewrap(node, index, remove(left, &predecessor, degree));
            trace.push((
                Rc::new(current.with_value(index, predecessor.clone())),
                Step::steal_left(value.clone(), predecessor),
            ));
            return trace;
        }
    }

    if !right.is_sparse(degree) {
        if let Some(successor) = right.min().cloned() {
            trace!(key = ?value, "replace a key by its successor");
            let (mut trace, current) = rewrap(node, index + 1, remove(right, &successor, degree));
            trace.push((
                Rc::new(current.with_value(index, successor.clone())),
                Step::steal_right(value.clone(), successor),
            ));
            return trace;
        }
    }

    trace!(key = ?value, "push a key down into the merge of its children");
    let Some(merged) = node.merge_children(index) else {
        return Vec::new();
    };
    let merged = Rc::new(merged);
    let mut trace = vec![(Rc::clone(&merged), Step::merge(value.clone()))];
    if let Some(child) = merged.children.get(index) {
        let (below, _) = rewrap(&merged, index, remove(child, value, degree));
        trace.extend(below);
    }
    trace
}

/// Removes `value` from the child at `index` of the internal `node`, first making sure that
/// child can spare a key.
fn remove_below<T: Ord + Clone + fmt::Debug>(
    node: &Rc<BTreeNode<T>>,
    index: usize,
    value: &T,
    degree: usize,
) -> Trace<Rc<BTreeNode<T>>, T> {
    let mut trace = Vec::new();
    let mut node = Rc::clone(node);
    let mut index = index;

    if node.is_sparse_at(index, degree) {
        let fixed = node
            .steal_from_left(index, degree)
            .or_else(|| node.steal_from_right(index, degree))
            .or_else(|| node.merge_around(index));
        if let Some((fixed, fixed_index, step)) = fixed {
            trace!(?step, "refill a sparse child before entering it");
            node = Rc::new(fixed);
            index = fixed_index;
            trace.push((Rc::clone(&node), step));
        }
    }

    let Some(child) = node.children.get(index) else {
        return trace;
    };
    let (below, _) = rewrap(&node, index, remove(child, value, degree));
    trace.extend(below);
    trace
}

/// A root without keys is replaced by its only child (or nothing).
fn shrink<T>(root: Rc<BTreeNode<T>>) -> Option<Rc<BTreeNode<T>>> {
    if root.values.is_empty() {
        root.children.first().map(Rc::clone)
    } else {
        Some(root)
    }
}

/// A B-tree snapshot.
pub struct BTree<T> {
    degree: usize,
    root: Option<Rc<BTreeNode<T>>>,
}

impl<T> Clone for BTree<T> {
    fn clone(&self) -> Self {
        Self {
            degree: self.degree,
            root: self.root.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BTree")
            .field("degree", &self.degree)
            .field("root", &self.root)
            .finish()
    }
}

impl<T> BTree<T> {
    /// Generates a new, empty B-tree of the given degree.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidDegree`] if `degree` is below [`MIN_DEGREE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use steptree::btree::BTree;
    /// use steptree::error::TreeError;
    ///
    /// assert!(BTree::<i32>::new(3).is_ok());
    /// assert_eq!(
    ///     BTree::<i32>::new(1).unwrap_err(),
    ///     TreeError::InvalidDegree { degree: 1 }
    /// );
    /// ```
    pub fn new(degree: usize) -> TreeResult<Self> {
        if degree < MIN_DEGREE {
            return Err(TreeError::InvalidDegree { degree });
        }
        Ok(Self { degree, root: None })
    }

    /// The degree `t` of this tree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The root node, if any.
    pub fn root(&self) -> Option<&BTreeNode<T>> {
        self.root.as_deref()
    }

    fn with_root(&self, root: Option<Rc<BTreeNode<T>>>) -> Self {
        Self {
            degree: self.degree,
            root,
        }
    }
}

impl<T: Ord + Clone + fmt::Debug> SearchTree for BTree<T> {
    type Value = T;

    fn add_with_steps(&self, value: T) -> Trace<Self, T> {
        let Some(root) = &self.root else {
            let root = BTreeNode::leaf(vec![value.clone()]);
            return vec![(self.with_root(Some(Rc::new(root))), Step::add(value))];
        };

        let mut trace = Vec::new();
        let mut root = Rc::clone(root);
        if root.is_full(self.degree) {
            if let Some((split, promoted)) = split_root(&root) {
                root = Rc::new(split);
                trace.push((
                    self.with_root(Some(Rc::clone(&root))),
                    Step::split(promoted),
                ));
            }
        }

        let below = insert(&root, value, self.degree);
        let root = below.last().map_or(root, |(root, _)| Rc::clone(root));
        trace.extend(
            below
                .into_iter()
                .map(|(root, step)| (self.with_root(Some(root)), step)),
        );

        if root.is_full(self.degree) {
            if let Some((split, promoted)) = split_root(&root) {
                trace.push((
                    self.with_root(Some(Rc::new(split))),
                    Step::split(promoted),
                ));
            }
        }
        trace
    }

    fn remove_with_steps(&self, value: &T) -> Trace<Self, T> {
        // Checked up front: the walk down restructures nodes before it knows whether the
        // value is there.
        let Some(root) = self.root.as_ref().filter(|root| root.contains(value)) else {
            return Vec::new();
        };

        remove(root, value, self.degree)
            .into_iter()
            .map(|(root, step)| (self.with_root(shrink(root)), step))
            .collect()
    }

    fn contains(&self, value: &T) -> bool {
        self.root.as_ref().is_some_and(|root| root.contains(value))
    }

    fn in_order(&self) -> Vec<&T> {
        let mut values = Vec::new();
        if let Some(root) = &self.root {
            root.collect_in_order(&mut values);
        }
        values
    }

    fn height(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.height())
    }

    fn size(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.size())
    }

    fn validate(&self) -> TreeResult<()> {
        let Some(root) = &self.root else {
            return Ok(());
        };
        if root.values.is_empty() {
            return Err(TreeError::invariant("root has no keys"));
        }
        check_node(root, self.degree, true, None, None).map(drop)
    }
}

/// Verifies the subtree at `node` whose keys must lie between `lower` and `upper`. Returns the
/// depth of its leaves.
fn check_node<T: Ord + fmt::Debug>(
    node: &BTreeNode<T>,
    degree: usize,
    is_root: bool,
    lower: Option<&T>,
    upper: Option<&T>,
) -> TreeResult<usize> {
    let len = node.values.len();
    let (min, max) = (degree - 1, 2 * degree - 1);
    if len > max || (!is_root && len < min) {
        return Err(TreeError::invariant(format!(
            "node {:?} has {len} keys instead of {min} to {max}",
            node.values
        )));
    }
    if node.values.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(TreeError::invariant(format!(
            "keys {:?} are not sorted",
            node.values
        )));
    }
    let below_lower = lower.is_some_and(|lower| node.values.first().is_some_and(|v| v < lower));
    let above_upper = upper.is_some_and(|upper| node.values.last().is_some_and(|v| v > upper));
    if below_lower || above_upper {
        return Err(TreeError::invariant(format!(
            "keys {:?} are not between {lower:?} and {upper:?}",
            node.values
        )));
    }

    if node.is_leaf() {
        return Ok(1);
    }
    if node.children.len() != len + 1 {
        return Err(TreeError::invariant(format!(
            "node {:?} has {} children",
            node.values, node.children.len()
        )));
    }

    let mut depth = None;
    for (index, child) in node.children.iter().enumerate() {
        let child_lower = if index == 0 {
            lower
        } else {
            node.values.get(index - 1)
        };
        let child_upper = node.values.get(index).or(upper);
        let child_depth = check_node(child, degree, false, child_lower, child_upper)?;
        match depth {
            Some(depth) if depth != child_depth => {
                return Err(TreeError::invariant(format!(
                    "leaves below {:?} are at different depths",
                    node.values
                )));
            }
            _ => depth = Some(child_depth),
        }
    }
    Ok(depth.unwrap_or_default() + 1)
}

impl<T: fmt::Display> fmt::Display for BTree<T> {
    /// Keys in brackets followed by the children in parentheses: `[20]([10] [30])`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => fmt_subtree(root, f),
            None => f.write_str("[]"),
        }
    }
}

fn fmt_subtree<T: fmt::Display>(node: &BTreeNode<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("[")?;
    for (index, value) in node.values.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{value}")?;
    }
    f.write_str("]")?;

    if !node.is_leaf() {
        f.write_str("(")?;
        for (index, child) in node.children.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            fmt_subtree(child, f)?;
        }
        f.write_str(")")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(degree: usize, values: &[i32]) -> BTree<i32> {
        let tree = BTree::new(degree).unwrap();
        values.iter().fold(tree, |tree, &value| tree.add(value))
    }

    fn steps(trace: &Trace<BTree<i32>, i32>) -> Vec<Step<i32>> {
        trace.iter().map(|(_, step)| step.clone()).collect()
    }

    fn last(trace: &Trace<BTree<i32>, i32>) -> String {
        trace
            .last()
            .map(|(tree, _)| tree.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_invalid_degree() {
        assert_eq!(
            BTree::<i32>::new(0).unwrap_err(),
            TreeError::InvalidDegree { degree: 0 }
        );
        assert!(BTree::<i32>::new(1).is_err());
        assert!(BTree::<i32>::new(2).is_ok());
    }

    #[test]
    fn test_split_on_third_insertion() {
        let tree = build(2, &[10, 20]);
        assert_eq!(tree.to_string(), "[10, 20]");

        let trace = tree.add_with_steps(30);
        assert_eq!(steps(&trace), [Step::add(30), Step::split(20)]);
        assert_eq!(trace[0].0.to_string(), "[10, 20, 30]");
        assert_eq!(last(&trace), "[20]([10] [30])");
    }

    #[test]
    fn test_merge_on_removal() {
        let tree = build(2, &[10, 20, 30]);
        let trace = tree.remove_with_steps(&30);

        assert_eq!(steps(&trace), [Step::merge(20), Step::remove(30)]);
        // The root lost its only key in the merge, so the merged node took its place.
        assert_eq!(trace[0].0.to_string(), "[10, 20, 30]");
        assert_eq!(last(&trace), "[10, 20]");
    }

    #[test]
    fn test_steal_from_left_sibling() {
        let tree = build(2, &[10, 20, 30, 5]);
        assert_eq!(tree.to_string(), "[20]([5, 10] [30])");

        let trace = tree.remove_with_steps(&30);
        assert_eq!(steps(&trace), [Step::steal_left(20, 10), Step::remove(30)]);
        assert_eq!(trace[0].0.to_string(), "[10]([5] [20, 30])");
        assert_eq!(last(&trace), "[10]([5] [20])");
    }

    #[test]
    fn test_steal_from_right_sibling() {
        let tree = build(2, &[10, 20, 30, 35]);
        assert_eq!(tree.to_string(), "[20]([10] [30, 35])");

        let trace = tree.remove_with_steps(&10);
        assert_eq!(steps(&trace), [Step::steal_right(20, 30), Step::remove(10)]);
        assert_eq!(last(&trace), "[30]([20] [35])");
    }

    #[test]
    fn test_remove_internal_key_with_predecessor() {
        let tree = build(2, &[10, 20, 30, 5]);
        let trace = tree.remove_with_steps(&20);

        assert_eq!(steps(&trace), [Step::remove(10), Step::steal_left(20, 10)]);
        assert_eq!(last(&trace), "[10]([5] [30])");
    }

    #[test]
    fn test_remove_internal_key_with_successor() {
        let tree = build(2, &[10, 20, 30, 35]);
        let trace = tree.remove_with_steps(&20);

        assert_eq!(steps(&trace), [Step::remove(30), Step::steal_right(20, 30)]);
        assert_eq!(last(&trace), "[30]([10] [35])");
    }

    #[test]
    fn test_remove_internal_key_between_sparse_children() {
        let tree = build(2, &[10, 20, 30]);
        let trace = tree.remove_with_steps(&20);

        assert_eq!(steps(&trace), [Step::merge(20), Step::remove(20)]);
        assert_eq!(last(&trace), "[10, 30]");
    }

    #[test]
    fn test_remove_missing_value_restructures_nothing() {
        let tree = build(2, &[10, 20, 30]);

        assert!(tree.remove_with_steps(&25).is_empty());
        assert!(tree.remove_with_steps(&25).is_empty());
        let empty = BTree::<i32>::new(2).unwrap();
        assert!(empty.remove_with_steps(&1).is_empty());
    }

    #[test]
    fn test_remove_last_value() {
        let tree = build(3, &[7]);
        let trace = tree.remove_with_steps(&7);

        assert_eq!(steps(&trace), [Step::remove(7)]);
        assert_eq!(last(&trace), "[]");
        assert!(trace[0].0.is_empty());
        assert_eq!(trace[0].0.height(), 0);
    }

    #[test]
    fn test_fill_bounds_for_several_degrees() {
        for degree in 2..=4 {
            let values: Vec<_> = (0..200).map(|x| (x * 37) % 200).collect();
            let mut tree = build(degree, &values);
            assert!(tree.validate().is_ok(), "degree {degree}");
            assert_eq!(tree.size(), 200);

            for value in values.iter().step_by(2) {
                tree = tree.remove(value);
                assert!(
                    tree.validate().is_ok(),
                    "degree {degree}, removed {value}"
                );
                assert!(!tree.contains(value));
            }
            assert_eq!(tree.size(), 100);
        }
    }

    #[test]
    fn test_duplicates() {
        let mut tree = build(2, &[5, 5, 5, 5, 5]);
        assert_eq!(tree.size(), 5);
        assert!(tree.validate().is_ok());

        for remaining in (0..5).rev() {
            tree = tree.remove(&5);
            assert_eq!(tree.size(), remaining);
            assert!(tree.validate().is_ok());
        }
        assert!(!tree.contains(&5));
    }

    #[test]
    fn test_history_is_preserved() {
        let tree = build(2, &[10, 20, 30]);
        let smaller = tree.remove(&30);

        assert_eq!(tree.to_string(), "[20]([10] [30])");
        assert_eq!(smaller.to_string(), "[10, 20]");
        assert_eq!(tree.in_order(), [&10, &20, &30]);
        assert_eq!(tree.height(), 2);
    }
}

#[cfg(test)]
mod quicktests {
    use super::*;
    use crate::test::quick::{apply_checked, Op};

    quickcheck::quickcheck! {
        fn fuzz_degree_two(ops: Vec<Op<i8>>) -> bool {
            apply_checked(BTree::new(2).unwrap(), &ops).is_ok()
        }

        fn fuzz_degree_three(ops: Vec<Op<i8>>) -> bool {
            apply_checked(BTree::new(3).unwrap(), &ops).is_ok()
        }
    }
}
