//! One type for every tree kind, picked at runtime from a [`TreeConfig`].

use std::fmt;

use crate::avl::AvlTree;
use crate::binary::Bst;
use crate::btree::BTree;
use crate::config::{TreeConfig, TreeKind};
use crate::error::TreeResult;
use crate::red_black::RedBlackTree;
use crate::tree::{SearchTree, Trace};

/// A snapshot of any of the supported tree kinds.
///
/// # Examples
///
/// ```
/// use steptree::any::AnyTree;
/// use steptree::config::{TreeConfig, TreeKind};
/// use steptree::tree::SearchTree;
///
/// let config = TreeConfig::new().with_kind(TreeKind::RedBlack);
/// let tree = AnyTree::new(&config)?.add(20).add(10).add(30);
///
/// assert_eq!(tree.kind(), TreeKind::RedBlack);
/// assert_eq!(tree.to_string(), "(20:B (10:R) (30:R))");
/// # Ok::<(), steptree::error::TreeError>(())
/// ```
#[derive(Clone, Debug)]
pub enum AnyTree<T> {
    /// An unbalanced binary search tree.
    Binary(Bst<T>),
    /// An AVL tree.
    Avl(AvlTree<T>),
    /// A red-black tree.
    RedBlack(RedBlackTree<T>),
    /// A B-tree.
    BTree(BTree<T>),
}

/// Runs the same expression on whichever tree is inside.
macro_rules! dispatch {
    ($tree:expr, $inner:ident => $body:expr) => {
        match $tree {
            AnyTree::Binary($inner) => $body,
            AnyTree::Avl($inner) => $body,
            AnyTree::RedBlack($inner) => $body,
            AnyTree::BTree($inner) => $body,
        }
    };
}

/// Same as `dispatch!`, but the expression yields a trace that gets wrapped back up.
macro_rules! dispatch_trace {
    ($tree:expr, $inner:ident => $body:expr) => {
        match $tree {
            AnyTree::Binary($inner) => lift($body, AnyTree::Binary),
            AnyTree::Avl($inner) => lift($body, AnyTree::Avl),
            AnyTree::RedBlack($inner) => lift($body, AnyTree::RedBlack),
            AnyTree::BTree($inner) => lift($body, AnyTree::BTree),
        }
    };
}

fn lift<S, T>(trace: Trace<S, T>, wrap: fn(S) -> AnyTree<T>) -> Trace<AnyTree<T>, T> {
    trace
        .into_iter()
        .map(|(tree, step)| (wrap(tree), step))
        .collect()
}

impl<T> AnyTree<T> {
    /// Creates an empty tree of the configured kind.
    ///
    /// # Errors
    ///
    /// Whatever [`TreeConfig::check`] reports.
    pub fn new(config: &TreeConfig) -> TreeResult<Self> {
        config.check()?;
        Ok(match config.kind {
            TreeKind::Binary => AnyTree::Binary(Bst::new()),
            TreeKind::Avl => AnyTree::Avl(AvlTree::new()),
            TreeKind::RedBlack => AnyTree::RedBlack(RedBlackTree::new()),
            TreeKind::BTree => AnyTree::BTree(BTree::new(config.degree)?),
        })
    }

    /// The kind of tree inside.
    pub fn kind(&self) -> TreeKind {
        match self {
            AnyTree::Binary(_) => TreeKind::Binary,
            AnyTree::Avl(_) => TreeKind::Avl,
            AnyTree::RedBlack(_) => TreeKind::RedBlack,
            AnyTree::BTree(_) => TreeKind::BTree,
        }
    }
}

impl<T: Ord + Clone + fmt::Debug> SearchTree for AnyTree<T> {
    type Value = T;

    fn add_with_steps(&self, value: T) -> Trace<Self, T> {
        dispatch_trace!(self, tree => tree.add_with_steps(value))
    }

    fn remove_with_steps(&self, value: &T) -> Trace<Self, T> {
        dispatch_trace!(self, tree => tree.remove_with_steps(value))
    }

    fn contains(&self, value: &T) -> bool {
        dispatch!(self, tree => tree.contains(value))
    }

    fn in_order(&self) -> Vec<&T> {
        dispatch!(self, tree => tree.in_order())
    }

    fn height(&self) -> usize {
        dispatch!(self, tree => tree.height())
    }

    fn size(&self) -> usize {
        dispatch!(self, tree => tree.size())
    }

    fn validate(&self) -> TreeResult<()> {
        dispatch!(self, tree => tree.validate())
    }
}

impl<T: Ord + Clone + fmt::Debug + fmt::Display> fmt::Display for AnyTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, tree => fmt::Display::fmt(tree, f))
    }
}
