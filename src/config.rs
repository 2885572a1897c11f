//! Configuration for the trees a [`Simulation`][crate::simulation::Simulation] works on.

use std::fmt;
use std::str::FromStr;

use crate::error::{TreeError, TreeResult};

/// The smallest degree a B-tree can have.
pub const MIN_DEGREE: usize = 2;

/// The degree of a B-tree unless configured otherwise.
pub const DEFAULT_DEGREE: usize = 2;

/// The tree kinds a simulation can run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TreeKind {
    /// An unbalanced binary search tree.
    #[default]
    Binary,
    /// An AVL tree.
    Avl,
    /// A red-black tree.
    RedBlack,
    /// A B-tree.
    BTree,
}

impl TreeKind {
    /// Every tree kind.
    pub const ALL: [TreeKind; 4] = [
        TreeKind::Binary,
        TreeKind::Avl,
        TreeKind::RedBlack,
        TreeKind::BTree,
    ];

    /// The canonical name of this kind, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            TreeKind::Binary => "binary",
            TreeKind::Avl => "avl",
            TreeKind::RedBlack => "red-black",
            TreeKind::BTree => "btree",
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TreeKind {
    type Err = TreeError;

    /// Parses a kind name, ignoring case and the separators `-`, `_` and space.
    ///
    /// ```
    /// use steptree::config::TreeKind;
    ///
    /// assert_eq!("Red-Black".parse(), Ok(TreeKind::RedBlack));
    /// assert_eq!("b_tree".parse(), Ok(TreeKind::BTree));
    /// assert!("splay".parse::<TreeKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "binary" | "bst" => Ok(TreeKind::Binary),
            "avl" => Ok(TreeKind::Avl),
            "redblack" | "rb" => Ok(TreeKind::RedBlack),
            "btree" => Ok(TreeKind::BTree),
            _ => Err(TreeError::UnknownKind(s.to_string())),
        }
    }
}

/// Which tree to build and how closely to watch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// The kind of tree (default: binary).
    pub kind: TreeKind,

    /// The degree `t` of a B-tree (default: 2). Ignored by the other kinds.
    pub degree: usize,

    /// Whether every completed operation is followed by a full invariant check
    /// (default: on in debug builds).
    pub validate: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            kind: TreeKind::default(),
            degree: DEFAULT_DEGREE,
            validate: cfg!(debug_assertions),
        }
    }
}

impl TreeConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tree kind.
    pub fn with_kind(mut self, kind: TreeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the B-tree degree.
    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    /// Enables or disables validation after every operation.
    pub fn with_validation(mut self, enable: bool) -> Self {
        self.validate = enable;
        self
    }

    /// Validates the configuration.
    ///
    /// The degree only matters for B-trees, so it is only checked for them.
    pub fn check(&self) -> TreeResult<()> {
        if self.kind == TreeKind::BTree && self.degree < MIN_DEGREE {
            return Err(TreeError::InvalidDegree {
                degree: self.degree,
            });
        }
        Ok(())
    }
}
