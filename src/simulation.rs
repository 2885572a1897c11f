//! Driving a tree through a queue of operations.
//!
//! A [`Simulation`] owns the current snapshot. It can be seeded with a
//! construction queue whose steps nobody gets to see, and then applies one
//! [`Operation`] at a time, handing back every intermediate snapshot of each.
//!
//! # Examples
//!
//! ```
//! use steptree::config::{TreeConfig, TreeKind};
//! use steptree::simulation::{Operation, Simulation};
//! use steptree::step::StepKind;
//!
//! let config = TreeConfig::new().with_kind(TreeKind::BTree).with_degree(2);
//! let mut simulation = Simulation::with_construction(
//!     config,
//!     [Operation::insert(10), Operation::insert(20)],
//! )?;
//!
//! let applied = simulation.run([Operation::insert(30), Operation::remove(30)])?;
//! let kinds: Vec<Vec<_>> = applied
//!     .iter()
//!     .map(|applied| applied.steps.iter().map(|(_, step)| step.kind()).collect())
//!     .collect();
//!
//! assert_eq!(kinds[0], [StepKind::Add, StepKind::Split]);
//! assert_eq!(kinds[1], [StepKind::Merge, StepKind::Remove]);
//! assert_eq!(simulation.tree().to_string(), "[10, 20]");
//! # Ok::<(), steptree::error::TreeError>(())
//! ```

use std::fmt;

use tracing::{debug, trace, warn};

use crate::any::AnyTree;
use crate::config::TreeConfig;
use crate::error::{TreeError, TreeResult};
use crate::tree::{SearchTree, Trace};

/// One entry of an operation queue: insert or remove a value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operation<T> {
    /// The value to insert or remove.
    pub value: T,
    /// Whether the value is inserted (or removed).
    pub is_insertion: bool,
}

impl<T> Operation<T> {
    /// An insertion of `value`.
    pub fn insert(value: T) -> Self {
        Self {
            value,
            is_insertion: true,
        }
    }

    /// A removal of `value`.
    pub fn remove(value: T) -> Self {
        Self {
            value,
            is_insertion: false,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Operation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.is_insertion { "insert" } else { "remove" };
        write!(f, "{verb} {}", self.value)
    }
}

/// An operation together with every snapshot it passed through.
#[derive(Clone, Debug)]
pub struct Applied<T> {
    /// The operation that was applied.
    pub operation: Operation<T>,
    /// The snapshots, each with the step that produced it.
    pub steps: Trace<AnyTree<T>, T>,
}

impl<T> Applied<T> {
    /// Whether the operation left the tree as it was (a removal of an absent value).
    pub fn is_noop(&self) -> bool {
        self.steps.is_empty()
    }

    /// The tree after the operation, unless it was a no-op.
    pub fn result(&self) -> Option<&AnyTree<T>> {
        self.steps.last().map(|(tree, _)| tree)
    }
}

/// A tree of a configured kind and the operations applied to it so far.
#[derive(Clone, Debug)]
pub struct Simulation<T> {
    config: TreeConfig,
    tree: AnyTree<T>,
}

impl<T: Ord + Clone + fmt::Debug> Simulation<T> {
    /// Starts a simulation on an empty tree.
    ///
    /// # Errors
    ///
    /// Whatever [`TreeConfig::check`] reports.
    pub fn new(config: TreeConfig) -> TreeResult<Self> {
        let tree = AnyTree::new(&config)?;
        debug!(kind = %config.kind, degree = config.degree, "starting simulation");
        Ok(Self { config, tree })
    }

    /// Starts a simulation on the tree that `construction` builds. The steps of the
    /// construction are discarded.
    ///
    /// # Errors
    ///
    /// An invalid configuration, or an invariant violation if validation is on.
    pub fn with_construction(
        config: TreeConfig,
        construction: impl IntoIterator<Item = Operation<T>>,
    ) -> TreeResult<Self> {
        let mut simulation = Self::new(config)?;
        let mut count = 0_usize;
        for operation in construction {
            simulation.apply(operation)?;
            count += 1;
        }
        debug!(operations = count, size = simulation.tree.size(), "constructed starting tree");
        Ok(simulation)
    }

    /// The configuration this simulation runs with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The current snapshot.
    pub fn tree(&self) -> &AnyTree<T> {
        &self.tree
    }

    /// Applies one operation, making its last snapshot the current one.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvariantViolated`] if validation is on and a snapshot breaks the
    /// invariants of the tree kind. The current snapshot stays the one from before the
    /// operation in that case.
    pub fn apply(&mut self, operation: Operation<T>) -> TreeResult<Applied<T>> {
        let steps = if operation.is_insertion {
            self.tree.add_with_steps(operation.value.clone())
        } else {
            self.tree.remove_with_steps(&operation.value)
        };

        if steps.is_empty() {
            warn!(
                value = ?operation.value,
                kind = %self.tree.kind(),
                "removed value is not in the tree"
            );
        }
        for (_, step) in &steps {
            trace!(?step, "step");
        }

        if self.config.validate {
            check_trace(&steps)?;
        }
        debug!(
            value = ?operation.value,
            insertion = operation.is_insertion,
            kind = %self.tree.kind(),
            steps = steps.len(),
            "applied operation"
        );

        if let Some((tree, _)) = steps.last() {
            self.tree = tree.clone();
        }
        Ok(Applied { operation, steps })
    }

    /// Applies every operation in order.
    ///
    /// # Errors
    ///
    /// Stops at the first operation that fails, see [`apply`][Self::apply].
    pub fn run(
        &mut self,
        operations: impl IntoIterator<Item = Operation<T>>,
    ) -> TreeResult<Vec<Applied<T>>> {
        operations
            .into_iter()
            .map(|operation| self.apply(operation))
            .collect()
    }
}

/// Every snapshot must be ordered. The last one has to satisfy all invariants.
fn check_trace<T: Ord + Clone + fmt::Debug>(steps: &Trace<AnyTree<T>, T>) -> TreeResult<()> {
    for (tree, step) in steps {
        let values = tree.in_order();
        if values.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(TreeError::invariant(format!(
                "values are out of order after {step:?}"
            )));
        }
    }
    match steps.last() {
        Some((tree, _)) => tree.validate(),
        None => Ok(()),
    }
}
