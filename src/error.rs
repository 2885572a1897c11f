//! Errors reported by tree construction and validation.
//!
//! Operations on a tree never fail: removing an absent value yields an empty
//! trace. What can go wrong is configuration (a B-tree degree below
//! [`MIN_DEGREE`]) and, when asked for, a snapshot failing its invariants.

use thiserror::Error;

use crate::config::MIN_DEGREE;

/// Result type for fallible tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors that can occur while configuring or checking trees.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A B-tree was configured with a degree below [`MIN_DEGREE`].
    #[error("invalid B-tree degree {degree} (must be at least {MIN_DEGREE})")]
    InvalidDegree {
        /// The rejected degree.
        degree: usize,
    },

    /// A tree kind name could not be parsed.
    #[error("unknown tree kind: {0}")]
    UnknownKind(String),

    /// A snapshot broke the structural invariant of its tree kind.
    #[error("invariant violated: {0}")]
    InvariantViolated(String),
}

impl TreeError {
    /// Creates a new invariant violation error.
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolated(msg.into())
    }
}
