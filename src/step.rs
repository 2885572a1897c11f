//! Records of the atomic transformations a tree goes through.
//!
//! A [`Step`] only says *what* happened (a rotation at `30`, a recoloring of
//! `10`, `20` and `30`, ...). The tree the step produced travels next to it in
//! a [`Trace`][crate::tree::Trace]. Turning a step into a sentence is the job of
//! a [`Describe`] implementation so callers can phrase (or translate) messages
//! without re-deriving what happened.
//!
//! # Examples
//!
//! ```
//! use steptree::step::{Describe, English, Step, StepKind};
//!
//! let step = Step::rotate_right(30);
//! assert_eq!(step.kind(), StepKind::RotateRight);
//! assert_eq!(step.values(), &[30]);
//! assert_eq!(English.describe(&step), "Rotate right at 30.");
//!
//! let step = Step::color(vec![10, 20, 30]);
//! assert_eq!(step.to_string(), "Recolor 10, 20 and 30.");
//! ```

use std::fmt;

/// What kind of transformation a [`Step`] records.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepKind {
    /// A value was inserted.
    Add,
    /// A value was removed.
    Remove,
    /// A node's value was replaced by another one (its in-order successor).
    Replace,
    /// A left rotation at a node.
    RotateLeft,
    /// A right rotation at a node.
    RotateRight,
    /// One or more nodes changed color.
    Color,
    /// A full B-tree node was split around its middle key.
    Split,
    /// Two B-tree siblings were merged around their separating key.
    Merge,
    /// A key was borrowed from the left.
    StealLeft,
    /// A key was borrowed from the right.
    StealRight,
}

/// One atomic transformation together with the values it affected.
///
/// The layout of [`values`][Step::values] depends on the kind: `Replace`,
/// `StealLeft` and `StealRight` carry `[replaced, replacement]`, `Color` carries
/// every recolored node and all other kinds carry exactly one value.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step<T> {
    kind: StepKind,
    values: Vec<T>,
}

impl<T> Step<T> {
    /// A step of the given kind affecting `values`.
    pub fn new(kind: StepKind, values: Vec<T>) -> Self {
        Self { kind, values }
    }

    /// `value` was inserted.
    pub fn add(value: T) -> Self {
        Self::new(StepKind::Add, vec![value])
    }

    /// `value` was removed.
    pub fn remove(value: T) -> Self {
        Self::new(StepKind::Remove, vec![value])
    }

    /// `replaced` was overwritten by `replacement`.
    pub fn replace(replaced: T, replacement: T) -> Self {
        Self::new(StepKind::Replace, vec![replaced, replacement])
    }

    /// Left rotation at the node holding `value`.
    pub fn rotate_left(value: T) -> Self {
        Self::new(StepKind::RotateLeft, vec![value])
    }

    /// Right rotation at the node holding `value`.
    pub fn rotate_right(value: T) -> Self {
        Self::new(StepKind::RotateRight, vec![value])
    }

    /// The nodes holding `values` changed color, all at once.
    pub fn color(values: Vec<T>) -> Self {
        Self::new(StepKind::Color, values)
    }

    /// A node was split and `value` moved up.
    pub fn split(value: T) -> Self {
        Self::new(StepKind::Split, vec![value])
    }

    /// Two siblings were merged around the separator `value`.
    pub fn merge(value: T) -> Self {
        Self::new(StepKind::Merge, vec![value])
    }

    /// `stolen` came from the left and took the place of `replaced`.
    pub fn steal_left(replaced: T, stolen: T) -> Self {
        Self::new(StepKind::StealLeft, vec![replaced, stolen])
    }

    /// `stolen` came from the right and took the place of `replaced`.
    pub fn steal_right(replaced: T, stolen: T) -> Self {
        Self::new(StepKind::StealRight, vec![replaced, stolen])
    }

    /// The kind of this step.
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// The values affected by this step.
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

/// Turns [`Step`]s into sentences.
///
/// Every method has an English default, so an implementation only overrides
/// the kinds it wants to phrase differently. [`describe`][Describe::describe]
/// dispatches on the step kind.
pub trait Describe<T: fmt::Display> {
    /// Sentence for an insertion.
    fn add(&self, value: &T) -> String {
        format!("Insert {value}.")
    }

    /// Sentence for a removal.
    fn remove(&self, value: &T) -> String {
        format!("Remove {value}.")
    }

    /// Sentence for a value replacement.
    fn replace(&self, replaced: &T, replacement: &T) -> String {
        format!("Replace {replaced} by its successor {replacement}.")
    }

    /// Sentence for a left rotation.
    fn rotate_left(&self, value: &T) -> String {
        format!("Rotate left at {value}.")
    }

    /// Sentence for a right rotation.
    fn rotate_right(&self, value: &T) -> String {
        format!("Rotate right at {value}.")
    }

    /// Sentence for a batch of color changes.
    fn recolor(&self, values: &[T]) -> String {
        format!("Recolor {}.", enumerate(values))
    }

    /// Sentence for a split.
    fn split(&self, value: &T) -> String {
        format!("Split the node around {value}.")
    }

    /// Sentence for a merge.
    fn merge(&self, value: &T) -> String {
        format!("Merge the children around {value}.")
    }

    /// Sentence for borrowing from the left.
    fn steal_left(&self, replaced: &T, stolen: &T) -> String {
        format!("Steal {stolen} from the left to replace {replaced}.")
    }

    /// Sentence for borrowing from the right.
    fn steal_right(&self, replaced: &T, stolen: &T) -> String {
        format!("Steal {stolen} from the right to replace {replaced}.")
    }

    /// Describes any step by dispatching on its kind.
    fn describe(&self, step: &Step<T>) -> String {
        match (step.kind(), step.values()) {
            (StepKind::Add, [value]) => self.add(value),
            (StepKind::Remove, [value]) => self.remove(value),
            (StepKind::Replace, [replaced, replacement]) => self.replace(replaced, replacement),
            (StepKind::RotateLeft, [value]) => self.rotate_left(value),
            (StepKind::RotateRight, [value]) => self.rotate_right(value),
            (StepKind::Color, values) => self.recolor(values),
            (StepKind::Split, [value]) => self.split(value),
            (StepKind::Merge, [value]) => self.merge(value),
            (StepKind::StealLeft, [replaced, stolen]) => self.steal_left(replaced, stolen),
            (StepKind::StealRight, [replaced, stolen]) => self.steal_right(replaced, stolen),
            // Only reachable for steps built by hand (or deserialized) with an unexpected layout.
            (kind, values) => format!("{kind:?} {}.", enumerate(values)),
        }
    }
}

/// The default, English [`Describe`] implementation.
#[derive(Copy, Clone, Debug, Default)]
pub struct English;

impl<T: fmt::Display> Describe<T> for English {}

impl<T: fmt::Display> fmt::Display for Step<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&English.describe(self))
    }
}

/// Joins values as "a, b and c".
fn enumerate<T: fmt::Display>(values: &[T]) -> String {
    match values {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let init = init
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("{init} and {last}")
        }
    }
}
