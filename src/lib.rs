//! This crate simulates search trees step by step, mostly for educational
//! purposes.
//!
//! ## Search trees
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored values. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a value and
//! sometimes has child `Node`s. The most important invariant of a BST is that
//! for every `Node`, all the values in its left subtree are less than its own
//! value and all the values in its right subtree are at least its own value.
//!
//! Searching takes `O(height)`, so balanced trees keep the height in
//! `O(lg N)` by repairing themselves after every change:
//!
//! - [AVL trees][avl::AvlTree] rotate whenever the heights of two sibling
//!   subtrees differ by more than one.
//! - [Red-black trees][red_black::RedBlackTree] color their nodes and rotate or
//!   recolor whenever a red node gets a red child or a path runs short of black
//!   nodes.
//! - [B-trees][btree::BTree] store many sorted keys per node and split, merge,
//!   or lend keys between siblings so that all leaves stay at the same depth.
//!
//! ## Steps
//!
//! Every tree here is persistent: inserting or removing never changes a tree
//! but builds a new one that shares the untouched subtrees with the old one.
//! [`add_with_steps`][tree::SearchTree::add_with_steps] and
//! [`remove_with_steps`][tree::SearchTree::remove_with_steps] go further and
//! return each tree the operation passes through, paired with the
//! [`Step`][step::Step] (an insertion, a rotation, a recoloring, a split, ...)
//! that produced it. Rendering those snapshots one after another shows an
//! operation the way a textbook would.
//!
//! ```
//! use steptree::red_black::RedBlackTree;
//! use steptree::tree::SearchTree;
//!
//! let tree = RedBlackTree::new().add(10).add(20);
//! for (snapshot, step) in tree.add_with_steps(30) {
//!     println!("{step} {snapshot}");
//! }
//! ```
//!
//! A [`Simulation`][simulation::Simulation] runs a whole queue of operations
//! on a tree whose kind is picked at runtime through a
//! [`TreeConfig`][config::TreeConfig].

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod any;
pub mod avl;
pub mod binary;
pub mod btree;
pub mod config;
pub mod error;
pub mod red_black;
pub mod simulation;
pub mod step;
pub mod tree;

#[cfg(test)]
mod test;

pub use any::AnyTree;
pub use config::{TreeConfig, TreeKind};
pub use error::{TreeError, TreeResult};
pub use simulation::{Applied, Operation, Simulation};
pub use step::{Step, StepKind};
pub use tree::{SearchTree, Trace};
