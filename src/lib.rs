//! This crate exposes an ordered set built on a plain (unbalanced) Binary Search Tree.
//!
//! ## Ordering
//!
//! [`Tree`] is a set: it holds at most one value from each class of equal values, as
//! decided by `T`'s [`Ord`] implementation. Every lookup, insert, and remove walks down
//! from the root comparing the target against the node it is standing on. A target that
//! compares `Less` goes to the left child, `Greater` goes to the right child, and `Equal`
//! stops the walk. So everything left of a node is smaller than it and everything right of
//! it is larger.
//!
//! Inserting a value equal to one already stored leaves the tree exactly as it was,
//! including the stored value. Bulk inserts keep the first of any run of equal values. If
//! `Ord` is not a total order (for example it disagrees with itself between calls), values
//! may land in the wrong subtree or duplicates may go undetected. Memory stays sound, but
//! lookups stop being reliable and debug builds may trip an ordering assertion on insert.
//!
//! ## Shape
//!
//! Nothing rebalances the tree, so its height depends entirely on insertion order. Random
//! orders give a height around `O(lg N)` and sorted orders give a list of height `N`.
//! Lookups and updates cost `O(height)`; none of them recurse, so a list-shaped tree
//! is slow but still safe. Because the shape is left as built, it is part of a tree's
//! identity. Two trees holding the same values compare equal only if they were built
//! into the same shape.
//!
//! ```
//! use bst_set::Tree;
//!
//! let bushy = Tree::from([5, 3, 8]);
//! let chain = Tree::from([3, 5, 8]);
//!
//! assert!(bushy.exists(&8) && chain.exists(&8));
//! assert_ne!(bushy, chain);
//! ```
//!
//! ## Features
//!
//! * `tracing`: emit `tracing` events from mutating operations. Values are never logged.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod diagram;
pub mod tree;

pub use diagram::{Diagram, DEFAULT_INDENT};
pub use tree::Tree;
