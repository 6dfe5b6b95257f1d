//! Human readable rendering of a [`Tree`]'s shape.
//!
//! The tree is drawn on its side with the root in the leftmost column: the right subtree comes
//! first, one level deeper, then the node itself, then the left subtree. Reading the lines from
//! bottom to top gives the values in ascending order.
//!
//! ```
//! use bst_set::Tree;
//!
//! let tree = Tree::from([5, 3, 8, 1, 4]);
//!
//! assert_eq!(
//!     tree.diagram().to_string(),
//!     "   8\n5\n      4\n   3\n      1\n",
//! );
//! ```
//!
//! This is for eyeballing a tree while debugging, not a serialization format.

use std::fmt;

use crate::tree::Tree;

/// Spaces per level of depth used by [`Tree::print`] and a default [`Diagram`].
pub const DEFAULT_INDENT: usize = 3;

/// A [`Display`](fmt::Display) adapter drawing a [`Tree`]. Created by [`Tree::diagram`].
pub struct Diagram<'a, T> {
    tree: &'a Tree<T>,
    indent: usize,
}

impl<'a, T> Diagram<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>) -> Self {
        Self {
            tree,
            indent: DEFAULT_INDENT,
        }
    }

    /// Sets how many spaces each level of depth is indented by.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_set::Tree;
    ///
    /// let tree = Tree::from([2, 1]);
    /// assert_eq!(tree.diagram().indent(1).to_string(), "2\n 1\n");
    /// ```
    pub fn indent(mut self, width: usize) -> Self {
        self.indent = width;
        self
    }
}

impl<T> fmt::Display for Diagram<'_, T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.fmt_diagram(f, self.indent)
    }
}
