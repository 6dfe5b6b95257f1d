//! An ordered set backed by an unbalanced BST. Each node owns its two children and keeps a
//! non-owning pointer to its parent, which deletion uses to relink the tree around a removed node.
//!
//! # Examples
//!
//! ```
//! use bst_set::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.exists(&1));
//!
//! tree.insert(1);
//! assert!(tree.exists(&1));
//!
//! // Inserting the same value again doesn't do anything.
//! assert!(!tree.insert(1));
//! assert_eq!(tree.size(), 1);
//!
//! // Removing a value hands it back.
//! assert_eq!(tree.take(&1), Some(1));
//! assert!(!tree.exists(&1));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::io;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use crate::diagram::Diagram;

/// A Binary Search Tree holding distinct values of `T`. No rebalancing is performed, so inserting
/// values in sorted order produces a tree shaped like a linked list.
///
/// Cloning a `Tree` deep copies every node. Two trees are equal only when they hold the same
/// values in the same shape.
pub struct Tree<T> {
    // This is a `Link` instead of an `Option<Box<Node>>` so that children can keep a raw pointer
    // to their parent without fighting the borrow checker.
    root: Link<T>,
    size: usize,
    marker: PhantomData<Box<Node<T>>>,
}

// SAFETY: A `Tree` uniquely owns every node reachable from its root, exactly like a `Box` would.
// Nothing outside the tree can reach a node, so sending the tree sends all of its values.
unsafe impl<T: Send> Send for Tree<T> {}
// SAFETY: `&Tree` only hands out shared access to the values, so sharing is fine when `T` is.
unsafe impl<T: Sync> Sync for Tree<T> {}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Clone for Tree<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            root: self.root.node().map_or_else(Link::none, Node::clone_subtree),
            size: self.size,
            marker: PhantomData,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.root = source.root.node().map_or_else(Link::none, Node::clone_subtree);
        self.size = source.size;
    }
}

impl<T> PartialEq for Tree<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && Node::subtrees_equal(self.root.node(), other.root.node())
    }
}

impl<T> Eq for Tree<T> where T: Eq {}

impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        if let Some(root) = self.root.node() {
            root.debug_in_order(&mut set);
        }
        set.finish()
    }
}

impl<T> FromIterator<T> for Tree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(values: I) -> Self {
        let mut tree = Self::new();
        tree.insert_all(values);
        tree
    }
}

impl<T, const N: usize> From<[T; N]> for Tree<T>
where
    T: Ord,
{
    fn from(values: [T; N]) -> Self {
        Self::from_values(values)
    }
}

impl<T> Extend<T> for Tree<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, values: I) {
        self.insert_all(values);
    }
}

impl<T> Tree<T> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: Link::none(),
            size: 0,
            marker: PhantomData,
        }
    }

    /// Takes ownership of a detached subtree. The size is only used for logging by `clear`.
    fn from_root(root: Link<T>) -> Self {
        Self {
            root,
            size: 0,
            marker: PhantomData,
        }
    }

    /// Builds a tree by inserting every value in iteration order. Later duplicates are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_set::Tree;
    ///
    /// let tree = Tree::from_values(vec![5, 3, 8, 3]);
    /// assert_eq!(tree.size(), 3);
    /// ```
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Ord,
    {
        values.into_iter().collect()
    }

    /// The number of values in the tree.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Whether `value` is stored in the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_set::Tree;
    ///
    /// let tree = Tree::from([5, 3, 8]);
    ///
    /// assert!(tree.exists(&3));
    /// assert!(!tree.exists(&42));
    /// ```
    pub fn exists(&self, value: &T) -> bool
    where
        T: Ord,
    {
        self.root.find(value).is_some()
    }

    /// Inserts `value` into the tree. Returns `false`, leaving the tree untouched, if an equal
    /// value is already stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_set::Tree;
    ///
    /// let mut tree = Tree::new();
    ///
    /// assert!(tree.insert(1));
    /// assert!(!tree.insert(1));
    /// assert_eq!(tree.size(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool
    where
        T: Ord,
    {
        if self.root.is_none() {
            self.root = Link::from_boxed(Node::new_boxed(value, Link::none()));
            self.size = 1;
            return true;
        }

        let Some((mut parent, side)) = self.root.insert_position(&value) else {
            #[cfg(feature = "tracing")]
            tracing::trace!(size = self.size, "insert: duplicate ignored");
            return false;
        };

        let child = Link::from_boxed(Node::new_boxed(value, parent));
        if let Some(parent) = parent.node_mut() {
            *parent.child_mut(side) = child;

            if cfg!(debug_assertions) {
                if let Some(left) = parent.left() {
                    assert!(parent.value > left.value);
                }
                if let Some(right) = parent.right() {
                    assert!(parent.value < right.value);
                }
            }
        }
        self.size += 1;

        #[cfg(feature = "tracing")]
        tracing::trace!(size = self.size, "insert: created node");
        true
    }

    /// Inserts every value in iteration order. Values already stored, including ones inserted
    /// earlier in the same call, are skipped.
    pub fn insert_all<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Ord,
    {
        for value in values {
            self.insert(value);
        }
    }

    /// Replaces the contents of the tree with `values`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_set::Tree;
    ///
    /// let mut tree = Tree::from([1, 2, 3]);
    /// tree.assign(vec![7, 8]);
    ///
    /// assert_eq!(tree, Tree::from([7, 8]));
    /// ```
    pub fn assign<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Ord,
    {
        self.clear();
        self.insert_all(values);
    }

    /// Removes `value` from the tree. Returns `false` if it wasn't stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_set::Tree;
    ///
    /// let mut tree = Tree::from([5, 3, 8]);
    ///
    /// assert!(tree.remove(&5));
    /// assert!(!tree.remove(&5));
    /// assert_eq!(tree.size(), 2);
    /// ```
    pub fn remove(&mut self, value: &T) -> bool
    where
        T: Ord,
    {
        self.take(value).is_some()
    }

    /// Removes `value` from the tree and returns the stored value equal to it, if any.
    ///
    /// A node with two children isn't detached itself. It receives the value of its in-order
    /// predecessor (the largest value in its left subtree) and the predecessor's node is detached
    /// instead.
    pub fn take(&mut self, value: &T) -> Option<T>
    where
        T: Ord,
    {
        let mut target = self.root.find(value);
        let Some(node) = target.node_mut() else {
            #[cfg(feature = "tracing")]
            tracing::trace!(size = self.size, "remove: not found");
            return None;
        };

        let two_children = node.left.is_some() && node.right.is_some();
        if two_children {
            let mut predecessor = node.left.max();
            // The left child exists so its subtree has a maximum.
            if let Some(max) = predecessor.node_mut() {
                std::mem::swap(&mut node.value, &mut max.value);
                target = predecessor;
            }
        }

        let removed = self.unlink(target);
        self.size -= 1;

        #[cfg(feature = "tracing")]
        tracing::trace!(size = self.size, two_children, "remove: detached node");
        removed
    }

    /// Drops every node, leaving an empty tree.
    pub fn clear(&mut self) {
        let mut stack: Vec<NonNull<Node<T>>> = self.root.take().0.into_iter().collect();
        #[cfg(feature = "tracing")]
        let released = self.size;

        while let Some(ptr) = stack.pop() {
            // SAFETY: Every pointer on the stack came from exactly one owning link (the root or a
            // child link of a node already turned back into a `Box`), and the root link was taken
            // above, so each node is reconstructed once. Nodes were allocated with `Box::new` in
            // `Node::new_boxed`.
            let node = unsafe { Box::from_raw(ptr.as_ptr()) };
            stack.extend(node.left.0);
            stack.extend(node.right.0);
        }
        self.size = 0;

        #[cfg(feature = "tracing")]
        tracing::debug!(released, "clear: released nodes");
    }

    /// Writes an indented diagram of the tree to `sink`. See [`Diagram`] for the layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_set::Tree;
    ///
    /// let tree = Tree::from([5, 3, 8]);
    /// let mut out = Vec::new();
    /// tree.print(&mut out).unwrap();
    ///
    /// assert_eq!(String::from_utf8(out).unwrap(), "   8\n5\n   3\n");
    /// ```
    pub fn print<W>(&self, sink: &mut W) -> io::Result<()>
    where
        W: io::Write,
        T: fmt::Display,
    {
        write!(sink, "{}", self.diagram())?;
        sink.flush()
    }

    /// A [`Display`](fmt::Display)able view of the tree's shape.
    pub fn diagram(&self) -> Diagram<'_, T> {
        Diagram::new(self)
    }

    pub(crate) fn fmt_diagram(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result
    where
        T: fmt::Display,
    {
        match self.root.node() {
            Some(root) => root.fmt_diagram(f, 0, indent),
            None => Ok(()),
        }
    }

    /// Detaches a node with at most one child, hooking that child (if any) into the node's place.
    /// Returns the detached node's value, or `None` if `link` was empty.
    fn unlink(&mut self, link: Link<T>) -> Option<T> {
        let ptr = link.0?;
        // SAFETY: `link` was found by walking down from `self.root` so it points at a live node
        // of this tree that was allocated by `Node::new_boxed`. Its parent's child link is
        // overwritten below before anything could read it again, so this `Box` is the only owner.
        let mut node = unsafe { Box::from_raw(ptr.as_ptr()) };
        debug_assert!(node.left.is_none() || node.right.is_none());

        let mut child = if node.left.is_some() {
            node.left.take()
        } else {
            node.right.take()
        };
        if let Some(child) = child.node_mut() {
            child.parent = node.parent;
        }

        let mut parent = node.parent;
        match parent.node_mut() {
            Some(parent) if parent.left == link => parent.left = child,
            Some(parent) => parent.right = child,
            None => self.root = child,
        }

        let Node { value, .. } = *node;
        Some(value)
    }

    /// Walks the whole tree asserting the ordering, parent links, and size.
    #[cfg(test)]
    pub(crate) fn assert_valid(&self)
    where
        T: Ord,
    {
        let Some(root) = self.root.node() else {
            assert_eq!(self.size, 0);
            return;
        };
        assert!(root.parent.is_none());
        assert_eq!(root.assert_valid(self.root, None, None), self.size);
    }

    /// The values in ascending order.
    #[cfg(test)]
    pub(crate) fn in_order(&self) -> Vec<T>
    where
        T: Clone,
    {
        fn walk<T: Clone>(node: Option<&Node<T>>, out: &mut Vec<T>) {
            if let Some(node) = node {
                walk(node.left(), out);
                out.push(node.value.clone());
                walk(node.right(), out);
            }
        }

        let mut out = Vec::with_capacity(self.size);
        walk(self.root.node(), &mut out);
        out
    }
}

/// Which child slot of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Side {
    Left,
    Right,
}

struct Link<T>(Option<NonNull<Node<T>>>);

impl<T> Clone for Link<T> {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}
impl<T> Copy for Link<T> {}

impl<T> PartialEq for Link<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Link<T> {
    fn none() -> Self {
        Self(None)
    }

    fn from_boxed(node: Box<Node<T>>) -> Self {
        Self(Some(NonNull::from(Box::leak(node))))
    }

    fn is_some(&self) -> bool {
        self.0.is_some()
    }

    fn is_none(&self) -> bool {
        self.0.is_none()
    }

    fn node(&self) -> Option<&Node<T>> {
        // SAFETY: A non-empty link always points at a live node owned by the tree this link was
        // read from. Links are only stored in a `Tree` or its nodes and every node removal
        // rewires the links pointing at it, so the pointer can't dangle. Mutable access requires
        // `&mut Tree`, so no `&mut Node` can exist while the tree is borrowed for this read.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    fn node_mut(&mut self) -> Option<&mut Node<T>> {
        // SAFETY: See `node`. Callers hold `&mut Tree` and don't keep two mutable references to
        // the same node alive at once.
        unsafe { self.0.as_mut().map(|ptr| ptr.as_mut()) }
    }

    fn take(&mut self) -> Self {
        Self(self.0.take())
    }

    /// Follows right children to the largest node of this subtree.
    fn max(self) -> Self {
        let mut link = self;
        while let Some(right) = link.node().map(|node| node.right).filter(Link::is_some) {
            link = right;
        }
        link
    }

    /// Searches this subtree for `value`. Returns an empty link when it isn't stored.
    fn find(self, value: &T) -> Self
    where
        T: Ord,
    {
        let mut link = self;
        while let Some(node) = link.node() {
            link = match value.cmp(&node.value) {
                Ordering::Less => node.left,
                Ordering::Equal => return link,
                Ordering::Greater => node.right,
            };
        }
        link
    }

    /// Finds the node and empty child slot where `value` belongs. Returns `None` if `value` is
    /// already stored. Equality has to be checked at every node on the way down, including the
    /// one whose slot is empty, or the last duplicate would slip through.
    fn insert_position(self, value: &T) -> Option<(Self, Side)>
    where
        T: Ord,
    {
        let mut link = self;
        loop {
            let node = link.node()?;
            let side = match value.cmp(&node.value) {
                Ordering::Less => Side::Left,
                Ordering::Equal => return None,
                Ordering::Greater => Side::Right,
            };
            let next = node.child(side);
            if next.is_none() {
                return Some((link, side));
            }
            link = next;
        }
    }

    /// Points the parent links of this node's children back at this node.
    fn fix_child_parents(self) {
        let mut this = self;
        if let Some(node) = this.node_mut() {
            for mut child in [node.left, node.right] {
                if let Some(child) = child.node_mut() {
                    child.parent = self;
                }
            }
        }
    }
}

struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
    parent: Link<T>,
}

impl<T> Node<T> {
    fn new_boxed(value: T, parent: Link<T>) -> Box<Self> {
        Box::new(Node {
            value,
            left: Link::none(),
            right: Link::none(),
            parent,
        })
    }

    fn left(&self) -> Option<&Self> {
        self.left.node()
    }

    fn right(&self) -> Option<&Self> {
        self.right.node()
    }

    fn child(&self, side: Side) -> Link<T> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn child_mut(&mut self, side: Side) -> &mut Link<T> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Deep copies this subtree. The copy's root has no parent; every other parent link points
    /// into the copy.
    fn clone_subtree(&self) -> Link<T>
    where
        T: Clone,
    {
        // Held by owning trees until linked so a panicking `T::clone` frees what was copied.
        let mut left = Tree::from_root(self.left().map_or_else(Link::none, Self::clone_subtree));
        let mut right = Tree::from_root(self.right().map_or_else(Link::none, Self::clone_subtree));
        let value = self.value.clone();
        let link = Link::from_boxed(Box::new(Node {
            value,
            left: left.root.take(),
            right: right.root.take(),
            parent: Link::none(),
        }));
        link.fix_child_parents();
        link
    }

    fn subtrees_equal(lhs: Option<&Self>, rhs: Option<&Self>) -> bool
    where
        T: PartialEq,
    {
        match (lhs, rhs) {
            (Some(lhs), Some(rhs)) => lhs.equals(rhs),
            (None, None) => true,
            _ => false,
        }
    }

    fn equals(&self, other: &Self) -> bool
    where
        T: PartialEq,
    {
        self.value == other.value
            && Self::subtrees_equal(self.left(), other.left())
            && Self::subtrees_equal(self.right(), other.right())
    }

    fn fmt_diagram(&self, f: &mut fmt::Formatter<'_>, depth: usize, indent: usize) -> fmt::Result
    where
        T: fmt::Display,
    {
        if let Some(right) = self.right() {
            right.fmt_diagram(f, depth + 1, indent)?;
        }
        writeln!(f, "{:width$}{}", "", self.value, width = depth * indent)?;
        if let Some(left) = self.left() {
            left.fmt_diagram(f, depth + 1, indent)?;
        }
        Ok(())
    }

    fn debug_in_order(&self, set: &mut fmt::DebugSet<'_, '_>)
    where
        T: fmt::Debug,
    {
        if let Some(left) = self.left() {
            left.debug_in_order(set);
        }
        set.entry(&self.value);
        if let Some(right) = self.right() {
            right.debug_in_order(set);
        }
    }

    /// Asserts this subtree is ordered within `(low, high)` and that every child points back at
    /// its parent. `this` must be the link that owns `self`. Returns the subtree's node count.
    #[cfg(test)]
    fn assert_valid(&self, this: Link<T>, low: Option<&T>, high: Option<&T>) -> usize
    where
        T: Ord,
    {
        if let Some(low) = low {
            assert!(&self.value > low);
        }
        if let Some(high) = high {
            assert!(&self.value < high);
        }

        let mut count = 1;
        if let Some(left) = self.left() {
            assert!(left.parent == this);
            count += left.assert_valid(self.left, low, Some(&self.value));
        }
        if let Some(right) = self.right() {
            assert!(right.parent == this);
            count += right.assert_valid(self.right, Some(&self.value), high);
        }
        count
    }
}


#[cfg(test)]
mod quicktests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::test::quick::Op;

    /// Applies a set of operations to a tree and a `BTreeSet` side by side, checking the tree's
    /// invariants after every step.
    fn do_ops<T>(ops: &[Op<T>], bst: &mut Tree<T>, set: &mut BTreeSet<T>)
    where
        T: Ord + Clone + fmt::Debug,
    {
        for op in ops {
            match op {
                Op::Insert(x) => {
                    assert_eq!(bst.insert(x.clone()), set.insert(x.clone()));
                }
                Op::Remove(x) => {
                    assert_eq!(bst.take(x), set.take(x));
                }
                Op::CloneTree => {
                    let copy = bst.clone();
                    assert_eq!(&copy, bst);
                    *bst = copy;
                }
            }
            bst.assert_valid();
            assert_eq!(bst.size(), set.len());
        }
    }

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
            let mut tree = Tree::new();
            let mut set = BTreeSet::new();

            do_ops(&ops, &mut tree, &mut set);
            tree.in_order() == set.into_iter().collect::<Vec<_>>()
        }
    }

    quickcheck::quickcheck! {
        fn contains(xs: Vec<i8>) -> bool {
            let tree: Tree<_> = xs.iter().copied().collect();
            tree.assert_valid();

            xs.iter().all(|x| tree.exists(x))
        }
    }
}
