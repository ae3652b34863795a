//! Bottom-up construction of a vector from a finite sequence.
//!
//! Elements are buffered into full leaves, full leaves into full parents and
//! so on, in a single linear pass. The result has exactly the shape that
//! repeated `push_back` produces: every node is full except those on the
//! right spine.

use std::mem;

use arrayvec::ArrayVec;

use super::super::ReferenceCounter;
use super::node::{Branch, Node, Slots, collapse};

/// Incremental builder producing a densely packed tree.
pub(super) struct TreeBuilder<T> {
    /// Leaf currently being filled.
    leaf: Slots<T>,
    /// `open[level]` is the branch of height `level + 1` currently being filled.
    open: Vec<Branch<T>>,
}

impl<T> TreeBuilder<T> {
    pub(super) const fn new() -> Self {
        Self {
            leaf: ArrayVec::new_const(),
            open: Vec::new(),
        }
    }

    pub(super) fn push(&mut self, element: T) {
        self.leaf.push(element);
        if self.leaf.is_full() {
            let leaf = mem::take(&mut self.leaf);
            self.push_node(Node::Leaf(leaf));
        }
    }

    /// Links a finished node into the open branch one level above it,
    /// cascading upwards whenever a branch fills up.
    fn push_node(&mut self, node: Node<T>) {
        let mut node = node;
        loop {
            let level = node.height();
            if self.open.len() == level {
                self.open.push(Branch::empty(level + 1));
            }
            let open = &mut self.open[level];
            open.push_child(ReferenceCounter::new(node));
            if !open.children.is_full() {
                return;
            }
            node = Node::Branch(mem::replace(open, Branch::empty(level + 1)));
        }
    }

    /// Flushes every partially filled node and returns the root.
    pub(super) fn finish(mut self) -> ReferenceCounter<Node<T>> {
        if self.open.is_empty() {
            return ReferenceCounter::new(Node::Leaf(self.leaf));
        }

        if !self.leaf.is_empty() {
            let leaf = mem::take(&mut self.leaf);
            self.push_node(Node::Leaf(leaf));
        }

        // Flushing a level may fill (and create) the levels above it, so the
        // bound is re-read on every iteration.
        let mut level = 0;
        while level + 1 < self.open.len() {
            if !self.open[level].children.is_empty() {
                let partial = mem::replace(&mut self.open[level], Branch::empty(level + 1));
                self.push_node(Node::Branch(partial));
            }
            level += 1;
        }

        let top = self.open.pop().map_or_else(Node::empty, Node::Branch);
        collapse(ReferenceCounter::new(top))
    }
}

impl<T> Extend<T> for TreeBuilder<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.push(element);
        }
    }
}

/// Builds a tree from an iterator in O(N).
pub(super) fn build_tree<T, I>(iter: I) -> ReferenceCounter<Node<T>>
where
    I: IntoIterator<Item = T>,
{
    let mut builder = TreeBuilder::new();
    builder.extend(iter);
    builder.finish()
}
