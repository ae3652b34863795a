//! Iterators over a [`PersistentVector`](super::PersistentVector).
//!
//! Both iterators walk the tree depth-first with an explicit stack, visiting
//! every node once, so a full traversal is O(N).

use std::iter::FusedIterator;
use std::slice;

use smallvec::SmallVec;

use super::super::ReferenceCounter;
use super::node::Node;

/// Inline stack depth; a tree of this height holds 32^9 elements.
const INLINE_DEPTH: usize = 8;

// =============================================================================
// Borrowing Iterator
// =============================================================================

/// An iterator over references to the elements of a
/// [`PersistentVector`](super::PersistentVector).
pub struct PersistentVectorIterator<'a, T> {
    /// Remaining children of every branch on the current path.
    stack: SmallVec<[slice::Iter<'a, ReferenceCounter<Node<T>>>; INLINE_DEPTH]>,
    /// Remaining elements of the current leaf.
    leaf: slice::Iter<'a, T>,
    remaining: usize,
}

impl<'a, T> PersistentVectorIterator<'a, T> {
    pub(super) fn new(root: &'a Node<T>) -> Self {
        let mut stack = SmallVec::new();
        let leaf = match root {
            Node::Leaf(elements) => elements.iter(),
            Node::Branch(branch) => {
                stack.push(branch.children.iter());
                let empty: &'a [T] = &[];
                empty.iter()
            }
        };
        Self {
            stack,
            leaf,
            remaining: root.len(),
        }
    }
}

impl<'a, T> Iterator for PersistentVectorIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(element) = self.leaf.next() {
                self.remaining -= 1;
                return Some(element);
            }
            let next_child = self.stack.last_mut()?.next();
            match next_child.map(|child| &**child) {
                Some(Node::Leaf(elements)) => self.leaf = elements.iter(),
                Some(Node::Branch(branch)) => self.stack.push(branch.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PersistentVectorIterator<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for PersistentVectorIterator<'_, T> {}

// =============================================================================
// Owning Iterator
// =============================================================================

/// What the owning iterator does after inspecting the top of its stack.
enum Step<T> {
    Yield(T),
    Descend(ReferenceCounter<Node<T>>),
    Ascend,
}

/// An owning iterator over the elements of a
/// [`PersistentVector`](super::PersistentVector).
///
/// Nodes may be shared with other vectors, so elements are cloned out of
/// the tree as they are returned.
pub struct PersistentVectorIntoIterator<T> {
    /// Nodes on the current path with the position of the next slot to visit.
    stack: SmallVec<[(ReferenceCounter<Node<T>>, usize); INLINE_DEPTH]>,
    remaining: usize,
}

impl<T> PersistentVectorIntoIterator<T> {
    pub(super) fn new(root: ReferenceCounter<Node<T>>) -> Self {
        let remaining = root.len();
        let mut stack = SmallVec::new();
        stack.push((root, 0));
        Self { stack, remaining }
    }
}

impl<T: Clone> Iterator for PersistentVectorIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let step = {
                let (node, position) = self.stack.last_mut()?;
                match &**node {
                    Node::Leaf(elements) => elements
                        .get(*position)
                        .cloned()
                        .map_or(Step::Ascend, Step::Yield),
                    Node::Branch(branch) => branch
                        .children
                        .get(*position)
                        .cloned()
                        .map_or(Step::Ascend, Step::Descend),
                }
            };
            match step {
                Step::Yield(element) => {
                    self.advance();
                    self.remaining -= 1;
                    return Some(element);
                }
                Step::Descend(child) => {
                    self.advance();
                    self.stack.push((child, 0));
                }
                Step::Ascend => {
                    self.stack.pop();
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> PersistentVectorIntoIterator<T> {
    fn advance(&mut self) {
        if let Some((_, position)) = self.stack.last_mut() {
            *position += 1;
        }
    }
}

impl<T: Clone> ExactSizeIterator for PersistentVectorIntoIterator<T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T: Clone> FusedIterator for PersistentVectorIntoIterator<T> {}
