//! Truncation of a tree on either side.
//!
//! Both directions descend only along the path to the boundary element.
//! Nodes on that path are copied and truncated; every subtree entirely
//! inside the kept range is shared with the source tree.
//!
//! A two-sided slice descends to the lowest node holding the whole range,
//! truncates the two boundary children separately and concatenates the
//! pieces, so the result is no taller than its length requires.

use std::iter;

use super::super::ReferenceCounter;
use super::concat::concatenate;
use super::node::{Branch, EXTRA_SEARCH_STEPS, Node, collapse};

type Link<T> = ReferenceCounter<Node<T>>;

/// Keeps the elements `[start, end)`.
///
/// Requires `start < end <= node.len()`. The result is a valid root.
pub(super) fn slice<T: Clone>(node: &Link<T>, start: usize, end: usize) -> Link<T> {
    debug_assert!(start < end && end <= node.len());
    if start == 0 && end == node.len() {
        return node.clone();
    }
    match node.as_ref() {
        Node::Leaf(elements) => {
            ReferenceCounter::new(Node::Leaf(elements[start..end].iter().cloned().collect()))
        }
        Node::Branch(branch) => {
            let first = branch.slot_for(start);
            let last = branch.slot_for(end - 1);
            let first_offset = branch.offset_of(first);
            if first == last {
                return slice(
                    &branch.children[first],
                    start - first_offset,
                    end - first_offset,
                );
            }

            let left = collapse(slice_left(&branch.children[first], start - first_offset));
            let right = collapse(slice_right(
                &branch.children[last],
                end - branch.offset_of(last),
            ));
            let left = if last - first > 1 {
                let middle = Branch::from_children(
                    branch.height,
                    branch.children[first + 1..last].iter().cloned(),
                );
                let middle = collapse(ReferenceCounter::new(Node::Branch(middle)));
                concatenate(&left, &middle, EXTRA_SEARCH_STEPS)
            } else {
                left
            };
            concatenate(&left, &right, EXTRA_SEARCH_STEPS)
        }
    }
}

/// Keeps the elements `[0, end)`.
///
/// The result has the same height as `node`; the caller collapses the root.
/// Requires `0 < end`.
pub(super) fn slice_right<T: Clone>(node: &Link<T>, end: usize) -> Link<T> {
    debug_assert!(end > 0);
    if end >= node.len() {
        return node.clone();
    }
    match node.as_ref() {
        Node::Leaf(elements) => {
            ReferenceCounter::new(Node::Leaf(elements[..end].iter().cloned().collect()))
        }
        Node::Branch(branch) => {
            let last = branch.slot_for(end - 1);
            let child = slice_right(&branch.children[last], end - branch.offset_of(last));
            let children = branch.children[..last].iter().cloned().chain(iter::once(child));
            ReferenceCounter::new(Node::Branch(Branch::from_children(branch.height, children)))
        }
    }
}

/// Keeps the elements `[start, len)`.
///
/// The result has the same height as `node`; the caller collapses the root.
/// Requires `start < node.len()`.
pub(super) fn slice_left<T: Clone>(node: &Link<T>, start: usize) -> Link<T> {
    debug_assert!(start < node.len());
    if start == 0 {
        return node.clone();
    }
    match node.as_ref() {
        Node::Leaf(elements) => {
            ReferenceCounter::new(Node::Leaf(elements[start..].iter().cloned().collect()))
        }
        Node::Branch(branch) => {
            let first = branch.slot_for(start);
            let child = slice_left(&branch.children[first], start - branch.offset_of(first));
            let children =
                iter::once(child).chain(branch.children[first + 1..].iter().cloned());
            ReferenceCounter::new(Node::Branch(Branch::from_children(branch.height, children)))
        }
    }
}

/// Resolves a possibly negative index against `length`, clamping the result
/// to `[0, length]`.
pub(super) const fn resolve_index(index: isize, length: usize) -> usize {
    let magnitude = index.unsigned_abs();
    if index < 0 {
        length.saturating_sub(magnitude)
    } else if magnitude > length {
        length
    } else {
        magnitude
    }
}
