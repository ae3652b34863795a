//! Concatenation of two trees.
//!
//! The right spine of the left tree is merged with the left spine of the
//! right tree, level by level from the bottom up. At every branch level the
//! children touched by the merge are gathered and, when they are packed so
//! loosely that lookups would pay more than the allowed number of extra
//! search steps, redistributed into fuller nodes. Subtrees away from the
//! seam are shared with both inputs.

use std::mem;

use super::super::ReferenceCounter;
use super::node::{BRANCHING_FACTOR, Branch, Node, collapse};

type Link<T> = ReferenceCounter<Node<T>>;

/// Concatenates two trees.
///
/// `tolerance` is the number of extra search steps a lookup may pay before
/// the seam is redistributed. The public vector API uses
/// [`EXTRA_SEARCH_STEPS`](super::node::EXTRA_SEARCH_STEPS).
pub(super) fn concatenate<T: Clone>(left: &Link<T>, right: &Link<T>, tolerance: usize) -> Link<T> {
    if left.is_empty() {
        return right.clone();
    }
    if right.is_empty() {
        return left.clone();
    }

    match merge(left, right, tolerance) {
        (merged, None) => collapse(merged),
        (merged_left, Some(merged_right)) => {
            let height = merged_left.height() + 1;
            ReferenceCounter::new(Node::Branch(Branch::from_children(
                height,
                [merged_left, merged_right],
            )))
        }
    }
}

/// Merges two non-empty trees into one or two nodes of height
/// `max(left.height(), right.height())`.
///
/// The second node is `None` when everything fits into the first.
fn merge<T: Clone>(left: &Link<T>, right: &Link<T>, tolerance: usize) -> (Link<T>, Option<Link<T>>) {
    if let (Node::Leaf(left_elements), Node::Leaf(right_elements)) = (left.as_ref(), right.as_ref()) {
        if left_elements.len() + right_elements.len() > BRANCHING_FACTOR {
            return (left.clone(), Some(right.clone()));
        }
        let mut joined = left_elements.clone();
        joined.extend(right_elements.iter().cloned());
        return (ReferenceCounter::new(Node::Leaf(joined)), None);
    }

    let height = left.height().max(right.height());
    let mut children: Vec<Link<T>> = Vec::with_capacity(2 * BRANCHING_FACTOR);

    // Descend into the seam only on the side(s) that are at the current
    // height; a shorter side is merged whole one level further down.
    let inner_left = match left.as_ref() {
        Node::Branch(branch) if branch.height == height => {
            let (last, rest) = branch
                .children
                .split_last()
                .expect("non-root branches are never empty");
            children.extend(rest.iter().cloned());
            last
        }
        _ => left,
    };
    let (inner_right, right_rest) = match right.as_ref() {
        Node::Branch(branch) if branch.height == height => {
            let (first, rest) = branch
                .children
                .split_first()
                .expect("non-root branches are never empty");
            (first, rest)
        }
        _ => (right, &[][..]),
    };

    let (middle_left, middle_right) = merge(inner_left, inner_right, tolerance);
    children.push(middle_left);
    children.extend(middle_right);
    children.extend(right_rest.iter().cloned());

    let children = rebalance(children, tolerance);
    split(height, children)
}

/// Number of extra nodes `children` occupies compared to a fully packed
/// layout of the same slots; each one costs lookups an extra scan step.
fn search_penalty<T>(children: &[Link<T>]) -> usize {
    let slots: usize = children.iter().map(|child| child.slot_count()).sum();
    children.len() - slots.div_ceil(BRANCHING_FACTOR)
}

fn rebalance<T: Clone>(children: Vec<Link<T>>, tolerance: usize) -> Vec<Link<T>> {
    let penalty = search_penalty(&children);
    if penalty <= tolerance {
        return children;
    }
    tracing::trace!(
        height = children[0].height() + 1,
        children = children.len(),
        penalty,
        tolerance,
        "redistributing concatenation seam"
    );
    redistribute(children, penalty)
}

/// Packs the slots of `children` into fewer nodes until `excess` nodes have
/// been eliminated.
///
/// Leading full children are kept as they are. Slots of the following
/// children are moved into fresh, full nodes; once enough nodes have been
/// eliminated the remaining children are kept (shared) as well.
fn redistribute<T: Clone>(children: Vec<Link<T>>, excess: usize) -> Vec<Link<T>> {
    let child_height = children[0].height();
    let mut result = Vec::with_capacity(children.len() - excess);
    let mut sources = children.into_iter().peekable();

    while let Some(full) = sources.next_if(|child| child.is_full()) {
        result.push(full);
    }

    let mut pending = Node::empty_at(child_height);
    // Source nodes read completely / fresh full nodes written. Their
    // difference, minus the pending node, is the number of nodes removed.
    let mut consumed = 0_usize;
    let mut produced = 0_usize;
    let mut partial: Option<(Link<T>, usize)> = None;

    loop {
        if partial.is_none() {
            let removed = consumed - produced - usize::from(!pending.is_empty());
            if removed >= excess {
                break;
            }
        }

        let (source, offset) = match partial.take() {
            Some(entry) => entry,
            None => match sources.next() {
                Some(source) => (source, 0),
                None => break,
            },
        };

        let room = BRANCHING_FACTOR - pending.slot_count();
        let end = source.slot_count().min(offset + room);
        pending.extend_from(&source, offset..end);
        if end == source.slot_count() {
            consumed += 1;
        } else {
            partial = Some((source, end));
        }

        if pending.is_full() {
            let packed = mem::replace(&mut pending, Node::empty_at(child_height));
            result.push(ReferenceCounter::new(packed));
            produced += 1;
        }
    }

    if !pending.is_empty() {
        result.push(ReferenceCounter::new(pending));
    }
    result.extend(sources);
    result
}

/// Splits at most `2 * BRANCHING_FACTOR` children into a full-as-possible
/// left node and an optional right node.
fn split<T>(height: usize, children: Vec<Link<T>>) -> (Link<T>, Option<Link<T>>) {
    debug_assert!(children.len() <= 2 * BRANCHING_FACTOR);
    let mut children = children.into_iter();
    let left = Branch::from_children(height, children.by_ref().take(BRANCHING_FACTOR));
    let right = Branch::from_children(height, children);

    let left = ReferenceCounter::new(Node::Branch(left));
    if right.children.is_empty() {
        (left, None)
    } else {
        (left, Some(ReferenceCounter::new(Node::Branch(right))))
    }
}

#[cfg(test)]
mod tests {
    use super::super::builder::build_tree;
    use super::super::node::EXTRA_SEARCH_STEPS;
    use super::*;
    use rstest::rstest;

    fn leaf(range: std::ops::Range<usize>) -> Link<usize> {
        ReferenceCounter::new(Node::Leaf(range.collect()))
    }

    fn collect(root: &Link<usize>) -> Vec<usize> {
        root.fold_left(Vec::new(), &mut |mut accumulator, element| {
            accumulator.push(*element);
            accumulator
        })
    }

    #[rstest]
    fn test_small_leaves_are_joined() {
        let joined = concatenate(&leaf(0..10), &leaf(10..20), EXTRA_SEARCH_STEPS);
        assert_eq!(joined.height(), 0);
        assert_eq!(collect(&joined), (0..20).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_large_leaves_get_a_parent() {
        let joined = concatenate(&leaf(0..20), &leaf(20..40), EXTRA_SEARCH_STEPS);
        assert_eq!(joined.height(), 1);
        assert_eq!(joined.assert_invariants(true), 40);
        assert_eq!(collect(&joined), (0..40).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_search_penalty_counts_wasted_nodes() {
        let loose = vec![leaf(0..10), leaf(0..10), leaf(0..10), leaf(0..10)];
        assert_eq!(search_penalty(&loose), 3);
        let dense = vec![leaf(0..32), leaf(0..32), leaf(0..1)];
        assert_eq!(search_penalty(&dense), 0);
    }

    #[rstest]
    fn test_redistribute_keeps_leading_full_children() {
        let full = leaf(0..32);
        let children = vec![full.clone(), leaf(32..42), leaf(42..52), leaf(52..62), leaf(62..72)];
        assert_eq!(search_penalty(&children), 2);
        let packed = redistribute(children, 2);

        assert_eq!(packed.len(), 3);
        assert!(ReferenceCounter::ptr_eq(&packed[0], &full));
        assert_eq!(packed[1].slot_count(), 32);
        assert_eq!(packed[2].slot_count(), 8);
        let root = ReferenceCounter::new(Node::Branch(Branch::from_children(1, packed)));
        assert_eq!(collect(&root), (0..72).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_redistribute_stops_once_penalty_is_removed() {
        let third = leaf(20..30);
        let tail = leaf(50..55);
        let children = vec![leaf(0..10), leaf(10..20), third.clone(), leaf(30..50), tail.clone()];
        let packed = redistribute(children, 1);

        assert_eq!(packed.len(), 4);
        assert_eq!(packed[0].slot_count(), 20);
        assert!(ReferenceCounter::ptr_eq(&packed[1], &third));
        assert!(ReferenceCounter::ptr_eq(&packed[3], &tail));
        let root = ReferenceCounter::new(Node::Branch(Branch::from_children(1, packed)));
        assert_eq!(collect(&root), (0..55).collect::<Vec<_>>());
    }

    #[rstest]
    #[case(0)]
    #[case(EXTRA_SEARCH_STEPS)]
    #[case(usize::MAX)]
    fn test_tolerance_never_changes_contents(#[case] tolerance: usize) {
        let mut root = build_tree(0..0_usize);
        let mut expected = Vec::new();
        let mut next = 0;
        for size in [1, 33, 7, 1000, 31, 64, 5, 2048, 3, 40] {
            let piece = build_tree(next..next + size);
            expected.extend(next..next + size);
            next += size;
            root = concatenate(&root, &piece, tolerance);
            root.assert_invariants(true);
        }
        assert_eq!(collect(&root), expected);
    }

    #[rstest]
    fn test_zero_tolerance_packs_the_seam() {
        let mut root = build_tree(0..0_usize);
        for start in (0..640).step_by(20) {
            root = concatenate(&root, &build_tree(start..start + 20), 0);
        }
        let Node::Branch(branch) = root.as_ref() else {
            panic!("expected a branch");
        };
        assert_eq!(search_penalty(&branch.children), 0);
        assert_eq!(collect(&root), (0..640).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_unrelated_subtrees_are_shared() {
        let left = build_tree(0..(32 * 32 * 3));
        let right = build_tree(0..100);
        let joined = concatenate(&left, &right, EXTRA_SEARCH_STEPS);

        let (Node::Branch(left_branch), Node::Branch(joined_branch)) = (left.as_ref(), joined.as_ref())
        else {
            panic!("expected branches");
        };
        assert!(ReferenceCounter::ptr_eq(
            &left_branch.children[0],
            &joined_branch.children[0]
        ));
    }

    #[rstest]
    fn test_shorter_right_tree_is_merged_into_right_spine() {
        let left = build_tree(0..(32 * 32 + 40));
        let right = build_tree(0..3);
        let joined = concatenate(&left, &right, EXTRA_SEARCH_STEPS);
        assert_eq!(joined.height(), left.height());
        assert_eq!(joined.assert_invariants(true), 32 * 32 + 43);
    }

    #[rstest]
    fn test_shorter_left_tree_is_merged_into_left_spine() {
        let left = build_tree(0..3);
        let right = build_tree(3..(32 * 32 + 40));
        let joined = concatenate(&left, &right, EXTRA_SEARCH_STEPS);
        assert_eq!(joined.assert_invariants(true), 32 * 32 + 40);
        assert_eq!(collect(&joined), (0..(32 * 32 + 40)).collect::<Vec<_>>());
    }
}
