//! Tree nodes of the relaxed radix balanced vector.
//!
//! A [`Node`] is either a leaf holding up to [`BRANCHING_FACTOR`] elements or
//! a branch holding up to [`BRANCHING_FACTOR`] children of the height below.
//! Branches carry a cumulative length table so that indexing stays
//! logarithmic even when nodes are not densely packed (after slicing or
//! concatenation).
//!
//! Nodes are never mutated once they are reachable from a vector. Every
//! update copies the nodes on the path from the root to the affected leaf
//! and shares all other subtrees through [`ReferenceCounter`].

use arrayvec::ArrayVec;

use super::super::ReferenceCounter;

// =============================================================================
// Constants
// =============================================================================

/// Bits of an index consumed per tree level.
pub(crate) const BITS_PER_LEVEL: usize = 5;

/// Maximum number of slots (elements or children) in a node (2^5 = 32).
pub(crate) const BRANCHING_FACTOR: usize = 1 << BITS_PER_LEVEL;

/// Extra search steps an index lookup may pay after a concatenation before
/// the merged nodes are redistributed.
pub(crate) const EXTRA_SEARCH_STEPS: usize = 2;

static_assertions::const_assert!(BRANCHING_FACTOR.is_power_of_two());
static_assertions::const_assert!(BRANCHING_FACTOR >= 4);

/// Fixed-capacity slot storage shared by leaves, children and length tables.
pub(super) type Slots<S> = ArrayVec<S, BRANCHING_FACTOR>;

// =============================================================================
// Node Definition
// =============================================================================

/// A node of the tree.
#[derive(Clone)]
pub(super) enum Node<T> {
    /// Height 0: the slots are the elements themselves.
    Leaf(Slots<T>),
    /// Height > 0: the slots are subtrees one level shorter.
    Branch(Branch<T>),
}

/// An internal node.
#[derive(Clone)]
pub(super) struct Branch<T> {
    /// Height of this node, always at least 1.
    pub(super) height: usize,
    /// Subtrees of height `height - 1`.
    pub(super) children: Slots<ReferenceCounter<Node<T>>>,
    /// `cumulative_lengths[i]` is the number of elements in `children[..=i]`.
    pub(super) cumulative_lengths: Slots<usize>,
}

impl<T> Branch<T> {
    /// Creates a branch with no children.
    pub(super) fn empty(height: usize) -> Self {
        debug_assert!(height > 0, "a branch must sit above the leaves");
        Self {
            height,
            children: ArrayVec::new(),
            cumulative_lengths: ArrayVec::new(),
        }
    }

    /// Creates a branch from its children, computing the length table.
    ///
    /// # Panics
    ///
    /// Panics if more than [`BRANCHING_FACTOR`] children are supplied.
    pub(super) fn from_children<I>(height: usize, children: I) -> Self
    where
        I: IntoIterator<Item = ReferenceCounter<Node<T>>>,
    {
        let mut branch = Self::empty(height);
        for child in children {
            branch.push_child(child);
        }
        branch
    }

    /// Appends a child to the right end of this branch.
    pub(super) fn push_child(&mut self, child: ReferenceCounter<Node<T>>) {
        debug_assert_eq!(child.height() + 1, self.height, "child height mismatch");
        debug_assert!(!child.is_empty(), "empty subtrees are never linked");
        let length = self.len() + child.len();
        self.children.push(child);
        self.cumulative_lengths.push(length);
    }

    /// Total number of elements below this branch.
    #[inline]
    pub(super) fn len(&self) -> usize {
        self.cumulative_lengths.last().copied().unwrap_or(0)
    }

    /// Number of elements stored before `children[slot]`.
    #[inline]
    pub(super) fn offset_of(&self, slot: usize) -> usize {
        if slot == 0 {
            0
        } else {
            self.cumulative_lengths[slot - 1]
        }
    }

    /// Finds the child containing `index`.
    ///
    /// Every child holds at most `BRANCHING_FACTOR^height` elements, so
    /// `index >> (BITS_PER_LEVEL * height)` never overshoots the right slot
    /// and the scan only moves forward.
    #[inline]
    pub(super) fn slot_for(&self, index: usize) -> usize {
        debug_assert!(index < self.len());
        let mut slot = index >> (BITS_PER_LEVEL * self.height);
        while self.cumulative_lengths[slot] <= index {
            slot += 1;
        }
        slot
    }
}

impl<T> Node<T> {
    /// Creates the empty leaf used as the root of an empty vector.
    #[inline]
    pub(super) const fn empty() -> Self {
        Self::Leaf(ArrayVec::new_const())
    }

    /// Creates an empty node of the given height.
    pub(super) fn empty_at(height: usize) -> Self {
        if height == 0 {
            Self::empty()
        } else {
            Self::Branch(Branch::empty(height))
        }
    }

    /// Creates a chain of single-child nodes of the given height ending in a
    /// leaf that holds `element`.
    pub(super) fn path(element: T, height: usize) -> Self {
        let mut leaf = ArrayVec::new();
        leaf.push(element);
        let mut node = Self::Leaf(leaf);
        for level in 1..=height {
            node = Self::Branch(Branch::from_children(
                level,
                [ReferenceCounter::new(node)],
            ));
        }
        node
    }

    #[inline]
    pub(super) const fn height(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Branch(branch) => branch.height,
        }
    }

    /// Number of elements below this node.
    #[inline]
    pub(super) fn len(&self) -> usize {
        match self {
            Self::Leaf(elements) => elements.len(),
            Self::Branch(branch) => branch.len(),
        }
    }

    #[inline]
    pub(super) fn is_empty(&self) -> bool {
        self.slot_count() == 0
    }

    /// Number of direct slots in use (elements or children).
    #[inline]
    pub(super) fn slot_count(&self) -> usize {
        match self {
            Self::Leaf(elements) => elements.len(),
            Self::Branch(branch) => branch.children.len(),
        }
    }

    #[inline]
    pub(super) fn is_full(&self) -> bool {
        self.slot_count() == BRANCHING_FACTOR
    }

    /// Whether this tree is at most one level taller than a densely packed
    /// tree holding the same elements, i.e. it does not fit two levels lower.
    pub(super) fn is_shallow(&self) -> bool {
        let height = self.height();
        if height < 2 {
            return true;
        }
        // Capacity of a node two levels lower: BRANCHING_FACTOR^(height - 1).
        let bits = BITS_PER_LEVEL * (height - 1);
        bits < usize::BITS as usize && self.len() > 1 << bits
    }

    /// Returns the element at `index`.
    ///
    /// The caller guarantees `index < self.len()`.
    pub(super) fn get(&self, mut index: usize) -> &T {
        let mut node = self;
        loop {
            match node {
                Self::Leaf(elements) => return &elements[index],
                Self::Branch(branch) => {
                    let slot = branch.slot_for(index);
                    index -= branch.offset_of(slot);
                    node = &branch.children[slot];
                }
            }
        }
    }

    /// Applies `function` to every element, keeping the exact tree shape.
    pub(super) fn map<B, F>(&self, function: &mut F) -> Node<B>
    where
        F: FnMut(&T) -> B,
    {
        match self {
            Self::Leaf(elements) => Node::Leaf(elements.iter().map(function).collect()),
            Self::Branch(branch) => Node::Branch(Branch {
                height: branch.height,
                children: branch
                    .children
                    .iter()
                    .map(|child| ReferenceCounter::new(child.map(function)))
                    .collect(),
                cumulative_lengths: branch.cumulative_lengths.clone(),
            }),
        }
    }

    /// Like [`Node::map`], passing each element's absolute index.
    ///
    /// `offset` is the absolute index of the first element below this node.
    pub(super) fn indexed_map<B, F>(&self, offset: usize, function: &mut F) -> Node<B>
    where
        F: FnMut(usize, &T) -> B,
    {
        match self {
            Self::Leaf(elements) => Node::Leaf(
                elements
                    .iter()
                    .enumerate()
                    .map(|(position, element)| function(offset + position, element))
                    .collect(),
            ),
            Self::Branch(branch) => Node::Branch(Branch {
                height: branch.height,
                children: branch
                    .children
                    .iter()
                    .enumerate()
                    .map(|(slot, child)| {
                        ReferenceCounter::new(
                            child.indexed_map(offset + branch.offset_of(slot), function),
                        )
                    })
                    .collect(),
                cumulative_lengths: branch.cumulative_lengths.clone(),
            }),
        }
    }

    pub(super) fn fold_left<B, F>(&self, init: B, function: &mut F) -> B
    where
        F: FnMut(B, &T) -> B,
    {
        match self {
            Self::Leaf(elements) => elements.iter().fold(init, &mut *function),
            Self::Branch(branch) => branch
                .children
                .iter()
                .fold(init, |accumulator, child| child.fold_left(accumulator, function)),
        }
    }

    pub(super) fn fold_right<B, F>(&self, init: B, function: &mut F) -> B
    where
        F: FnMut(&T, B) -> B,
    {
        match self {
            Self::Leaf(elements) => elements
                .iter()
                .rev()
                .fold(init, |accumulator, element| function(element, accumulator)),
            Self::Branch(branch) => branch
                .children
                .iter()
                .rev()
                .fold(init, |accumulator, child| child.fold_right(accumulator, function)),
        }
    }
}

#[cfg(feature = "rayon")]
impl<T: Send + Sync> Node<T> {
    /// Like [`Node::map`], mapping the children of every branch in parallel.
    pub(super) fn par_map<B, F>(&self, function: &F) -> Node<B>
    where
        B: Send + Sync,
        F: Fn(&T) -> B + Send + Sync,
    {
        use rayon::prelude::*;

        match self {
            Self::Leaf(elements) => Node::Leaf(elements.iter().map(function).collect()),
            Self::Branch(branch) => {
                let children: Vec<ReferenceCounter<Node<B>>> = branch
                    .children
                    .as_slice()
                    .par_iter()
                    .map(|child| ReferenceCounter::new(child.par_map(function)))
                    .collect();
                Node::Branch(Branch {
                    height: branch.height,
                    children: children.into_iter().collect(),
                    cumulative_lengths: branch.cumulative_lengths.clone(),
                })
            }
        }
    }
}

impl<T: Clone> Node<T> {
    /// Returns a copy of this node with the element at `index` replaced by
    /// `function(&old)`. Only the nodes on the path to the leaf are copied.
    ///
    /// The caller guarantees `index < self.len()`.
    pub(super) fn replace<F>(&self, index: usize, function: F) -> Self
    where
        F: FnOnce(&T) -> T,
    {
        match self {
            Self::Leaf(elements) => {
                let mut new_elements = elements.clone();
                new_elements[index] = function(&elements[index]);
                Self::Leaf(new_elements)
            }
            Self::Branch(branch) => {
                let slot = branch.slot_for(index);
                let child = branch.children[slot].replace(index - branch.offset_of(slot), function);
                let mut new_branch = branch.clone();
                new_branch.children[slot] = ReferenceCounter::new(child);
                Self::Branch(new_branch)
            }
        }
    }

    /// Appends `element` along the right spine.
    ///
    /// Returns `Err(element)` when every node on the right spine is full,
    /// in which case the caller has to grow the tree by one level.
    pub(super) fn push(&self, element: T) -> Result<Self, T> {
        match self {
            Self::Leaf(elements) => {
                if elements.is_full() {
                    return Err(element);
                }
                let mut new_elements = elements.clone();
                new_elements.push(element);
                Ok(Self::Leaf(new_elements))
            }
            Self::Branch(branch) => {
                let last = branch.children.len() - 1;
                match branch.children[last].push(element) {
                    Ok(child) => {
                        let mut new_branch = branch.clone();
                        new_branch.children[last] = ReferenceCounter::new(child);
                        new_branch.cumulative_lengths[last] += 1;
                        Ok(Self::Branch(new_branch))
                    }
                    Err(element) if !branch.children.is_full() => {
                        let mut new_branch = branch.clone();
                        new_branch
                            .push_child(ReferenceCounter::new(Self::path(element, branch.height - 1)));
                        Ok(Self::Branch(new_branch))
                    }
                    Err(element) => Err(element),
                }
            }
        }
    }

    /// Appends the slots `range` of `source` to this node.
    ///
    /// Both nodes must have the same height and the result must fit.
    pub(super) fn extend_from(&mut self, source: &Self, range: std::ops::Range<usize>) {
        match (self, source) {
            (Self::Leaf(elements), Self::Leaf(source_elements)) => {
                elements.extend(source_elements[range].iter().cloned());
            }
            (Self::Branch(branch), Self::Branch(source_branch)) => {
                for child in &source_branch.children[range] {
                    branch.push_child(child.clone());
                }
            }
            _ => unreachable!("slots can only move between nodes of the same height"),
        }
    }
}

/// Strips single-child branches off the top of a tree.
pub(super) fn collapse<T>(mut root: ReferenceCounter<Node<T>>) -> ReferenceCounter<Node<T>> {
    loop {
        let only_child = match root.as_ref() {
            Node::Branch(branch) if branch.children.len() == 1 => branch.children[0].clone(),
            _ => return root,
        };
        root = only_child;
    }
}

// =============================================================================
// Invariant Checking
// =============================================================================

#[cfg(test)]
impl<T> Node<T> {
    /// Walks the whole tree and panics on the first broken structural
    /// invariant. Returns the number of elements below this node.
    pub(super) fn assert_invariants(&self, is_root: bool) -> usize {
        match self {
            Self::Leaf(elements) => {
                assert!(
                    is_root || !elements.is_empty(),
                    "non-root leaf must not be empty"
                );
                elements.len()
            }
            Self::Branch(branch) => {
                assert!(branch.height > 0, "branch height must be positive");
                assert_eq!(
                    branch.children.len(),
                    branch.cumulative_lengths.len(),
                    "length table must match the children"
                );
                assert!(!branch.children.is_empty(), "branch must not be empty");
                assert!(
                    !is_root || branch.children.len() > 1,
                    "root branch must have at least two children"
                );
                assert!(
                    !is_root || self.is_shallow(),
                    "root of height {} is too tall for {} elements",
                    branch.height,
                    branch.len()
                );
                let mut total = 0;
                for (slot, child) in branch.children.iter().enumerate() {
                    assert_eq!(child.height() + 1, branch.height, "child height mismatch");
                    let child_length = child.assert_invariants(false);
                    assert!(child_length > 0, "child must not be empty");
                    total += child_length;
                    assert_eq!(
                        branch.cumulative_lengths[slot], total,
                        "cumulative length mismatch at slot {slot}"
                    );
                }
                total
            }
        }
    }
}
