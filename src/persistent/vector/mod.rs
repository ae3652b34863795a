//! Persistent (immutable) vector based on a Relaxed Radix Balanced Tree.
//!
//! This module provides [`PersistentVector`], an immutable indexable
//! sequence that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! `PersistentVector` is a 32-way branching tree whose branches carry a
//! cumulative length table (a "relaxed" radix balanced tree). Unlike a
//! strict radix tree, nodes away from the right spine may be partially
//! filled, which makes concatenation and slicing logarithmic:
//!
//! - O(log32 N) random access and update
//! - O(log32 N) `push_back`
//! - O(log32 N) `append` (concatenation) and `slice`
//! - O(N) bulk construction from an iterator
//! - O(1) `len` and `is_empty`
//!
//! All operations return new vectors without modifying the original;
//! untouched subtrees are shared between versions.
//!
//! # Internal Structure
//!
//! Leaves hold up to 32 elements; branches hold up to 32 children and a
//! table whose entry `i` is the number of elements in children `0..=i`.
//! Lookups start from the child a dense tree would use and scan forward
//! through the table. Concatenation only repacks nodes along the seam when
//! the scan would otherwise become more than two steps longer than in a
//! densely packed tree.
//!
//! # Examples
//!
//! ```rust
//! use rrb_vector::persistent::PersistentVector;
//!
//! let vector: PersistentVector<i32> = (0..100).collect();
//! let middle = vector.slice(10, 90);
//! assert_eq!(middle.len(), 80);
//! assert_eq!(middle.get(0), Some(&10));
//!
//! let rejoined = vector.slice(0, 50).append(&vector.slice(50, 100));
//! assert_eq!(rejoined, vector);
//!
//! // Structural sharing: the original vector is preserved
//! let extended = vector.push_back(100);
//! assert_eq!(vector.len(), 100);
//! assert_eq!(extended.len(), 101);
//! ```

mod builder;
mod concat;
mod iter;
mod node;
mod slice;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::ops::Index;

use super::ReferenceCounter;
use super::error::IndexOutOfRange;

use builder::build_tree;
use node::{Branch, EXTRA_SEARCH_STEPS, Node};

pub use iter::{PersistentVectorIntoIterator, PersistentVectorIterator};

// =============================================================================
// PersistentVector Definition
// =============================================================================

/// A persistent (immutable) vector based on a Relaxed Radix Balanced Tree.
///
/// `PersistentVector` is an immutable data structure that uses structural
/// sharing to efficiently support functional programming patterns.
///
/// # Time Complexity
///
/// | Operation        | Complexity                      |
/// |------------------|---------------------------------|
/// | `new`            | O(1)                            |
/// | `get`            | O(log32 N)                      |
/// | `set`            | O(log32 N)                      |
/// | `push_back`      | O(log32 N)                      |
/// | `push_front`     | O(log32 N)                      |
/// | `append`         | O(log32 N) amortized            |
/// | `slice`          | O(log32 N)                      |
/// | `map`, folds     | O(N)                            |
/// | `from_iter`      | O(N)                            |
/// | `len`            | O(1)                            |
/// | `iter`           | O(1) to create, O(N) to iterate |
///
/// # Index Errors
///
/// Out-of-range indices are always reported, never ignored: [`get`],
/// [`set`] and [`update_with`] return `None`, [`try_get`] and [`try_set`]
/// return [`IndexOutOfRange`], and `vector[index]` panics.
///
/// [`get`]: PersistentVector::get
/// [`set`]: PersistentVector::set
/// [`update_with`]: PersistentVector::update_with
/// [`try_get`]: PersistentVector::try_get
/// [`try_set`]: PersistentVector::try_set
///
/// # Examples
///
/// ```rust
/// use rrb_vector::persistent::PersistentVector;
///
/// let vector: PersistentVector<i32> = (0..100).collect();
/// assert_eq!(vector.len(), 100);
/// assert_eq!(vector.get(50), Some(&50));
/// ```
pub struct PersistentVector<T> {
    /// Root of the tree; an empty leaf for the empty vector.
    root: ReferenceCounter<Node<T>>,
}

impl<T> PersistentVector<T> {
    #[inline]
    const fn from_root(root: ReferenceCounter<Node<T>>) -> Self {
        Self { root }
    }

    /// Creates a new empty vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = PersistentVector::new();
    /// assert!(vector.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::from_root(ReferenceCounter::new(Node::empty()))
    }

    /// Creates a vector containing a single element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector = PersistentVector::singleton(42);
    /// assert_eq!(vector.len(), 1);
    /// assert_eq!(vector.get(0), Some(&42));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self::from_root(ReferenceCounter::new(Node::path(element, 0)))
    }

    /// Returns the number of elements in the vector.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.len(), 5);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Returns the height of the tree: 0 while all elements fit into a
    /// single leaf, increasing by one for every level of branches above.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let small: PersistentVector<i32> = (0..32).collect();
    /// let large: PersistentVector<i32> = (0..100).collect();
    /// assert_eq!(small.height(), 0);
    /// assert_eq!(large.height(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Returns a reference to the element at the given index.
    ///
    /// Returns `None` if the index is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.get(0), Some(&1));
    /// assert_eq!(vector.get(4), Some(&5));
    /// assert_eq!(vector.get(10), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            return None;
        }
        Some(self.root.get(index))
    }

    /// Returns a reference to the element at the given index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.try_get(1), Ok(&2));
    /// assert!(vector.try_get(5).is_err());
    /// ```
    pub fn try_get(&self, index: usize) -> Result<&T, IndexOutOfRange> {
        self.get(index)
            .ok_or_else(|| IndexOutOfRange::new(index, self.len()))
    }

    /// Returns a reference to the first element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a reference to the last element, or `None` if empty.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|index| self.get(index))
    }

    /// Returns an iterator over references to the elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// let collected: Vec<&i32> = vector.iter().collect();
    /// assert_eq!(collected, vec![&1, &2, &3, &4, &5]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentVectorIterator<'_, T> {
        PersistentVectorIterator::new(&self.root)
    }

    /// Finds the index of the first element that satisfies the predicate.
    #[must_use]
    pub fn find_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().position(predicate)
    }

    /// Applies `function` to every element, producing a vector with the
    /// same length and the same tree shape.
    ///
    /// A panic inside `function` propagates to the caller; `self` is left
    /// untouched either way.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// let doubled = vector.map(|x| x * 2);
    /// assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
    /// ```
    #[must_use]
    pub fn map<B, F>(&self, mut function: F) -> PersistentVector<B>
    where
        F: FnMut(&T) -> B,
    {
        PersistentVector::from_root(ReferenceCounter::new(self.root.map(&mut function)))
    }

    /// Like [`map`](Self::map), also passing each element's index.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<char> = "abc".chars().collect();
    /// let labelled = vector.indexed_map(|index, letter| format!("{index}{letter}"));
    /// assert_eq!(labelled.to_vec(), vec!["0a", "1b", "2c"]);
    /// ```
    #[must_use]
    pub fn indexed_map<B, F>(&self, mut function: F) -> PersistentVector<B>
    where
        F: FnMut(usize, &T) -> B,
    {
        PersistentVector::from_root(ReferenceCounter::new(
            self.root.indexed_map(0, &mut function),
        ))
    }

    /// Folds the elements from left to right.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=4).collect();
    /// let digits = vector.fold_left(String::new(), |accumulator, x| format!("{accumulator}{x}"));
    /// assert_eq!(digits, "1234");
    /// ```
    pub fn fold_left<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(B, &T) -> B,
    {
        self.root.fold_left(init, &mut function)
    }

    /// Folds the elements from right to left.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=4).collect();
    /// // 1 - (2 - (3 - (4 - 0)))
    /// assert_eq!(vector.fold_right(0, |x, accumulator| x - accumulator), -2);
    /// ```
    pub fn fold_right<B, F>(&self, init: B, mut function: F) -> B
    where
        F: FnMut(&T, B) -> B,
    {
        self.root.fold_right(init, &mut function)
    }
}

impl<T: Clone> PersistentVector<T> {
    /// Creates a `PersistentVector` from a slice, cloning the elements.
    ///
    /// # Complexity
    ///
    /// O(N)
    #[must_use]
    pub fn from_slice(slice: &[T]) -> Self {
        slice.iter().cloned().collect()
    }

    /// Copies the elements, in order, into a `Vec`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Returns a new vector with the element at `index` replaced.
    ///
    /// Returns `None` if the index is out of bounds. Only the nodes on the
    /// path to the element are copied.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// let updated = vector.set(2, 100).unwrap();
    ///
    /// assert_eq!(updated.get(2), Some(&100));
    /// assert_eq!(vector.get(2), Some(&3)); // Original unchanged
    /// assert!(vector.set(5, 0).is_none());
    /// ```
    #[must_use]
    pub fn set(&self, index: usize, element: T) -> Option<Self> {
        self.update_with(index, move |_| element)
    }

    /// Returns a new vector with the element at `index` replaced.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange`] if `index >= self.len()`.
    pub fn try_set(&self, index: usize, element: T) -> Result<Self, IndexOutOfRange> {
        self.set(index, element)
            .ok_or_else(|| IndexOutOfRange::new(index, self.len()))
    }

    /// Returns a new vector with the element at `index` replaced by
    /// `function(&old)`, or `None` if the index is out of bounds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// let updated = vector.update_with(1, |x| x * 10).unwrap();
    /// assert_eq!(updated.to_vec(), vec![1, 20, 3]);
    /// ```
    #[must_use]
    pub fn update_with<F>(&self, index: usize, function: F) -> Option<Self>
    where
        F: FnOnce(&T) -> T,
    {
        if index >= self.len() {
            return None;
        }
        Some(Self::from_root(ReferenceCounter::new(
            self.root.replace(index, function),
        )))
    }

    /// Appends an element to the back of the vector.
    ///
    /// The element goes into the rightmost leaf if it has room; otherwise a
    /// new rightmost path is opened below the nearest ancestor with room.
    /// When the whole right spine is full the tree grows by one level.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector = PersistentVector::new()
    ///     .push_back(1)
    ///     .push_back(2)
    ///     .push_back(3);
    ///
    /// assert_eq!(vector.len(), 3);
    /// assert_eq!(vector.get(2), Some(&3));
    /// ```
    #[must_use]
    pub fn push_back(&self, element: T) -> Self {
        match self.root.push(element) {
            Ok(root) => Self::from_root(ReferenceCounter::new(root)),
            Err(element) => {
                let height = self.root.height();
                tracing::trace!(
                    height = height + 1,
                    length = self.len() + 1,
                    "persistent vector grew a level"
                );
                let sibling = ReferenceCounter::new(Node::path(element, height));
                Self::from_root(ReferenceCounter::new(Node::Branch(Branch::from_children(
                    height + 1,
                    [self.root.clone(), sibling],
                ))))
            }
        }
    }

    /// Prepends an element to the front of the vector.
    ///
    /// # Complexity
    ///
    /// O(log32 N), via concatenation
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// let with_zero = vector.push_front(0);
    ///
    /// assert_eq!(with_zero.get(0), Some(&0));
    /// assert_eq!(with_zero.get(1), Some(&1));
    /// ```
    #[must_use]
    pub fn push_front(&self, element: T) -> Self {
        Self::singleton(element).append(self)
    }

    /// Removes the last element.
    ///
    /// Returns `None` if the vector is empty, otherwise the remaining vector
    /// and the removed element.
    #[must_use]
    pub fn pop_back(&self) -> Option<(Self, T)> {
        let last = self.last()?.clone();
        Some((self.slice_range(0, self.len() - 1), last))
    }

    /// Removes the first element.
    ///
    /// Returns `None` if the vector is empty, otherwise the remaining vector
    /// and the removed element.
    #[must_use]
    pub fn pop_front(&self) -> Option<(Self, T)> {
        let first = self.first()?.clone();
        Some((self.slice_range(1, self.len()), first))
    }

    /// Concatenates two vectors.
    ///
    /// The result shares every subtree of both inputs that is not on the
    /// seam between them.
    ///
    /// # Complexity
    ///
    /// O(log32 N) amortized over repeated concatenations
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector1: PersistentVector<i32> = (1..=3).collect();
    /// let vector2: PersistentVector<i32> = (4..=6).collect();
    /// let combined = vector1.append(&vector2);
    ///
    /// assert_eq!(combined.to_vec(), vec![1, 2, 3, 4, 5, 6]);
    /// ```
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        Self::from_restructured(concat::concatenate(
            &self.root,
            &other.root,
            EXTRA_SEARCH_STEPS,
        ))
    }

    /// Returns the elements from `start` (inclusive) to `end` (exclusive).
    ///
    /// Negative indices count from the end of the vector, so `-1` is the
    /// last element. Indices beyond either end are clamped, and an empty
    /// vector is returned when `start >= end` after resolution. Slicing the
    /// full range returns a vector sharing the same root.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..10).collect();
    ///
    /// assert_eq!(vector.slice(2, 5).to_vec(), vec![2, 3, 4]);
    /// assert_eq!(vector.slice(-3, 10).to_vec(), vec![7, 8, 9]);
    /// assert_eq!(vector.slice(1, -7).to_vec(), vec![1, 2]);
    /// assert!(vector.slice(4, 4).is_empty());
    /// ```
    #[must_use]
    pub fn slice(&self, start: isize, end: isize) -> Self {
        let length = self.len();
        self.slice_range(
            slice::resolve_index(start, length),
            slice::resolve_index(end, length),
        )
    }

    /// Slices with already resolved indices; `end` is clamped to the length.
    fn slice_range(&self, start: usize, end: usize) -> Self {
        let length = self.len();
        let end = end.min(length);
        if start >= end {
            return Self::new();
        }
        if start == 0 && end == length {
            return self.clone();
        }
        Self::from_restructured(slice::slice(&self.root, start, end))
    }

    /// Wraps the root produced by slicing or concatenation.
    ///
    /// Both keep every subtree they do not touch, so a source tree with
    /// sparse interior nodes can yield a root that would fit two levels
    /// lower. Such a root is repacked; it holds at most
    /// `BRANCHING_FACTOR^(height - 1)` elements.
    fn from_restructured(root: ReferenceCounter<Node<T>>) -> Self {
        if root.is_shallow() {
            return Self::from_root(root);
        }
        tracing::trace!(
            height = root.height(),
            length = root.len(),
            "repacking a sparse persistent vector"
        );
        Self::from_root(build_tree(PersistentVectorIterator::new(&root).cloned()))
    }

    /// Returns a new vector containing the first `count` elements.
    ///
    /// If `count` exceeds the vector's length, the whole vector is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.take(3).to_vec(), vec![1, 2, 3]);
    /// assert_eq!(vector.take(10).len(), 5);
    /// ```
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        self.slice_range(0, count)
    }

    /// Returns a new vector with the first `count` elements removed.
    ///
    /// If `count` exceeds the vector's length, an empty vector is returned.
    #[must_use]
    pub fn drop_first(&self, count: usize) -> Self {
        self.slice_range(count, self.len())
    }

    /// Splits the vector at the given index.
    ///
    /// Equivalent to `(self.take(index), self.drop_first(index))`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// let (left, right) = vector.split_at(2);
    /// assert_eq!(left.to_vec(), vec![1, 2]);
    /// assert_eq!(right.to_vec(), vec![3, 4, 5]);
    /// ```
    #[must_use]
    pub fn split_at(&self, index: usize) -> (Self, Self) {
        (self.take(index), self.drop_first(index))
    }
}

// =============================================================================
// Parallel Map
// =============================================================================

#[cfg(feature = "rayon")]
impl<T: Send + Sync> PersistentVector<T> {
    /// Like [`map`](Self::map), mapping subtrees in parallel with rayon.
    ///
    /// The result has the same tree shape as `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<u64> = (0..10_000).collect();
    /// let squared = vector.par_map(|x| x * x);
    /// assert_eq!(squared.get(100), Some(&10_000));
    /// ```
    #[must_use]
    pub fn par_map<B, F>(&self, function: F) -> PersistentVector<B>
    where
        B: Send + Sync,
        F: Fn(&T) -> B + Send + Sync,
    {
        PersistentVector::from_root(ReferenceCounter::new(self.root.par_map(&function)))
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Clone for PersistentVector<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self::from_root(self.root.clone())
    }
}

impl<T> Default for PersistentVector<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for PersistentVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_root(build_tree(iter))
    }
}

impl<T: Clone> Extend<T> for PersistentVector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let tail: Self = iter.into_iter().collect();
        *self = self.append(&tail);
    }
}

impl<T: Clone> IntoIterator for PersistentVector<T> {
    type Item = T;
    type IntoIter = PersistentVectorIntoIterator<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        PersistentVectorIntoIterator::new(self.root)
    }
}

impl<'a, T> IntoIterator for &'a PersistentVector<T> {
    type Item = &'a T;
    type IntoIter = PersistentVectorIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Index<usize> for PersistentVector<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics with an [`IndexOutOfRange`] message if `index >= self.len()`.
    fn index(&self, index: usize) -> &Self::Output {
        match self.try_get(index) {
            Ok(element) => element,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T: PartialEq> PartialEq for PersistentVector<T> {
    fn eq(&self, other: &Self) -> bool {
        if ReferenceCounter::ptr_eq(&self.root, &other.root) {
            return true;
        }
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for PersistentVector<T> {}

/// Hashes the length, then every element in order, so that equal vectors
/// hash equally regardless of their tree shape.
impl<T: Hash> Hash for PersistentVector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentVector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentVector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        for (position, element) in self.iter().enumerate() {
            if position > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentVector<i32>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentVector<i32>: Send, Sync);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PersistentVector<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentVectorVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for PersistentVectorVisitor<T>
where
    T: serde::Deserialize<'de>,
{
    type Value = PersistentVector<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut builder = builder::TreeBuilder::new();
        while let Some(element) = seq.next_element()? {
            builder.push(element);
        }
        Ok(PersistentVector::from_root(builder.finish()))
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for PersistentVector<T>
where
    T: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentVectorVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
