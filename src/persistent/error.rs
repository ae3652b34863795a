//! Error types for the persistent data structures.

/// Represents an index that lies outside a collection.
///
/// Returned by the `try_*` accessors of
/// [`PersistentVector`](super::PersistentVector); the `Option`-returning
/// accessors report the same condition as `None`, and indexing with `[]`
/// panics with this error's message.
///
/// # Examples
///
/// ```rust
/// use rrb_vector::persistent::{IndexOutOfRange, PersistentVector};
///
/// let vector: PersistentVector<i32> = (0..3).collect();
/// let error = vector.try_get(5).unwrap_err();
/// assert_eq!(error, IndexOutOfRange { index: 5, length: 3 });
/// assert_eq!(
///     format!("{error}"),
///     "index 5 is out of range for a vector of length 3"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexOutOfRange {
    /// The index that was requested.
    pub index: usize,
    /// The length of the collection at the time of the request.
    pub length: usize,
}

impl IndexOutOfRange {
    /// Creates a new error for `index` against a collection of `length` elements.
    #[inline]
    #[must_use]
    pub const fn new(index: usize, length: usize) -> Self {
        Self { index, length }
    }
}

impl std::fmt::Display for IndexOutOfRange {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "index {} is out of range for a vector of length {}",
            self.index, self.length
        )
    }
}

impl std::error::Error for IndexOutOfRange {}
