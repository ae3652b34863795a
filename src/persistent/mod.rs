//! Persistent (immutable) data structures.
//!
//! This module provides [`PersistentVector`], an immutable indexable
//! sequence stored as a Relaxed Radix Balanced Tree, together with the
//! error type reported for out-of-range indices.
//!
//! # Structural Sharing
//!
//! Every operation that "modifies" a vector returns a new version and
//! leaves the original untouched. Versions share every subtree the
//! operation did not need to copy, so updates, appends, concatenation and
//! slicing allocate only a logarithmic number of nodes.
//!
//! # Examples
//!
//! ```rust
//! use rrb_vector::persistent::PersistentVector;
//!
//! let vector: PersistentVector<i32> = (0..100).collect();
//! assert_eq!(vector.get(50), Some(&50));
//!
//! // Structural sharing: the original vector is preserved
//! let updated = vector.set(50, 999).unwrap();
//! assert_eq!(vector.get(50), Some(&50));     // Original unchanged
//! assert_eq!(updated.get(50), Some(&999));   // New version
//!
//! // Out-of-range indices are reported, never ignored
//! assert!(vector.try_set(100, 0).is_err());
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

pub mod error;
mod vector;

pub use error::IndexOutOfRange;
pub use vector::PersistentVector;
pub use vector::PersistentVectorIntoIterator;
pub use vector::PersistentVectorIterator;

// =============================================================================
// Tests
// =============================================================================
