//! # rrb-vector
//!
//! A persistent (immutable) vector for Rust, stored as a Relaxed Radix
//! Balanced Tree.
//!
//! ## Overview
//!
//! [`PersistentVector`](persistent::PersistentVector) is an indexable
//! sequence whose "modifying" operations return new versions that share
//! structure with the old ones. Compared to a strict radix balanced vector,
//! the relaxed tree also makes concatenation and slicing logarithmic:
//!
//! - **Indexing**: `get`, `set`, `push_back` in O(log32 N)
//! - **Bulk**: linear-time construction from any iterator
//! - **Restructuring**: `append`, `slice`, `take`, `split_at` in O(log32 N)
//! - **Traversal**: iterators, `map`, `indexed_map`, `fold_left`, `fold_right`
//!
//! ## Feature Flags
//!
//! - `persistent`: The persistent vector (enabled by default)
//! - `arc`: Use `Arc` instead of `Rc`, making vectors `Send + Sync`
//! - `serde`: Serialization as a plain sequence
//! - `rayon`: Parallel `par_map` (implies `arc`)
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use rrb_vector::prelude::*;
//!
//! let left: PersistentVector<i32> = (0..50).collect();
//! let right: PersistentVector<i32> = (50..100).collect();
//! let joined = left.append(&right);
//!
//! assert_eq!(joined.len(), 100);
//! assert_eq!(joined.slice(-10, -5).to_vec(), vec![90, 91, 92, 93, 94]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use rrb_vector::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;
}

#[cfg(feature = "persistent")]
pub mod persistent;
